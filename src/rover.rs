use crate::error::{MoveBlocker, Result, RoverError};
use crate::map::{Grid, Position, RoverId};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// The direction a rover faces.
///
/// Headings are cyclically ordered North, East, South, West.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    const CLOCKWISE: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    pub fn from_char(value: char) -> Option<Heading> {
        match value {
            'N' => Some(Heading::North),
            'E' => Some(Heading::East),
            'S' => Some(Heading::South),
            'W' => Some(Heading::West),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Heading::North => 'N',
            Heading::East => 'E',
            Heading::South => 'S',
            Heading::West => 'W',
        }
    }

    /// One step backward (left) or forward (right) in the cyclic order.
    pub fn turn(self, rotation: Rotation) -> Heading {
        let step = match rotation {
            Rotation::Left => 3,
            Rotation::Right => 1,
        };
        Heading::CLOCKWISE[(self.index() + step) % 4]
    }

    /// The unit step taken when moving forward.
    pub fn vector(self) -> (i64, i64) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    fn index(self) -> usize {
        match self {
            Heading::North => 0,
            Heading::East => 1,
            Heading::South => 2,
            Heading::West => 3,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Rotation {
    Left,
    Right,
}

/// A single command for a rover.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Instruction {
    TurnLeft,
    TurnRight,
    Move,
}

impl Instruction {
    pub fn from_char(value: char) -> Option<Instruction> {
        match value {
            'L' => Some(Instruction::TurnLeft),
            'R' => Some(Instruction::TurnRight),
            'M' => Some(Instruction::Move),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Instruction::TurnLeft => 'L',
            Instruction::TurnRight => 'R',
            Instruction::Move => 'M',
        }
    }
}

/// Where and facing which way a new rover starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Placement {
    pub position: Position,
    pub heading: Heading,
}

impl Placement {
    pub fn new(position: Position, heading: Heading) -> Placement {
        Placement { position, heading }
    }
}

/// A rover on the grid.
///
/// The rover does not own the grid. Every operation that touches occupancy
/// borrows it from the caller, and the rover's `position` always names the
/// cell that holds its `id`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rover {
    id: RoverId,
    position: Position,
    heading: Heading,
}

impl Rover {
    /// Creates a rover and marks its starting cell as occupied.
    ///
    /// # Errors
    /// * `Boundary` if the placement is off the map.
    /// * `PlacementCollision` if another rover already stands there.
    pub fn place(id: RoverId, placement: Placement, grid: &mut Grid) -> Result<Rover> {
        let position = placement.position;

        if !grid.contains(position) {
            return Err(RoverError::Boundary {
                line: None,
                position,
                size: grid.size(),
            });
        }

        if let Some(occupant) = grid.occupant_at(position) {
            return Err(RoverError::PlacementCollision { position, occupant });
        }

        grid.place(position, id)?;
        debug!(rover = %id, %position, heading = %placement.heading, "placed rover");

        Ok(Rover {
            id,
            position,
            heading: placement.heading,
        })
    }

    pub fn id(&self) -> RoverId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn turn(&mut self, rotation: Rotation) {
        self.heading = self.heading.turn(rotation);
        debug!(rover = %self.id, heading = %self.heading, "turned");
    }

    pub fn next_position(&self) -> Position {
        let (dx, dy) = self.heading.vector();
        self.position.offset(dx, dy)
    }

    pub fn is_move_valid(&self, grid: &Grid) -> bool {
        self.blocker(grid).is_none()
    }

    /// Moves one cell forward and returns the new position.
    ///
    /// A rejected move leaves both the rover and the grid untouched.
    pub fn move_forward(&mut self, grid: &mut Grid) -> Result<Position> {
        let to = self.next_position();

        if let Some(reason) = self.blocker(grid) {
            return Err(RoverError::InvalidMove {
                rover: self.id,
                from: self.position,
                to,
                reason,
            });
        }

        grid.vacate(self.position);
        grid.place(to, self.id)?;
        debug!(rover = %self.id, from = %self.position, %to, "moved");
        self.position = to;

        Ok(to)
    }

    pub fn apply(&mut self, grid: &mut Grid, instruction: Instruction) -> Result<()> {
        match instruction {
            Instruction::TurnLeft => self.turn(Rotation::Left),
            Instruction::TurnRight => self.turn(Rotation::Right),
            Instruction::Move => {
                self.move_forward(grid)?;
            }
        }

        Ok(())
    }

    /// Applies `instructions` in order, stopping at the first rejected move.
    pub fn run_instructions(&mut self, grid: &mut Grid, instructions: &[Instruction]) -> Result<()> {
        instructions
            .iter()
            .try_for_each(|instruction| self.apply(grid, *instruction))
    }

    /// Like `run_instructions` but reads raw command letters.
    ///
    /// Characters other than `L`, `M` and `R` are skipped.
    pub fn run_commands(&mut self, grid: &mut Grid, commands: &str) -> Result<()> {
        commands
            .chars()
            .filter_map(Instruction::from_char)
            .try_for_each(|instruction| self.apply(grid, instruction))
    }

    fn blocker(&self, grid: &Grid) -> Option<MoveBlocker> {
        let to = self.next_position();

        if !grid.contains(to) {
            return Some(MoveBlocker::OutOfBounds);
        }

        grid.occupant_at(to).map(MoveBlocker::Occupied)
    }
}
