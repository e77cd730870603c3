use crate::error::{Result, RoverError};
use crate::rover::Rover;
use crossterm::{
    cursor::Hide,
    queue,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

/// A cell coordinate. Signed so that a step off the edge of the map is representable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Position {
        Position { x, y }
    }

    pub fn offset(self, dx: i64, dy: i64) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The highest valid coordinate on each axis, inclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct GridSize {
    pub max_x: i64,
    pub max_y: i64,
}

impl GridSize {
    pub fn new(max_x: i64, max_y: i64) -> GridSize {
        GridSize { max_x, max_y }
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..=self.max_x).contains(&position.x) && (0..=self.max_y).contains(&position.y)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0, {}] x [0, {}]", self.max_x, self.max_y)
    }
}

/// Handle to a rover, stored in the grid cell the rover occupies.
///
/// The value is the rover's creation index within its simulation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct RoverId(pub usize);

impl fmt::Display for RoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy map over a fixed rectangle of cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: GridSize,
    cells: usize,
    occupancy: HashMap<Position, RoverId>,
}

impl Grid {
    /// Creates an empty grid covering `[0, max_x] x [0, max_y]`.
    ///
    /// Only occupied cells are stored, so large maps cost nothing up front.
    pub fn new(size: GridSize) -> Result<Grid> {
        let invalid = || RoverError::InvalidGridSize {
            max_x: size.max_x,
            max_y: size.max_y,
        };

        if size.max_x < 0 || size.max_y < 0 {
            return Err(invalid());
        }

        // A step past the far edge must stay representable
        let width = extent(size.max_x).ok_or_else(invalid)?;
        let height = extent(size.max_y).ok_or_else(invalid)?;
        let cells = width.checked_mul(height).ok_or_else(invalid)?;

        Ok(Grid {
            size,
            cells,
            occupancy: HashMap::new(),
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Number of addressable cells.
    pub fn cells(&self) -> usize {
        self.cells
    }

    pub fn contains(&self, position: Position) -> bool {
        self.size.contains(position)
    }

    /// The rover on `position`, or `None` when the cell is empty or off the map.
    pub fn occupant_at(&self, position: Position) -> Option<RoverId> {
        self.occupancy.get(&position).copied()
    }

    pub fn place(&mut self, position: Position, id: RoverId) -> Result<()> {
        if !self.contains(position) {
            return Err(RoverError::OutOfBounds(position));
        }

        if let Some(occupant) = self.occupant_at(position) {
            return Err(RoverError::CellOccupied { position, occupant });
        }

        self.occupancy.insert(position, id);
        Ok(())
    }

    pub fn vacate(&mut self, position: Position) {
        self.occupancy.remove(&position);
    }

    /// All occupied cells, bottom row first.
    pub fn occupied(&self) -> Vec<(Position, RoverId)> {
        let mut occupied: Vec<(Position, RoverId)> = self
            .occupancy
            .iter()
            .map(|(position, id)| (*position, *id))
            .collect();
        occupied.sort_by_key(|(position, _)| (position.y, position.x));
        occupied
    }

    /// Draws the grid with the top row (highest `y`) first.
    ///
    /// Each rover is shown as the letter of its heading, coloured by its id.
    pub fn draw<W: Write>(&self, rovers: &[Rover], out: &mut W) -> io::Result<()> {
        queue!(
            out,
            Clear(ClearType::All),
            Hide,
            Print("Map: "),
            Print(self.size.to_string()),
            Print("\nRovers: "),
            Print(rovers.len().to_string()),
            Print("\n\n")
        )?;

        for y in (0..=self.size.max_y).rev() {
            for x in 0..=self.size.max_x {
                let rover = self
                    .occupant_at(Position::new(x, y))
                    .and_then(|id| rovers.iter().find(|rover| rover.id() == id));

                match rover {
                    Some(rover) => queue!(
                        out,
                        SetForegroundColor(rover_to_color(rover.id())),
                        Print(rover.heading().as_char()),
                        SetForegroundColor(Color::Reset)
                    )?,
                    None => queue!(out, Print('.'))?,
                }
            }
            queue!(out, Print("\n"))?;
        }

        out.flush()
    }
}

/// Number of cells along an axis whose highest coordinate is `max`.
fn extent(max: i64) -> Option<usize> {
    max.checked_add(1).and_then(|count| usize::try_from(count).ok())
}

pub fn rover_to_color(id: RoverId) -> Color {
    match id.0 % 10 {
        0 => Color::Red,
        1 => Color::Green,
        2 => Color::Blue,
        3 => Color::Yellow,
        4 => Color::Magenta,
        5 => Color::Cyan,
        6 => Color::DarkRed,
        7 => Color::DarkGreen,
        8 => Color::DarkMagenta,
        _ => Color::DarkYellow,
    }
}
