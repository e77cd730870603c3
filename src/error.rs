//! Error types for the rover engine.

use crate::map::{GridSize, Position, RoverId};
use std::fmt;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoverError>;

/// Errors that can occur while parsing input or running a simulation.
///
/// Every variant is fatal to the run that produced it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RoverError {
    /// A line does not match the grammar expected for its position.
    #[error("line {line}: expected {expected}, found {found:?}")]
    Format {
        /// Zero-based line index.
        line: usize,
        /// Description of the expected shape.
        expected: &'static str,
        /// The offending text.
        found: String,
    },

    /// A placement lies outside the declared map extent.
    #[error("{}rover placed at {position} outside the map {size}", line_prefix(.line))]
    Boundary {
        /// Zero-based line index, when the placement came from parsed input.
        line: Option<usize>,
        /// The requested placement.
        position: Position,
        /// The declared map size.
        size: GridSize,
    },

    /// A move would leave the map or run into another rover.
    #[error("rover {rover} cannot move from {from} to {to}: {reason}")]
    InvalidMove {
        /// The rover that attempted the move.
        rover: RoverId,
        /// Where the rover stands.
        from: Position,
        /// Where it tried to go.
        to: Position,
        /// Why the move was rejected.
        reason: MoveBlocker,
    },

    /// Records arrived out of the map size / placement / instructions order.
    #[error("record {index}: expected {expected}, found {found}")]
    Sequencing {
        /// Zero-based record index.
        index: usize,
        /// The record shape that was expected.
        expected: &'static str,
        /// The record shape that was found.
        found: &'static str,
    },

    /// A rover was placed on a cell another rover already occupies.
    #[error("cannot place rover at {position}: occupied by rover {occupant}")]
    PlacementCollision {
        /// The requested placement.
        position: Position,
        /// The rover already there.
        occupant: RoverId,
    },

    /// The map extent is negative or too large to allocate.
    #[error("invalid map size {max_x} {max_y}")]
    InvalidGridSize {
        /// Requested highest x coordinate.
        max_x: i64,
        /// Requested highest y coordinate.
        max_y: i64,
    },

    /// A grid cell outside the extent was written to.
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    /// A grid cell that is already occupied was written to.
    #[error("cell {position} is already occupied by rover {occupant}")]
    CellOccupied {
        /// The cell written to.
        position: Position,
        /// The rover already there.
        occupant: RoverId,
    },

    /// Reading input or writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serializing the replay failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn line_prefix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("line {line}: "),
        None => String::new(),
    }
}

/// The reason a move was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveBlocker {
    /// The target cell lies outside the map.
    OutOfBounds,
    /// The target cell holds another rover.
    Occupied(RoverId),
}

impl fmt::Display for MoveBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveBlocker::OutOfBounds => write!(f, "target is outside the map"),
            MoveBlocker::Occupied(occupant) => write!(f, "target is occupied by rover {occupant}"),
        }
    }
}
