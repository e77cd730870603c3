//! # rover_engine
//!
//! Simulates rovers driving over a bounded grid.
//!
//! Input is a list of text lines: the map size, then for each rover a
//! placement line followed by a line of `L`, `R` and `M` instructions.
//! Rovers are deployed one after the other and may not leave the map or
//! drive into each other.

pub mod error;
pub mod map;
pub mod mission;
pub mod parser;
pub mod replay;
pub mod rover;
pub mod simulation;

pub use error::{MoveBlocker, Result, RoverError};
pub use map::{Grid, GridSize, Position, RoverId};
pub use mission::{Deployment, Mission};
pub use parser::{input_lines, parse_commands, parse_line, CommandParser, CommandRecord};
pub use rover::{Heading, Instruction, Placement, Rotation, Rover};
pub use simulation::{format_report, simulate, RoverReport, Simulation, SimulationOptions};
