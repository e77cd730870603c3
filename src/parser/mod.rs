//! Line parser for simulation input.
//!
//! Input is line oriented and the grammar of a line depends on its index:
//!
//! - line 0: `<x> <y>`, the highest coordinate on each axis
//! - odd lines: `<x> <y> <N|E|S|W>`, where the next rover starts
//! - even lines after 0: one or more of `L`, `M`, `R`, the last rover's instructions
//!
//! Each grammar is matched by a small recursive descent parser over a
//! [`Cursor`]. Surrounding whitespace is ignored, fields are separated by
//! any amount of whitespace and nothing may follow the last field.

mod cursor;

use cursor::Cursor;

use crate::error::{Result, RoverError};
use crate::map::{GridSize, Position};
use crate::rover::{Heading, Instruction, Placement};
use serde::Serialize;

const EXPECTED_MAP_SIZE: &str = "map size `<x> <y>`";
const EXPECTED_PLACEMENT: &str = "placement `<x> <y> <N|E|S|W>`";
const EXPECTED_INSTRUCTIONS: &str = "instructions made of L, M and R";

/// One validated input line.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum CommandRecord {
    MapSize(GridSize),
    Placement(Placement),
    Instructions(Vec<Instruction>),
}

impl CommandRecord {
    /// Short name of the record shape, used in sequencing errors.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandRecord::MapSize(_) => "map size",
            CommandRecord::Placement(_) => "placement",
            CommandRecord::Instructions(_) => "instructions",
        }
    }
}

/// The record shape a line is expected to have.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineKind {
    MapSize,
    Placement,
    Instructions,
}

impl LineKind {
    pub fn for_index(index: usize) -> LineKind {
        match index {
            0 => LineKind::MapSize,
            i if i % 2 == 1 => LineKind::Placement,
            _ => LineKind::Instructions,
        }
    }
}

/// Parse one line given its zero-based index.
///
/// `map_size` is the size decoded from line 0 and is required to check
/// placement lines against the map boundary.
///
/// # Errors
/// * `Format` if the line does not match the grammar for its index.
/// * `Boundary` if a placement lies outside `map_size`.
/// * `Sequencing` if a placement line arrives without a map size.
pub fn parse_line(line: &str, index: usize, map_size: Option<GridSize>) -> Result<CommandRecord> {
    let mut cursor = Cursor::new(line.trim());

    match LineKind::for_index(index) {
        LineKind::MapSize => {
            map_size_line(&mut cursor).ok_or_else(|| format_error(line, index, EXPECTED_MAP_SIZE))
        }
        LineKind::Placement => {
            let size = map_size.ok_or(RoverError::Sequencing {
                index,
                expected: "map size",
                found: "placement",
            })?;
            let placement = placement_line(&mut cursor)
                .ok_or_else(|| format_error(line, index, EXPECTED_PLACEMENT))?;

            if !size.contains(placement.position) {
                return Err(RoverError::Boundary {
                    line: Some(index),
                    position: placement.position,
                    size,
                });
            }

            Ok(CommandRecord::Placement(placement))
        }
        LineKind::Instructions => instructions_line(&mut cursor)
            .ok_or_else(|| format_error(line, index, EXPECTED_INSTRUCTIONS)),
    }
}

/// Parse a whole sequence of lines, stopping at the first error.
pub fn parse_commands<'a, I>(lines: I) -> Result<Vec<CommandRecord>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = CommandParser::new();
    lines
        .into_iter()
        .map(|line| parser.parse_next(line))
        .collect()
}

/// Splits text into input lines, dropping trailing blank lines.
pub fn input_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Incremental parser that tracks the line index and the map size.
///
/// Lets an interactive reader validate each line as soon as it is entered.
#[derive(Debug, Default)]
pub struct CommandParser {
    index: usize,
    map_size: Option<GridSize>,
}

impl CommandParser {
    pub fn new() -> CommandParser {
        CommandParser::default()
    }

    /// Index the next line will be parsed with.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parse_next(&mut self, line: &str) -> Result<CommandRecord> {
        let record = parse_line(line, self.index, self.map_size)?;

        if let CommandRecord::MapSize(size) = record {
            self.map_size = Some(size);
        }
        self.index += 1;

        Ok(record)
    }
}

fn map_size_line(cursor: &mut Cursor) -> Option<CommandRecord> {
    let (max_x, max_y) = coordinates(cursor)?;
    end(cursor)?;
    Some(CommandRecord::MapSize(GridSize::new(max_x, max_y)))
}

fn placement_line(cursor: &mut Cursor) -> Option<Placement> {
    let (x, y) = coordinates(cursor)?;
    separator(cursor)?;
    let heading = cursor.advance().and_then(Heading::from_char)?;
    end(cursor)?;
    Some(Placement::new(Position::new(x, y), heading))
}

fn instructions_line(cursor: &mut Cursor) -> Option<CommandRecord> {
    let mut instructions = Vec::new();
    while let Some(instruction) = cursor.peek().and_then(Instruction::from_char) {
        cursor.advance();
        instructions.push(instruction);
    }

    if instructions.is_empty() {
        return None;
    }
    end(cursor)?;
    Some(CommandRecord::Instructions(instructions))
}

fn coordinates(cursor: &mut Cursor) -> Option<(i64, i64)> {
    let x = cursor.unsigned()?;
    separator(cursor)?;
    let y = cursor.unsigned()?;
    Some((x, y))
}

fn separator(cursor: &mut Cursor) -> Option<()> {
    cursor.skip_whitespace().then_some(())
}

fn end(cursor: &mut Cursor) -> Option<()> {
    cursor.at_end().then_some(())
}

fn format_error(line: &str, index: usize, expected: &'static str) -> RoverError {
    RoverError::Format {
        line: index,
        expected,
        found: line.to_string(),
    }
}
