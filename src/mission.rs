use crate::error::{Result, RoverError};
use crate::map::GridSize;
use crate::parser::CommandRecord;
use crate::rover::{Instruction, Placement};

/// A rover to create together with the instructions it should run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deployment {
    pub placement: Placement,
    /// `None` when input ended right after the placement.
    pub instructions: Option<Vec<Instruction>>,
}

/// A map size and the ordered list of rovers to deploy on it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mission {
    pub size: GridSize,
    pub deployments: Vec<Deployment>,
}

impl Mission {
    /// Pairs every placement record with the instructions record that follows it.
    ///
    /// # Errors
    /// Returns `Sequencing` if the first record is not a map size, if a
    /// placement is followed by anything other than instructions (unless it
    /// is the last record), or if instructions or a map size appear where a
    /// placement is expected.
    pub fn from_records(records: Vec<CommandRecord>) -> Result<Mission> {
        let mut records = records.into_iter().enumerate();

        let size = match records.next() {
            Some((_, CommandRecord::MapSize(size))) => size,
            Some((index, record)) => return Err(sequencing(index, "map size", &record)),
            None => {
                return Err(RoverError::Sequencing {
                    index: 0,
                    expected: "map size",
                    found: "end of input",
                })
            }
        };

        let mut deployments = Vec::new();
        while let Some((index, record)) = records.next() {
            let placement = match record {
                CommandRecord::Placement(placement) => placement,
                other => return Err(sequencing(index, "placement", &other)),
            };

            let instructions = match records.next() {
                Some((_, CommandRecord::Instructions(instructions))) => Some(instructions),
                Some((index, other)) => return Err(sequencing(index, "instructions", &other)),
                None => None,
            };

            deployments.push(Deployment {
                placement,
                instructions,
            });
        }

        Ok(Mission { size, deployments })
    }
}

fn sequencing(index: usize, expected: &'static str, found: &CommandRecord) -> RoverError {
    RoverError::Sequencing {
        index,
        expected,
        found: found.kind(),
    }
}
