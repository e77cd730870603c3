use crate::error::{Result, RoverError};
use crate::map::{Grid, GridSize, RoverId};
use crate::mission::{Deployment, Mission};
use crate::parser::{input_lines, parse_commands};
use crate::replay::{create_replay_logger, ReplayLogger};
use crate::rover::{Heading, Instruction, Rover};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Printed after the last report line.
pub const REPORT_SEPARATOR: &str = "==========";

/// Options for a simulation run.
#[derive(Clone, Debug, Default)]
pub struct SimulationOptions {
    /// Where to write the JSON replay. `None` disables the replay.
    pub replay: Option<PathBuf>,
}

/// Final position and heading of one rover.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct RoverReport {
    pub x: i64,
    pub y: i64,
    pub heading: Heading,
}

impl From<&Rover> for RoverReport {
    fn from(rover: &Rover) -> RoverReport {
        RoverReport {
            x: rover.position().x,
            y: rover.position().y,
            heading: rover.heading(),
        }
    }
}

impl fmt::Display for RoverReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.heading)
    }
}

/// A run of rovers over one shared grid.
///
/// The simulation owns the grid and every rover created on it. Rovers are
/// kept in creation order until the simulation is dropped.
pub struct Simulation {
    grid: Grid,
    rovers: Vec<Rover>,
    step: usize,
    replay_logger: Box<dyn ReplayLogger>,
}

impl Simulation {
    pub fn new(size: GridSize) -> Result<Simulation> {
        Simulation::with_options(size, SimulationOptions::default())
    }

    pub fn with_options(size: GridSize, options: SimulationOptions) -> Result<Simulation> {
        Ok(Simulation {
            grid: Grid::new(size)?,
            rovers: Vec::new(),
            step: 0,
            replay_logger: create_replay_logger(options.replay, size),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rovers(&self) -> &[Rover] {
        &self.rovers
    }

    /// Places a new rover and runs its instructions.
    ///
    /// The rover is kept even when one of its moves fails.
    pub fn deploy(&mut self, deployment: &Deployment) -> Result<RoverId> {
        let id = RoverId(self.rovers.len());
        let rover = Rover::place(id, deployment.placement, &mut self.grid)?;
        self.replay_logger.log_place(id, deployment.placement);
        self.rovers.push(rover);

        for instruction in deployment.instructions.iter().flatten() {
            self.drive(id, *instruction)?;
        }

        Ok(id)
    }

    /// Deploys every rover in order and reports where they ended up.
    ///
    /// The first error aborts the run. Grid changes made before the error
    /// are kept and the replay, if any, records the abort.
    pub fn execute(&mut self, deployments: &[Deployment]) -> Result<Vec<RoverReport>> {
        info!(
            size = %self.grid.size(),
            rovers = deployments.len(),
            "starting simulation"
        );

        for deployment in deployments {
            if let Err(error) = self.deploy(deployment) {
                warn!(%error, "simulation aborted");
                let rover = match error {
                    RoverError::InvalidMove { rover, .. } => Some(rover),
                    _ => None,
                };
                self.replay_logger.log_abort(rover, self.step, error.to_string());
                if let Err(save_error) = self.replay_logger.save() {
                    warn!(error = %save_error, "could not save replay");
                }
                return Err(error);
            }
        }

        let report = self.report();
        self.replay_logger.log_report(&report);
        self.replay_logger.save()?;
        info!(rovers = report.len(), steps = self.step, "simulation finished");

        Ok(report)
    }

    /// Current position and heading of every rover in creation order.
    pub fn report(&self) -> Vec<RoverReport> {
        self.rovers.iter().map(RoverReport::from).collect()
    }

    pub fn draw<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.grid.draw(&self.rovers, out)
    }

    fn drive(&mut self, id: RoverId, instruction: Instruction) -> Result<()> {
        let step = self.step;
        let rover = &mut self.rovers[id.0];
        let from = rover.position();
        rover.apply(&mut self.grid, instruction)?;
        self.step += 1;

        match instruction {
            Instruction::Move => self
                .replay_logger
                .log_move(id, step, from, rover.position()),
            Instruction::TurnLeft | Instruction::TurnRight => {
                self.replay_logger
                    .log_turn(id, step, from, rover.heading())
            }
        }

        Ok(())
    }
}

/// One line per rover followed by the separator line.
pub fn format_report(report: &[RoverReport]) -> String {
    let mut text = String::new();
    for line in report {
        text.push_str(&line.to_string());
        text.push('\n');
    }
    text.push_str(REPORT_SEPARATOR);
    text.push('\n');
    text
}

/// Runs a whole simulation described by `input` and returns the report text.
pub fn simulate(input: &str) -> Result<String> {
    let records = parse_commands(input_lines(input))?;
    let mission = Mission::from_records(records)?;
    let mut simulation = Simulation::new(mission.size)?;
    let report = simulation.execute(&mission.deployments)?;

    Ok(format_report(&report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveBlocker;
    use crate::map::Position;
    use crate::rover::Placement;

    fn deployment(x: i64, y: i64, heading: Heading, commands: &str) -> Deployment {
        Deployment {
            placement: Placement::new(Position::new(x, y), heading),
            instructions: Some(commands.chars().filter_map(Instruction::from_char).collect()),
        }
    }

    #[test]
    fn when_simulating_a_single_move_the_rover_ends_one_cell_north() {
        let report = simulate("1 1\n0 0 N\nM\n").unwrap();

        assert_eq!(report, "0 1 N\n==========\n");
    }

    #[test]
    fn when_simulating_a_move_off_a_single_cell_map_an_invalid_move_is_returned() {
        let error = simulate("0 0\n0 0 N\nM\n").unwrap_err();

        assert!(matches!(
            error,
            RoverError::InvalidMove {
                reason: MoveBlocker::OutOfBounds,
                to: Position { x: 0, y: 1 },
                ..
            }
        ));
    }

    #[test]
    fn when_simulating_two_rovers_both_final_positions_are_reported() {
        let report = simulate("5 5\n1 2 N\nLMLMLMLMM\n3 3 E\nMMRMMRMRRM\n").unwrap();

        assert_eq!(report, "1 3 N\n5 1 E\n==========\n");
    }

    #[test]
    fn when_two_rovers_share_a_placement_a_collision_is_returned() {
        let error = simulate("5 5\n1 2 N\nM\n1 3 E\nM\n").unwrap_err();

        assert!(matches!(
            error,
            RoverError::PlacementCollision {
                position: Position { x: 1, y: 3 },
                occupant: RoverId(0),
            }
        ));
    }

    #[test]
    fn when_the_same_input_is_simulated_twice_the_report_is_identical() {
        let input = "9 9\n4 4 N\nMMRMML\n0 0 E\nMMMLM\n";

        assert_eq!(simulate(input).unwrap(), simulate(input).unwrap());
    }

    #[test]
    fn when_the_last_rover_has_no_instructions_it_reports_its_placement() {
        let report = simulate("3 3\n0 0 N\nM\n2 2 W").unwrap();

        assert_eq!(report, "0 1 N\n2 2 W\n==========\n");
    }

    #[test]
    fn when_there_are_no_rovers_only_the_separator_is_reported() {
        assert_eq!(simulate("3 3\n").unwrap(), "==========\n");
    }

    #[test]
    fn when_deploying_a_rover_outside_the_map_a_boundary_error_is_returned() {
        let mut simulation = Simulation::new(GridSize::new(2, 2)).unwrap();

        let error = simulation
            .deploy(&deployment(3, 1, Heading::North, "M"))
            .unwrap_err();

        assert!(matches!(
            error,
            RoverError::Boundary {
                line: None,
                position: Position { x: 3, y: 1 },
                size: GridSize { max_x: 2, max_y: 2 },
            }
        ));
        assert!(simulation.rovers().is_empty());
        assert!(simulation.grid().occupied().is_empty());
    }

    #[test]
    fn when_simulating_on_a_very_large_map_the_rover_still_moves() {
        let report = simulate("100000 100000\n0 0 N\nM\n").unwrap();

        assert_eq!(report, "0 1 N\n==========\n");
    }

    #[test]
    fn when_a_rover_drives_into_an_earlier_rover_the_run_aborts_and_both_are_kept() {
        let mut simulation = Simulation::new(GridSize::new(3, 3)).unwrap();
        let deployments = [
            deployment(1, 1, Heading::North, ""),
            deployment(0, 1, Heading::East, "M"),
        ];

        let error = simulation.execute(&deployments).unwrap_err();

        assert!(matches!(
            error,
            RoverError::InvalidMove {
                reason: MoveBlocker::Occupied(RoverId(0)),
                ..
            }
        ));
        assert_eq!(simulation.rovers().len(), 2);
        assert_eq!(
            simulation.grid().occupant_at(Position::new(0, 1)),
            Some(RoverId(1))
        );
    }

    #[test]
    fn when_a_run_aborts_mid_instructions_earlier_moves_stay_committed() {
        let mut simulation = Simulation::new(GridSize::new(0, 2)).unwrap();

        let error = simulation
            .deploy(&deployment(0, 0, Heading::North, "MMM"))
            .unwrap_err();

        assert!(matches!(error, RoverError::InvalidMove { .. }));
        assert_eq!(
            simulation.report(),
            vec![RoverReport {
                x: 0,
                y: 2,
                heading: Heading::North
            }]
        );
        assert_eq!(
            simulation.grid().occupant_at(Position::new(0, 2)),
            Some(RoverId(0))
        );
    }

    #[test]
    fn when_a_rover_moves_away_a_later_rover_can_use_its_start_cell() {
        let report = simulate("2 2\n0 0 N\nM\n0 0 E\nM\n").unwrap();

        assert_eq!(report, "0 1 N\n1 0 E\n==========\n");
    }

    #[test]
    fn when_executing_with_a_replay_the_file_records_the_run() {
        let path = std::env::temp_dir().join(format!(
            "rover_simulation_{}.json",
            uuid::Uuid::new_v4()
        ));
        let options = SimulationOptions {
            replay: Some(path.clone()),
        };
        let mut simulation = Simulation::with_options(GridSize::new(2, 2), options).unwrap();

        simulation
            .execute(&[deployment(0, 0, Heading::North, "RM")])
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();

        assert_eq!(value["events"].as_array().unwrap().len(), 3);
        assert_eq!(value["events"][1]["event_type"], "Turn");
        assert_eq!(value["events"][2]["destination"]["x"], 1);
        assert_eq!(value["report"][0]["x"], 1);
        assert!(value["aborted"].is_null());
    }

    #[test]
    fn when_a_run_with_a_replay_aborts_the_abort_is_recorded() {
        let path = std::env::temp_dir().join(format!(
            "rover_simulation_{}.json",
            uuid::Uuid::new_v4()
        ));
        let options = SimulationOptions {
            replay: Some(path.clone()),
        };
        let mut simulation = Simulation::with_options(GridSize::new(0, 0), options).unwrap();

        assert!(simulation
            .execute(&[deployment(0, 0, Heading::West, "M")])
            .is_err());

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();

        let events = value["events"].as_array().unwrap();
        let abort = &events[events.len() - 1];
        assert_eq!(abort["event_type"], "Abort");
        assert_eq!(abort["rover"], 0);
        assert_eq!(abort["step"], 0);
        assert!(abort["reason"].as_str().unwrap().contains("outside the map"));
        assert!(value["aborted"].as_str().unwrap().contains("outside the map"));
        assert!(value["report"].is_null());
    }
}
