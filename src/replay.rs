use crate::error::Result;
use crate::map::{GridSize, Position, RoverId};
use crate::rover::{Heading, Placement};
use crate::simulation::RoverReport;
use serde_json::json;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use uuid::Uuid;

pub fn create_replay_logger(filename: Option<PathBuf>, size: GridSize) -> Box<dyn ReplayLogger> {
    match filename {
        None => Box::new(NoOpReplayLogger {}),
        Some(filename) => Box::new(JsonReplayLogger::new(filename, size)),
    }
}

/// Records what happened during a run.
pub trait ReplayLogger {
    #[allow(unused_variables)]
    fn log_event(&mut self, event: Event) {}

    #[allow(unused_variables)]
    fn log_report(&mut self, report: &[RoverReport]) {}

    fn save(&self) -> Result<()> {
        Ok(())
    }

    fn log_place(&mut self, rover: RoverId, placement: Placement) {
        self.log_event(Event {
            event_type: EventType::Place,
            rover: Some(rover.0),
            step: None,
            location: Some(placement.position),
            destination: None,
            heading: Some(placement.heading),
            reason: None,
        });
    }

    fn log_turn(&mut self, rover: RoverId, step: usize, location: Position, heading: Heading) {
        self.log_event(Event {
            event_type: EventType::Turn,
            rover: Some(rover.0),
            step: Some(step),
            location: Some(location),
            destination: None,
            heading: Some(heading),
            reason: None,
        });
    }

    fn log_move(&mut self, rover: RoverId, step: usize, location: Position, destination: Position) {
        self.log_event(Event {
            event_type: EventType::Move,
            rover: Some(rover.0),
            step: Some(step),
            location: Some(location),
            destination: Some(destination),
            heading: None,
            reason: None,
        });
    }

    /// Records the error that stopped the run. `rover` is the rover that
    /// failed to move, if the error came from a move.
    fn log_abort(&mut self, rover: Option<RoverId>, step: usize, reason: String) {
        self.log_event(Event {
            event_type: EventType::Abort,
            rover: rover.map(|rover| rover.0),
            step: Some(step),
            location: None,
            destination: None,
            heading: None,
            reason: Some(reason),
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum EventType {
    Place,
    Turn,
    Move,
    Abort,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Event {
    event_type: EventType,
    rover: Option<usize>,
    step: Option<usize>,
    location: Option<Position>,
    destination: Option<Position>,
    heading: Option<Heading>,
    reason: Option<String>,
}

struct NoOpReplayLogger;
impl ReplayLogger for NoOpReplayLogger {}

struct JsonReplayLogger {
    filename: PathBuf,
    run_id: Uuid,
    size: GridSize,
    events: Vec<Event>,
    report: Option<Vec<RoverReport>>,
}

impl JsonReplayLogger {
    fn new(filename: PathBuf, size: GridSize) -> JsonReplayLogger {
        JsonReplayLogger {
            filename,
            run_id: Uuid::new_v4(),
            size,
            events: Vec::new(),
            report: None,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        let aborted = self
            .events
            .iter()
            .find(|event| event.event_type == EventType::Abort)
            .and_then(|event| event.reason.as_deref());

        json!({
            "run_id": self.run_id,
            "map": {
                "max_x": self.size.max_x,
                "max_y": self.size.max_y,
            },
            "events": self.events,
            "report": self.report,
            "aborted": aborted,
        })
    }
}

impl ReplayLogger for JsonReplayLogger {
    fn log_event(&mut self, event: Event) {
        self.events.push(event);
    }

    fn log_report(&mut self, report: &[RoverReport]) {
        self.report = Some(report.to_vec());
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.filename)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.to_json())?;
        writer.flush()?;

        info!(path = %self.filename.display(), events = self.events.len(), "saved replay");
        Ok(())
    }
}
