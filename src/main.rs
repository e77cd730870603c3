//! Runs a rover simulation from a file or from lines typed on the console.
//!
//! Usage: `rover_sim [FILE] [--replay PATH] [--draw]`

use clap::Parser;
use rover_engine::{
    format_report, input_lines, parse_commands, CommandParser, CommandRecord, Mission, Result,
    Simulation, SimulationOptions,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rover_sim")]
#[command(about = "Drive rovers over a bounded grid and report where they end up")]
struct Args {
    /// Input file. Without it, lines are read from the console until a blank line
    file: Option<PathBuf>,

    /// Write a JSON replay of the run to this path
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Draw the final grid before printing the report
    #[arg(long)]
    draw: bool,
}

fn main() {
    init_logging();

    let args = Args::parse();
    if let Err(error) = run(&args) {
        error!("{}", error);
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let records = match &args.file {
        Some(path) => read_file(path)?,
        None => read_console()?,
    };

    let mission = Mission::from_records(records)?;
    let options = SimulationOptions {
        replay: args.replay.clone(),
    };
    let mut simulation = Simulation::with_options(mission.size, options)?;
    let report = simulation.execute(&mission.deployments)?;

    let mut stdout = io::stdout().lock();
    if args.draw {
        simulation.draw(&mut stdout)?;
    }
    write!(stdout, "{}", format_report(&report))?;
    stdout.flush()?;

    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<CommandRecord>> {
    info!(path = %path.display(), "reading input file");
    let contents = fs::read_to_string(path)?;
    parse_commands(input_lines(&contents))
}

/// Reads and validates lines one at a time until a blank line or end of input.
fn read_console() -> Result<Vec<CommandRecord>> {
    let mut stderr = io::stderr();
    write!(
        stderr,
        "Ready for data entry. When complete, enter a blank line.\n>"
    )?;
    stderr.flush()?;

    let mut parser = CommandParser::new();
    let mut records = Vec::new();

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }

        records.push(parser.parse_next(&line)?);
        write!(stderr, ">")?;
        stderr.flush()?;
    }

    Ok(records)
}
