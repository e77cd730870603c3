use rover_engine::{
    input_lines, parse_commands, simulate, Heading, Mission, MoveBlocker, Position, RoverError,
    RoverId, RoverReport, Simulation,
};
use std::fs;
use std::path::Path;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test_data")
        .join(name);
    match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => panic!("Error reading fixture {}: {}", path.display(), e),
    }
}

#[test]
fn when_one_rover_moves_north_its_new_position_is_reported() {
    let report = simulate(&fixture("single_move.txt")).unwrap();

    assert_eq!(report, "0 1 N\n==========\n");
}

#[test]
fn when_a_rover_leaves_a_single_cell_map_the_run_fails() {
    let error = simulate(&fixture("off_the_map.txt")).unwrap_err();

    assert!(matches!(
        error,
        RoverError::InvalidMove {
            rover: RoverId(0),
            reason: MoveBlocker::OutOfBounds,
            ..
        }
    ));
}

#[test]
fn when_two_rovers_follow_the_classic_instructions_both_are_reported_in_order() {
    let report = simulate(&fixture("two_rovers.txt")).unwrap();

    assert_eq!(report, "1 3 N\n5 1 E\n==========\n");
}

#[test]
fn when_a_second_rover_starts_on_the_first_rovers_cell_a_collision_is_returned() {
    let error = simulate(&fixture("shared_start.txt")).unwrap_err();

    assert!(matches!(
        error,
        RoverError::PlacementCollision {
            position: Position { x: 1, y: 2 },
            occupant: RoverId(0),
        }
    ));
}

#[test]
fn when_instructions_contain_an_unknown_letter_a_format_error_is_returned() {
    let error = simulate(&fixture("bad_instructions.txt")).unwrap_err();

    assert!(matches!(error, RoverError::Format { line: 2, .. }));
}

#[test]
fn when_a_rover_is_placed_outside_the_map_a_boundary_error_is_returned() {
    let error = simulate(&fixture("outside_placement.txt")).unwrap_err();

    assert!(matches!(error, RoverError::Boundary { line: Some(1), .. }));
}

#[test]
fn when_the_file_ends_with_blank_lines_they_are_ignored() {
    let report = simulate(&fixture("trailing_blank_lines.txt")).unwrap();

    assert_eq!(report, "0 4 N\n4 1 E\n==========\n");
}

#[test]
fn when_running_step_by_step_the_grid_matches_the_report() {
    let contents = fixture("two_rovers.txt");
    let records = parse_commands(input_lines(&contents)).unwrap();
    let mission = Mission::from_records(records).unwrap();
    let mut simulation = Simulation::new(mission.size).unwrap();

    let report = simulation.execute(&mission.deployments).unwrap();

    assert_eq!(
        report,
        vec![
            RoverReport {
                x: 1,
                y: 3,
                heading: Heading::North
            },
            RoverReport {
                x: 5,
                y: 1,
                heading: Heading::East
            },
        ]
    );
    assert_eq!(simulation.grid().cells(), 36);
    assert_eq!(
        simulation.grid().occupied(),
        vec![
            (Position::new(5, 1), RoverId(1)),
            (Position::new(1, 3), RoverId(0)),
        ]
    );
}
