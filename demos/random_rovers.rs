use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rover_engine::{Grid, GridSize, Heading, Instruction, Placement, Position, Rover, RoverId};
use std::io::stdout;

const INSTRUCTIONS: [Instruction; 3] = [
    Instruction::TurnLeft,
    Instruction::TurnRight,
    Instruction::Move,
];

struct RandomDriver {
    rng: StdRng,
}

impl RandomDriver {
    fn new(seed: u64) -> RandomDriver {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn heading(&mut self) -> Heading {
        match self.rng.gen_range(0..4) {
            0 => Heading::North,
            1 => Heading::East,
            2 => Heading::South,
            _ => Heading::West,
        }
    }

    fn commands(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| INSTRUCTIONS[self.rng.gen_range(0..INSTRUCTIONS.len())].as_char())
            .collect()
    }
}

fn main() {
    let size = GridSize::new(9, 9);
    let mut grid = Grid::new(size).expect("a 10x10 grid is valid");
    let mut driver = RandomDriver::new(0);
    let mut rovers = Vec::new();

    // Place rovers on the diagonal so they never start on the same cell
    for i in 0..5 {
        let placement = Placement::new(Position::new(i * 2, i * 2), driver.heading());
        let rover = Rover::place(RoverId(rovers.len()), placement, &mut grid)
            .expect("diagonal cells are free");
        rovers.push(rover);
    }

    // Rovers that hit an edge or another rover simply stop where they are
    let mut stopped = Vec::new();
    for rover in rovers.iter_mut() {
        let commands = driver.commands(12);
        if let Err(e) = rover.run_commands(&mut grid, &commands) {
            stopped.push(format!("Rover {} stopped: {}", rover.id(), e));
        }
    }

    grid.draw(&rovers, &mut stdout()).expect("stdout is writable");
    for line in stopped {
        println!("{}", line);
    }
}
