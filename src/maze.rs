use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::MazeError;
use crate::grid::{CellState, Direction, Grid, Pos};

pub const MIN_SIDE: usize = 5;

/// Every carved maze opens this cell, whatever the start cell was.
pub const SPAWN: Pos = Pos { x: 1, y: 1 };

/// Generate a perfect maze. The result depends only on the three arguments.
pub fn generate(width: usize, height: usize, seed: u64) -> Result<Grid, MazeError> {
    check_dimensions(width, height)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = Grid::filled(width, height);
    let passages = carve_maze(&mut grid, &mut rng);
    grid.set(SPAWN, CellState::Open);
    debug!(width, height, seed, passages, "maze generated");
    Ok(grid)
}

fn check_dimensions(width: usize, height: usize) -> Result<(), MazeError> {
    if width < MIN_SIDE || height < MIN_SIDE || width % 2 == 0 || height % 2 == 0 {
        return Err(MazeError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Knock down walls outward from a random odd cell until no cell two steps
/// away is still solid. Returns the number of passages carved.
fn carve_maze(grid: &mut Grid, rng: &mut impl Rng) -> usize {
    let width = grid.width();
    let height = grid.height();

    let start = Pos {
        x: rng.gen_range(1..=width - 2) | 1,
        y: rng.gen_range(1..=height - 2) | 1,
    };
    debug!(x = start.x, y = start.y, "carving from start cell");
    grid.set(start, CellState::Open);
    let mut frontier = vec![start];
    let mut passages = 0;

    while !frontier.is_empty() {
        let idx = rng.gen_range(0..frontier.len());
        let cell = frontier.swap_remove(idx);

        let mut dirs = [
            Direction::Right,
            Direction::Left,
            Direction::Down,
            Direction::Up,
        ];
        dirs.shuffle(rng);

        for dir in dirs {
            let Some(next) = two_steps(cell, dir, width, height) else {
                continue;
            };
            if grid.is_open(next) {
                continue;
            }
            grid.set(next, CellState::Open);
            grid.set(between(cell, next), CellState::Open);
            frontier.push(next);
            passages += 1;
        }
    }
    passages
}

/// The cell two steps away in `dir`, if it lies strictly inside the border.
fn two_steps(pos: Pos, dir: Direction, width: usize, height: usize) -> Option<Pos> {
    let (dx, dy) = dir.delta();
    let nx = pos.x as isize + dx * 2;
    let ny = pos.y as isize + dy * 2;
    if nx <= 0 || ny <= 0 || nx >= (width - 1) as isize || ny >= (height - 1) as isize {
        return None;
    }
    Some(Pos {
        x: nx as usize,
        y: ny as usize,
    })
}

fn between(a: Pos, b: Pos) -> Pos {
    Pos {
        x: (a.x + b.x) / 2,
        y: (a.y + b.y) / 2,
    }
}
