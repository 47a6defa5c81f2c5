//! Seeded perfect-maze generation and single-agent navigation.

pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod maze;
pub mod nav;
pub mod store;

pub use error::MazeError;
pub use game::GameState;
pub use grid::{CellState, Direction, Grid, Pos};
pub use nav::{MoveResult, NavigationState};
pub use store::WorldStore;
