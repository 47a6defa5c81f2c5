use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    /// Width and height must both be odd and at least 5.
    #[error("invalid maze dimensions {width}x{height}: both sides must be odd and at least 5")]
    InvalidDimensions { width: usize, height: usize },
    #[error("world not found: {0:?}")]
    WorldNotFound(String),
    #[error("spawn cell ({x}, {y}) is a wall")]
    SpawnBlocked { x: usize, y: usize },
    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: isize, y: isize },
}
