use tracing::trace;

use crate::error::MazeError;
use crate::grid::{CellState, Direction, Pos};
use crate::store::WorldStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved,
    Blocked,
}

/// Active world key and the agent's position inside it.
///
/// Both are unset until a world is activated; after that the position always
/// names an open cell of the active grid.
#[derive(Debug, Default, Clone)]
pub struct NavigationState {
    world: Option<String>,
    position: Option<Pos>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `key` the active world and put the agent on `spawn`, which must
    /// be an open cell of the stored grid. On error nothing changes.
    pub fn activate(
        &mut self,
        store: &WorldStore,
        key: impl Into<String>,
        spawn: Pos,
    ) -> Result<(), MazeError> {
        let key = key.into();
        let grid = store.get(&key)?;
        match grid.cell_at(spawn.x as isize, spawn.y as isize)? {
            CellState::Open => {}
            CellState::Wall => {
                return Err(MazeError::SpawnBlocked {
                    x: spawn.x,
                    y: spawn.y,
                })
            }
        }
        self.world = Some(key);
        self.position = Some(spawn);
        Ok(())
    }

    pub fn world(&self) -> Option<&str> {
        self.world.as_deref()
    }

    pub fn position(&self) -> Option<Pos> {
        self.position
    }

    /// Step one cell in `dir`. Walls and the grid edge block the move and
    /// leave the position untouched.
    pub fn attempt_move(
        &mut self,
        store: &WorldStore,
        dir: Direction,
    ) -> Result<MoveResult, MazeError> {
        let key = self
            .world
            .as_deref()
            .ok_or_else(|| MazeError::WorldNotFound(String::new()))?;
        let grid = store.get(key)?;
        let Some(pos) = self.position else {
            return Err(MazeError::WorldNotFound(key.to_string()));
        };

        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        match grid.cell_at(nx, ny) {
            Ok(CellState::Open) => {
                let next = Pos {
                    x: nx as usize,
                    y: ny as usize,
                };
                self.position = Some(next);
                trace!(?dir, x = next.x, y = next.y, "agent moved");
                Ok(MoveResult::Moved)
            }
            Ok(CellState::Wall) | Err(MazeError::OutOfBounds { .. }) => {
                trace!(?dir, x = pos.x, y = pos.y, "move blocked");
                Ok(MoveResult::Blocked)
            }
            Err(err) => Err(err),
        }
    }
}
