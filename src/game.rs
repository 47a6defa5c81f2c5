use std::collections::HashMap;

use tracing::info;

use crate::error::MazeError;
use crate::grid::{Direction, Grid, Pos};
use crate::maze::{self, SPAWN};
use crate::nav::{MoveResult, NavigationState};
use crate::store::WorldStore;

/// Everything the UI needs: the stored worlds and the agent walking one of
/// them. Owned by the caller and passed to each operation.
#[derive(Debug, Default)]
pub struct GameState {
    store: WorldStore,
    nav: NavigationState,
    seeds: HashMap<String, u64>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a maze, store it under `key` (replacing any previous one) and
    /// drop the agent on the spawn cell of the new world.
    pub fn generate_world(
        &mut self,
        key: &str,
        width: usize,
        height: usize,
        seed: u64,
    ) -> Result<&Grid, MazeError> {
        let grid = maze::generate(width, height, seed)?;
        self.store.put(key, grid);
        self.seeds.insert(key.to_string(), seed);
        self.nav.activate(&self.store, key, SPAWN)?;
        info!(key, width, height, seed, "world generated");
        self.store.get(key)
    }

    pub fn current_grid(&self, key: &str) -> Result<&Grid, MazeError> {
        self.store.get(key)
    }

    pub fn active_grid(&self) -> Result<&Grid, MazeError> {
        let key = self
            .nav
            .world()
            .ok_or_else(|| MazeError::WorldNotFound(String::new()))?;
        self.store.get(key)
    }

    pub fn move_agent(&mut self, dir: Direction) -> Result<MoveResult, MazeError> {
        self.nav.attempt_move(&self.store, dir)
    }

    pub fn agent_position(&self) -> Option<Pos> {
        self.nav.position()
    }

    pub fn active_world(&self) -> Option<&str> {
        self.nav.world()
    }

    /// Seed the given world was last generated with.
    pub fn seed_of(&self, key: &str) -> Option<u64> {
        self.seeds.get(key).copied()
    }

    pub fn worlds(&self) -> &WorldStore {
        &self.store
    }
}
