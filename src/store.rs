use std::collections::HashMap;

use tracing::debug;

use crate::error::MazeError;
use crate::grid::Grid;

/// Generated grids by world key.
#[derive(Debug, Default)]
pub struct WorldStore {
    worlds: HashMap<String, Grid>,
}

impl WorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `grid` under `key`, replacing whatever was there.
    pub fn put(&mut self, key: impl Into<String>, grid: Grid) {
        let key = key.into();
        let replaced = self.worlds.insert(key.clone(), grid).is_some();
        debug!(key = %key, replaced, "world stored");
    }

    pub fn get(&self, key: &str) -> Result<&Grid, MazeError> {
        self.worlds
            .get(key)
            .ok_or_else(|| MazeError::WorldNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.worlds.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.worlds.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellState, Pos};

    #[test]
    fn missing_key_is_world_not_found() {
        let store = WorldStore::new();
        assert!(store.is_empty());
        assert_eq!(
            store.get("0_0"),
            Err(MazeError::WorldNotFound("0_0".to_string()))
        );
    }

    #[test]
    fn put_then_get() {
        let mut store = WorldStore::new();
        store.put("0_0", Grid::filled(5, 5));
        assert!(store.contains("0_0"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("0_0").unwrap().width(), 5);
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["0_0"]);
    }

    #[test]
    fn put_replaces_existing_world() {
        let mut store = WorldStore::new();
        store.put("0_0", Grid::filled(5, 5));
        let mut second = Grid::filled(5, 5);
        second.set(Pos::new(1, 1), CellState::Open);
        store.put("0_0", second.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("0_0").unwrap(), &second);
    }
}
