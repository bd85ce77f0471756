use crate::maze::Maze;
use crate::variant::MazeVariant;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

/// Memoizes [`Maze::build`] by `(variant, seed)`. A cache hit returns the
/// same `Arc`, so two callers asking for the same layout share one
/// allocation and compare equal by value as well as by pointer.
#[derive(Default)]
pub struct MazeCache {
    entries: RwLock<HashMap<(MazeVariant, u64), Arc<Maze>>>,
}

impl MazeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached maze for `(variant, seed)`, building and
    /// inserting it on a miss.
    pub fn get(&self, variant: MazeVariant, seed: u64) -> Arc<Maze> {
        if let Some(maze) = self.entries.read().unwrap().get(&(variant, seed)) {
            return maze.clone();
        }
        let mut entries = self.entries.write().unwrap();
        entries
            .entry((variant, seed))
            .or_insert_with(|| Arc::new(Maze::build(variant, seed)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
