// crates/addresslookup-core/src/hierarchy.rs

use crate::cache::CacheStore;

/// Drill-down path: cache indices from the root query (bottom) to the level
/// currently displayed (top).
///
/// An empty stack means no search has completed since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionHierarchy {
    levels: Vec<usize>,
}

impl SuggestionHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize) {
        self.levels.push(index);
    }

    /// Removes the top level and returns it. A no-op at depth 0.
    pub fn pop(&mut self) -> Option<usize> {
        self.levels.pop()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Cache index of the level currently displayed.
    pub fn top(&self) -> Option<usize> {
        self.levels.last().copied()
    }

    /// Cache index one level up; only exists when depth > 1.
    pub fn parent(&self) -> Option<usize> {
        self.levels.len().checked_sub(2).map(|i| self.levels[i])
    }

    /// Label of the parent level, used for the back row.
    pub fn parent_label<'a>(&self, cache: &'a CacheStore) -> Option<&'a str> {
        self.parent()
            .and_then(|i| cache.get(i))
            .map(|entry| entry.label.as_str())
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}
