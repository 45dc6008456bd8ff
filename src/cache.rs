//! Bookkeeping of which fragments are loaded and which are displayed.
//!
//! A fragment is *loaded* once all of its resources are downloaded and
//! registered with the renderer, and *displayed* while it has a
//! [`FragmentState`]. Displayed fragments are always loaded; the
//! orchestrator maintains that by ordering its calls, the cache does not
//! check it.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::resources::FragmentKey;
use crate::state::FragmentState;

/// Loaded set and displayed map.
#[derive(Debug, Default)]
pub struct FragmentCache {
    loaded: FxHashSet<FragmentKey>,
    displayed: FxHashMap<FragmentKey, FragmentState>,
}

impl FragmentCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether all resources of `key` are registered with the renderer.
    #[must_use]
    pub fn is_loaded(&self, key: &FragmentKey) -> bool {
        self.loaded.contains(key)
    }

    /// Whether `key` has display state.
    #[must_use]
    pub fn is_displayed(&self, key: &FragmentKey) -> bool {
        self.displayed.contains_key(key)
    }

    /// Record that all resources of `key` are registered.
    pub fn mark_loaded(&mut self, key: FragmentKey) {
        let _ = self.loaded.insert(key);
    }

    /// Forget that `key` is loaded. Callers delete its display state first.
    pub fn mark_unloaded(&mut self, key: &FragmentKey) {
        let _ = self.loaded.remove(key);
    }

    /// Display state of `key`.
    #[must_use]
    pub fn displayed(&self, key: &FragmentKey) -> Option<&FragmentState> {
        self.displayed.get(key)
    }

    /// Store (or replace) the display state of its fragment.
    pub fn set_displayed(&mut self, state: FragmentState) {
        let _ = self.displayed.insert(state.key().clone(), state);
    }

    /// Drop the display state of `key`, returning it.
    pub fn delete_displayed(
        &mut self,
        key: &FragmentKey,
    ) -> Option<FragmentState> {
        self.displayed.remove(key)
    }

    /// All displayed fragments, sorted by key.
    #[must_use]
    pub fn displayed_fragments(&self) -> Vec<&FragmentState> {
        let mut states: Vec<_> = self.displayed.values().collect();
        states.sort_by(|a, b| a.key().cmp(b.key()));
        states
    }
}
