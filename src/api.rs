//! Registry of synchronizer instances addressed by id.
//!
//! Embedding code (a UI, a scripting bridge) talks to viewers by name
//! instead of holding them directly. Each instance sits behind its own
//! mutex, so calls on one viewer are serialized while different viewers
//! stay independent.

use std::sync::{Mutex, MutexGuard};

use rustc_hash::FxHashMap;

use crate::color::{ColorFormat, ColorInfo};
use crate::download::Fetcher;
use crate::error::AtlasError;
use crate::renderer::Renderer;
use crate::resources::{FragmentKey, ResourceKind};
use crate::sync::DisplaySynchronizer;

/// Named synchronizer instances.
pub struct Api<R, F> {
    instances: FxHashMap<String, Mutex<DisplaySynchronizer<R, F>>>,
}

impl<R, F> Default for Api<R, F> {
    fn default() -> Self {
        Self {
            instances: FxHashMap::default(),
        }
    }
}

impl<R: Renderer, F: Fetcher> Api<R, F> {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sync` under `id`.
    pub fn bind(
        &mut self,
        id: impl Into<String>,
        sync: DisplaySynchronizer<R, F>,
    ) -> Result<(), AtlasError> {
        let id = id.into();
        if self.instances.contains_key(&id) {
            return Err(AtlasError::InstanceAlreadyBound(id));
        }
        log::debug!("bound instance {id}");
        let _ = self.instances.insert(id, Mutex::new(sync));
        Ok(())
    }

    /// Take the instance bound under `id` out of the registry.
    ///
    /// A poisoned instance is handed back as is; its state is whatever the
    /// panicking call left behind.
    pub fn unbind(&mut self, id: &str) -> Option<DisplaySynchronizer<R, F>> {
        let sync = self.instances.remove(id)?;
        log::debug!("unbound instance {id}");
        Some(
            sync.into_inner()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }

    /// Bound ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.instances.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Run `f` with exclusive access to instance `id`.
    pub fn with<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut DisplaySynchronizer<R, F>) -> Result<T, AtlasError>,
    ) -> Result<T, AtlasError> {
        let mut sync = self.lock(id)?;
        f(&mut sync)
    }

    /// Display a fragment on instance `id`.
    pub fn add(
        &self,
        id: &str,
        class_code: &str,
        sequence: &str,
        shown_structures: &[ResourceKind],
        shown_density_maps: &[ResourceKind],
    ) -> Result<(), AtlasError> {
        let key = FragmentKey::new(class_code, sequence);
        self.with(id, |sync| {
            sync.add(&key, shown_structures, shown_density_maps)
        })
    }

    /// Whether instance `id` displays the fragment.
    pub fn has(
        &self,
        id: &str,
        class_code: &str,
        sequence: &str,
    ) -> Result<bool, AtlasError> {
        let key = FragmentKey::new(class_code, sequence);
        self.with(id, |sync| Ok(sync.has(&key)))
    }

    /// Load `(class_code, sequence)` pairs on instance `id`.
    pub fn load(
        &self,
        id: &str,
        fragments: &[(&str, &str)],
    ) -> Result<(), AtlasError> {
        let keys: Vec<_> = fragments
            .iter()
            .map(|(code, seq)| FragmentKey::new(*code, *seq))
            .collect();
        self.with(id, |sync| sync.load(&keys))
    }

    /// [`load`](Api::load), reporting `progress(done, total)` after each
    /// fragment that needed loading.
    pub fn load_with_progress(
        &self,
        id: &str,
        fragments: &[(&str, &str)],
        progress: impl FnMut(usize, usize),
    ) -> Result<(), AtlasError> {
        let keys: Vec<_> = fragments
            .iter()
            .map(|(code, seq)| FragmentKey::new(*code, *seq))
            .collect();
        self.with(id, |sync| sync.load_with_progress(&keys, progress))
    }

    /// Remove a fragment from the display of instance `id`.
    pub fn remove(
        &self,
        id: &str,
        class_code: &str,
        sequence: &str,
    ) -> Result<(), AtlasError> {
        let key = FragmentKey::new(class_code, sequence);
        self.with(id, |sync| sync.remove(&key))
    }

    /// Unload a fragment from instance `id`.
    pub fn unload(
        &self,
        id: &str,
        class_code: &str,
        sequence: &str,
    ) -> Result<(), AtlasError> {
        let key = FragmentKey::new(class_code, sequence);
        self.with(id, |sync| sync.unload(&key))
    }

    /// Colors of a fragment on instance `id`.
    pub fn fragment_colors(
        &self,
        id: &str,
        class_code: &str,
        sequence: &str,
        format: ColorFormat,
    ) -> Result<Option<ColorInfo>, AtlasError> {
        let key = FragmentKey::new(class_code, sequence);
        self.with(id, |sync| Ok(sync.fragment_colors(&key, format)))
    }

    /// Recolor every displayed fragment of instance `id` from the first hue.
    pub fn reset_colors(&self, id: &str) -> Result<(), AtlasError> {
        self.with(id, DisplaySynchronizer::reset_colors)
    }

    /// Set the added-fragment callback of instance `id`.
    pub fn set_on_fragment_added(
        &self,
        id: &str,
        callback: impl FnMut(&FragmentKey) + Send + 'static,
    ) -> Result<(), AtlasError> {
        self.with(id, |sync| {
            sync.set_on_fragment_added(callback);
            Ok(())
        })
    }

    /// Set the removed-fragment callback of instance `id`.
    pub fn set_on_fragment_removed(
        &self,
        id: &str,
        callback: impl FnMut(&FragmentKey) + Send + 'static,
    ) -> Result<(), AtlasError> {
        self.with(id, |sync| {
            sync.set_on_fragment_removed(callback);
            Ok(())
        })
    }

    /// Set the colors-changed callback of instance `id`.
    pub fn set_on_fragment_colors_changed(
        &self,
        id: &str,
        callback: impl FnMut(&FragmentKey) + Send + 'static,
    ) -> Result<(), AtlasError> {
        self.with(id, |sync| {
            sync.set_on_fragment_colors_changed(callback);
            Ok(())
        })
    }

    fn lock(
        &self,
        id: &str,
    ) -> Result<MutexGuard<'_, DisplaySynchronizer<R, F>>, AtlasError> {
        let sync = self
            .instances
            .get(id)
            .ok_or_else(|| AtlasError::UnknownInstance(id.to_owned()))?;
        sync.lock()
            .map_err(|_| AtlasError::LockPoisoned(id.to_owned()))
    }
}
