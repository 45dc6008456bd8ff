//! Fragment lifecycle: load, add, remove, unload.

use super::{notify, structure_spec, DisplaySynchronizer};
use crate::download::{download_batch, DownloadedResource, Fetcher, ResourcePayload};
use crate::error::AtlasError;
use crate::iso::ValueRange;
use crate::renderer::{Renderer, RendererError};
use crate::resources::{
    self, FragmentKey, ResourceKind, ResourceRef, ResourceType,
    DENSITY_MAP_KINDS,
};
use crate::state::FragmentState;

/// What disposing a fragment does to each of its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposal {
    /// Drop the representation only.
    Hide,
    /// Drop the representation and the data.
    Unload,
}

impl<R: Renderer, F: Fetcher> DisplaySynchronizer<R, F> {
    /// Download and register every fragment in `keys` that is not loaded.
    ///
    /// Fragments are processed one after another. A fragment whose bundle
    /// fails is skipped and its messages are collected; the others still
    /// load. If anything failed the call returns [`AtlasError::Load`] with
    /// every message, and callers must check [`is_loaded`] to learn which
    /// fragments made it.
    ///
    /// [`is_loaded`]: DisplaySynchronizer::is_loaded
    pub fn load(&mut self, keys: &[FragmentKey]) -> Result<(), AtlasError> {
        self.load_with_progress(keys, |_, _| {})
    }

    /// [`load`](DisplaySynchronizer::load), calling `progress(done, total)`
    /// after each fragment that needed loading, whether it succeeded or
    /// not. `total` is the length of `keys`, including fragments that were
    /// already loaded and are skipped without a call.
    pub fn load_with_progress(
        &mut self,
        keys: &[FragmentKey],
        mut progress: impl FnMut(usize, usize),
    ) -> Result<(), AtlasError> {
        let mut errors = Vec::new();
        let mut done = 0;

        for key in keys {
            if self.cache.is_loaded(key) {
                continue;
            }
            if let Err(e) = self.load_one(key) {
                errors.extend(e);
            }
            done += 1;
            progress(done, keys.len());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AtlasError::Load(errors))
        }
    }

    /// Download and register one bundle, returning its failure messages.
    fn load_one(&mut self, key: &FragmentKey) -> Result<(), Vec<String>> {
        log::debug!("downloading fragment {key} from {}", self.links.root());
        let descriptors = self.links.bundle(key);
        let resources =
            download_batch(&self.fetcher, &descriptors).map_err(|e| {
                log::warn!("failed to download fragment {key}: {e}");
                e.messages()
            })?;

        self.register_bundle(key, &resources).map_err(|e| {
            log::warn!("failed to register fragment {key}: {e}");
            vec![e.to_string()]
        })?;
        self.cache.mark_loaded(key.clone());
        log::info!("loaded fragment {key}");
        Ok(())
    }

    /// Display a fragment, loading it first if needed.
    ///
    /// Does nothing if the fragment is already displayed. Listed kinds are
    /// shown, all others start hidden. No display state is committed unless
    /// every requested show succeeds. Each committed add takes the next hue,
    /// so a fragment removed and added again gets new colors.
    pub fn add(
        &mut self,
        key: &FragmentKey,
        shown_structures: &[ResourceKind],
        shown_density_maps: &[ResourceKind],
    ) -> Result<(), AtlasError> {
        if self.cache.is_displayed(key) {
            return Ok(());
        }
        if shown_density_maps.contains(&ResourceKind::Reference) {
            return Err(AtlasError::InvalidResource {
                kind: ResourceKind::Reference,
                ty: ResourceType::DensityMap,
            });
        }

        if !self.cache.is_loaded(key) {
            self.load(std::slice::from_ref(key))?;
        }

        let ranges = self.volume_ranges(key)?;
        let hue = self.hues.current();
        let state = FragmentState::new(
            key.clone(),
            hue,
            shown_structures,
            shown_density_maps,
            ranges,
            self.default_style,
        );

        self.show_initial(&state)?;

        self.cache.set_displayed(state);
        self.hues.advance();
        log::info!("added fragment {key} with hue {hue}");
        notify(&mut self.on_added, key);
        Ok(())
    }

    /// Hide every resource of a displayed fragment and drop its display
    /// state. The data stays registered, so adding it again does not
    /// download anything.
    pub fn remove(&mut self, key: &FragmentKey) -> Result<(), AtlasError> {
        if !self.cache.is_displayed(key) {
            log::debug!("remove: fragment {key} is not displayed");
            return Ok(());
        }

        self.dispose(key, Disposal::Hide)?;
        let _ = self.cache.delete_displayed(key);
        log::info!("removed fragment {key}");
        notify(&mut self.on_removed, key);
        Ok(())
    }

    /// Drop every resource of a fragment from the renderer, along with its
    /// display state. The next `add` or `load` downloads it again.
    pub fn unload(&mut self, key: &FragmentKey) -> Result<(), AtlasError> {
        let displayed = self.cache.is_displayed(key);
        if !displayed && !self.cache.is_loaded(key) {
            log::debug!("unload: fragment {key} is not loaded");
            return Ok(());
        }

        self.dispose(key, Disposal::Unload)?;
        let _ = self.cache.delete_displayed(key);
        self.cache.mark_unloaded(key);
        log::info!("unloaded fragment {key}");
        if displayed {
            notify(&mut self.on_removed, key);
        }
        Ok(())
    }

    /// Register a downloaded bundle. On failure, resources registered so
    /// far are unloaded again.
    fn register_bundle(
        &mut self,
        key: &FragmentKey,
        resources: &[DownloadedResource],
    ) -> Result<(), RendererError> {
        let mut registered = Vec::with_capacity(resources.len());

        for resource in resources {
            let reference = ResourceRef::new(key, resource.kind, resource.ty);
            let outcome = match &resource.data {
                ResourcePayload::Text(text) => {
                    self.renderer.register_structure(text, &reference)
                }
                ResourcePayload::Binary(bytes) => {
                    self.renderer.register_volume(bytes, &reference)
                }
            };

            if let Err(e) = outcome {
                for r in registered.iter().rev() {
                    if let Err(undo) = self.renderer.unload(r) {
                        log::warn!("could not roll back {r}: {undo}");
                    }
                }
                return Err(e);
            }
            log::debug!("registered {reference}");
            registered.push(reference);
        }
        Ok(())
    }

    /// Native value ranges of the density maps, in canonical order.
    fn volume_ranges(
        &self,
        key: &FragmentKey,
    ) -> Result<[ValueRange; 3], RendererError> {
        let mut ranges = [ValueRange::new(0.0, 0.0); 3];
        for (slot, kind) in ranges.iter_mut().zip(DENSITY_MAP_KINDS) {
            let reference = ResourceRef::new(key, kind, ResourceType::DensityMap);
            *slot = self.renderer.volume_range(&reference)?;
        }
        Ok(ranges)
    }

    /// Show every resource flagged as shown, structures first. If a show
    /// fails, the ones already issued are hidden again.
    fn show_initial(&mut self, state: &FragmentState) -> Result<(), RendererError> {
        let mut shown = Vec::new();
        let outcome = self.show_flagged(state, &mut shown);

        if outcome.is_err() {
            for r in shown.iter().rev() {
                if let Err(e) = self.renderer.hide(r) {
                    log::warn!("could not hide {r} after failed add: {e}");
                }
            }
        }
        outcome
    }

    fn show_flagged(
        &mut self,
        state: &FragmentState,
        shown: &mut Vec<ResourceRef>,
    ) -> Result<(), RendererError> {
        let key = state.key();

        for (kind, structure) in state.structures() {
            if !structure.shown {
                continue;
            }
            let reference = ResourceRef::new(key, kind, ResourceType::Structure);
            self.renderer.show(&reference, &structure_spec(state, kind))?;
            log::debug!("showed {reference}");
            shown.push(reference);
        }

        for (kind, map) in state.density_maps() {
            if !map.shown {
                continue;
            }
            let reference = ResourceRef::new(key, kind, ResourceType::DensityMap);
            let spec = self.density_map_spec(state, kind, map);
            self.renderer.show(&reference, &spec)?;
            log::debug!("showed {reference}");
            shown.push(reference);
        }
        Ok(())
    }

    /// Apply `disposal` to the full resource set of `key`, density maps
    /// first. Stops at the first renderer failure.
    fn dispose(
        &mut self,
        key: &FragmentKey,
        disposal: Disposal,
    ) -> Result<(), RendererError> {
        for (kind, ty) in resources::bundle() {
            let reference = ResourceRef::new(key, kind, ty);
            match disposal {
                Disposal::Hide => self.renderer.hide(&reference)?,
                Disposal::Unload => self.renderer.unload(&reference)?,
            }
            log::debug!("{disposal:?}: {reference}");
        }
        Ok(())
    }
}
