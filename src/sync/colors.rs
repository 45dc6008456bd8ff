//! Recoloring of displayed fragments.

use super::{notify, structure_spec, DisplaySynchronizer};
use crate::color::Color;
use crate::download::Fetcher;
use crate::error::AtlasError;
use crate::renderer::{Renderer, RendererError, ShowSpec};
use crate::resources::{FragmentKey, ResourceKind, ResourceRef, ResourceType};
use crate::state::FragmentState;

impl<R: Renderer, F: Fetcher> DisplaySynchronizer<R, F> {
    /// Replace the color of one kind of a displayed fragment.
    ///
    /// Shown resources of that kind are drawn again with the new color
    /// before the state is stored.
    pub fn set_color(
        &mut self,
        key: &FragmentKey,
        kind: ResourceKind,
        color: Color,
    ) -> Result<(), AtlasError> {
        let state = self
            .cache
            .displayed(key)
            .ok_or_else(|| AtlasError::NotDisplayed(key.clone()))?
            .clone();
        let next = state.with_color(kind, color);

        self.redraw(&state, &next, Some(kind))?;
        self.cache.set_displayed(next);
        log::debug!("fragment {key}: {kind} color set to {}", color.to_style());
        notify(&mut self.on_colors_changed, key);
        Ok(())
    }

    /// Hand out hues again from the configured start, to every displayed
    /// fragment in key order.
    ///
    /// Stops at the first renderer failure; fragments recolored before it
    /// keep their new colors.
    pub fn reset_colors(&mut self) -> Result<(), AtlasError> {
        self.hues = self.initial_hues;
        let keys: Vec<_> = self
            .cache
            .displayed_fragments()
            .into_iter()
            .map(|s| s.key().clone())
            .collect();

        for key in &keys {
            let Some(state) = self.cache.displayed(key).cloned() else {
                continue;
            };
            let next = state.with_hue(self.hues.current());
            self.redraw(&state, &next, None)?;
            self.cache.set_displayed(next);
            self.hues.advance();
            notify(&mut self.on_colors_changed, key);
        }
        log::info!("reset colors of {} fragment(s)", keys.len());
        Ok(())
    }

    /// Show every shown resource of `next` (optionally only one kind) with
    /// its colors. On failure the ones already redrawn get `old`'s colors
    /// back.
    fn redraw(
        &mut self,
        old: &FragmentState,
        next: &FragmentState,
        only: Option<ResourceKind>,
    ) -> Result<(), RendererError> {
        let before = self.shown_specs(old, only);
        let after = self.shown_specs(next, only);

        for (i, (reference, spec)) in after.iter().enumerate() {
            if let Err(e) = self.renderer.show(reference, spec) {
                for (r, previous) in &before[..i] {
                    if let Err(undo) = self.renderer.show(r, previous) {
                        log::warn!("could not restore colors of {r}: {undo}");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn shown_specs(
        &self,
        state: &FragmentState,
        only: Option<ResourceKind>,
    ) -> Vec<(ResourceRef, ShowSpec)> {
        let wanted = |kind: ResourceKind| only.is_none_or(|k| k == kind);
        let key = state.key();

        let structures = state
            .structures()
            .filter(|(kind, s)| s.shown && wanted(*kind))
            .map(|(kind, _)| {
                (
                    ResourceRef::new(key, kind, ResourceType::Structure),
                    structure_spec(state, kind),
                )
            });
        let maps = state
            .density_maps()
            .filter(|(kind, m)| m.shown && wanted(*kind))
            .map(|(kind, map)| {
                (
                    ResourceRef::new(key, kind, ResourceType::DensityMap),
                    self.density_map_spec(state, kind, map),
                )
            });
        structures.chain(maps).collect()
    }
}
