//! Per-resource changes to a displayed fragment.
//!
//! Each change is sent to the renderer first; the local state is replaced
//! only when the renderer accepted it, so the stored state never claims
//! something the renderer is not drawing.

use super::{structure_spec, DisplaySynchronizer};
use crate::download::Fetcher;
use crate::error::AtlasError;
use crate::renderer::{MapAppearance, Renderer};
use crate::resources::{FragmentKey, ResourceKind, ResourceRef, ResourceType};
use crate::state::{DensityMapState, FragmentState, MapStyle};

impl<R: Renderer, F: Fetcher> DisplaySynchronizer<R, F> {
    /// Show or hide one resource of a displayed fragment.
    pub fn set_shown(
        &mut self,
        key: &FragmentKey,
        kind: ResourceKind,
        ty: ResourceType,
        shown: bool,
    ) -> Result<(), AtlasError> {
        let state = self.displayed_state(key, kind, ty)?.clone();
        if state.is_shown(kind, ty) == shown {
            return Ok(());
        }

        let reference = ResourceRef::new(key, kind, ty);
        if shown {
            let spec = match ty {
                ResourceType::Structure => structure_spec(&state, kind),
                ResourceType::DensityMap => {
                    let map = density_map(&state, kind)?;
                    self.density_map_spec(&state, kind, map)
                }
            };
            self.renderer.show(&reference, &spec)?;
        } else {
            self.renderer.hide(&reference)?;
        }

        let next = state.with_shown(kind, ty, shown);
        self.cache.set_displayed(next);
        log::debug!("{reference} shown: {shown}");
        Ok(())
    }

    /// Change the iso level of one density map. `iso` must be finite.
    pub fn set_density_map_iso(
        &mut self,
        key: &FragmentKey,
        kind: ResourceKind,
        iso: f64,
    ) -> Result<(), AtlasError> {
        if !iso.is_finite() {
            return Err(AtlasError::InvalidIso(iso));
        }
        let state = self
            .displayed_state(key, kind, ResourceType::DensityMap)?
            .clone();
        let map = density_map(&state, kind)?;
        let appearance = MapAppearance {
            iso,
            ..self.map_appearance(map)
        };

        let reference = ResourceRef::new(key, kind, ResourceType::DensityMap);
        self.renderer.update_density_map(&reference, &appearance)?;

        let next = state.with_iso(kind, iso);
        self.cache.set_displayed(next);
        log::debug!("{reference} iso: {iso}");
        Ok(())
    }

    /// Change the drawing style of one density map.
    pub fn set_density_map_style(
        &mut self,
        key: &FragmentKey,
        kind: ResourceKind,
        style: MapStyle,
    ) -> Result<(), AtlasError> {
        let state = self
            .displayed_state(key, kind, ResourceType::DensityMap)?
            .clone();
        let map = density_map(&state, kind)?;
        let appearance = MapAppearance {
            style,
            ..self.map_appearance(map)
        };

        let reference = ResourceRef::new(key, kind, ResourceType::DensityMap);
        self.renderer.update_density_map(&reference, &appearance)?;

        let next = state.with_style(kind, style);
        self.cache.set_displayed(next);
        log::debug!("{reference} style: {style:?}");
        Ok(())
    }

    fn displayed_state(
        &self,
        key: &FragmentKey,
        kind: ResourceKind,
        ty: ResourceType,
    ) -> Result<&FragmentState, AtlasError> {
        if !kind.exists_as(ty) {
            return Err(AtlasError::InvalidResource { kind, ty });
        }
        self.cache
            .displayed(key)
            .ok_or_else(|| AtlasError::NotDisplayed(key.clone()))
    }
}

fn density_map(
    state: &FragmentState,
    kind: ResourceKind,
) -> Result<&DensityMapState, AtlasError> {
    state.density_map(kind).ok_or(AtlasError::InvalidResource {
        kind,
        ty: ResourceType::DensityMap,
    })
}
