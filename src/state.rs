//! Display state of one fragment.
//!
//! [`FragmentState`] is a value type. Updates go through `with_*` methods
//! that return a modified copy, which the cache then stores in place of the
//! old value, so a reader never observes a half-applied change.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::{palette, Color, Palette};
use crate::iso::{default_iso, iso_bounds, IsoBounds, ValueRange};
use crate::resources::{
    FragmentKey, ResourceKind, ResourceType, DENSITY_MAP_KINDS, STRUCTURE_KINDS,
};

/// How a density map isosurface is drawn.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    /// Filled surface.
    #[default]
    Solid,
    /// Mesh lines only.
    Wireframe,
    /// Surface and mesh together.
    Both,
}

impl MapStyle {
    /// Renderer visuals making up this style.
    #[must_use]
    pub fn visuals(self) -> &'static [&'static str] {
        match self {
            Self::Solid => &["solid"],
            Self::Wireframe => &["wireframe"],
            Self::Both => &["solid", "wireframe"],
        }
    }
}

/// Display state of one structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructureState {
    /// Whether the structure is rendered.
    pub shown: bool,
}

/// Display state of one density map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityMapState {
    /// Whether the map is rendered.
    pub shown: bool,
    /// Current isosurface level.
    pub iso: f64,
    /// Native value range of the volume.
    pub iso_range: ValueRange,
    /// Drawing style.
    pub style: MapStyle,
}

impl DensityMapState {
    fn new(shown: bool, iso_range: ValueRange, style: MapStyle) -> Self {
        Self {
            shown,
            iso: default_iso(iso_range),
            iso_range,
            style,
        }
    }

    /// Slider bounds for the iso level.
    #[must_use]
    pub fn bounds(&self) -> IsoBounds {
        iso_bounds(self.iso_range.min, self.iso_range.max)
    }
}

/// Everything the viewer knows about a displayed fragment.
///
/// Always holds all four structures and all three density maps, whatever
/// subset was initially requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentState {
    key: FragmentKey,
    hue: f64,
    structures: BTreeMap<ResourceKind, StructureState>,
    density_maps: BTreeMap<ResourceKind, DensityMapState>,
    colors: Palette,
}

impl FragmentState {
    /// Build the initial state of a fragment.
    ///
    /// `ranges` are the native value ranges of the `base`, `step` and `phos`
    /// density maps, in that order. Kinds not listed in `shown_*` start
    /// hidden.
    #[must_use]
    pub fn new(
        key: FragmentKey,
        hue: f64,
        shown_structures: &[ResourceKind],
        shown_density_maps: &[ResourceKind],
        ranges: [ValueRange; 3],
        style: MapStyle,
    ) -> Self {
        let structures = STRUCTURE_KINDS
            .into_iter()
            .map(|kind| {
                let shown = shown_structures.contains(&kind);
                (kind, StructureState { shown })
            })
            .collect();
        let density_maps = DENSITY_MAP_KINDS
            .into_iter()
            .zip(ranges)
            .map(|(kind, range)| {
                let shown = shown_density_maps.contains(&kind);
                (kind, DensityMapState::new(shown, range, style))
            })
            .collect();

        Self {
            key,
            hue,
            structures,
            density_maps,
            colors: palette(hue),
        }
    }

    /// The fragment this state belongs to.
    #[must_use]
    pub fn key(&self) -> &FragmentKey {
        &self.key
    }

    /// Hue assigned to the fragment.
    #[must_use]
    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Current colors.
    #[must_use]
    pub fn colors(&self) -> &Palette {
        &self.colors
    }

    /// Color of one kind.
    #[must_use]
    pub fn color(&self, kind: ResourceKind) -> Color {
        self.colors.get(kind)
    }

    /// State of one structure.
    #[must_use]
    pub fn structure(&self, kind: ResourceKind) -> Option<&StructureState> {
        self.structures.get(&kind)
    }

    /// State of one density map.
    #[must_use]
    pub fn density_map(&self, kind: ResourceKind) -> Option<&DensityMapState> {
        self.density_maps.get(&kind)
    }

    /// Structures in canonical order.
    pub fn structures(
        &self,
    ) -> impl Iterator<Item = (ResourceKind, &StructureState)> {
        self.structures.iter().map(|(k, s)| (*k, s))
    }

    /// Density maps in canonical order.
    pub fn density_maps(
        &self,
    ) -> impl Iterator<Item = (ResourceKind, &DensityMapState)> {
        self.density_maps.iter().map(|(k, s)| (*k, s))
    }

    /// Whether a resource is currently shown.
    #[must_use]
    pub fn is_shown(&self, kind: ResourceKind, ty: ResourceType) -> bool {
        match ty {
            ResourceType::Structure => {
                self.structures.get(&kind).is_some_and(|s| s.shown)
            }
            ResourceType::DensityMap => {
                self.density_maps.get(&kind).is_some_and(|d| d.shown)
            }
        }
    }

    /// Copy with one resource's visibility changed.
    #[must_use]
    pub fn with_shown(
        &self,
        kind: ResourceKind,
        ty: ResourceType,
        shown: bool,
    ) -> Self {
        let mut next = self.clone();
        match ty {
            ResourceType::Structure => {
                if let Some(s) = next.structures.get_mut(&kind) {
                    s.shown = shown;
                }
            }
            ResourceType::DensityMap => {
                if let Some(d) = next.density_maps.get_mut(&kind) {
                    d.shown = shown;
                }
            }
        }
        next
    }

    /// Copy with one density map's iso level changed.
    #[must_use]
    pub fn with_iso(&self, kind: ResourceKind, iso: f64) -> Self {
        let mut next = self.clone();
        if let Some(d) = next.density_maps.get_mut(&kind) {
            d.iso = iso;
        }
        next
    }

    /// Copy with the color of one kind replaced.
    #[must_use]
    pub fn with_color(&self, kind: ResourceKind, color: Color) -> Self {
        let mut next = self.clone();
        next.colors = next.colors.with(kind, color);
        next
    }

    /// Copy with a new hue and the palette derived from it.
    #[must_use]
    pub fn with_hue(&self, hue: f64) -> Self {
        let mut next = self.clone();
        next.hue = hue;
        next.colors = palette(hue);
        next
    }

    /// Copy with one density map's style changed.
    #[must_use]
    pub fn with_style(&self, kind: ResourceKind, style: MapStyle) -> Self {
        let mut next = self.clone();
        if let Some(d) = next.density_maps.get_mut(&kind) {
            d.style = style;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FragmentState {
        FragmentState::new(
            FragmentKey::new("AA00", "A_A"),
            95.0,
            &[ResourceKind::Base],
            &[ResourceKind::Phos],
            [
                ValueRange::new(0.0, 25.0),
                ValueRange::new(0.0, 2.5),
                ValueRange::new(1.0, 1.0),
            ],
            MapStyle::Solid,
        )
    }

    #[test]
    fn always_holds_full_kind_sets() {
        let state = sample();
        assert_eq!(state.structures().count(), 4);
        assert_eq!(state.density_maps().count(), 3);
        assert!(state.density_map(ResourceKind::Reference).is_none());
    }

    #[test]
    fn shown_flags_follow_request() {
        let state = sample();
        assert!(state.is_shown(ResourceKind::Base, ResourceType::Structure));
        assert!(!state.is_shown(ResourceKind::Reference, ResourceType::Structure));
        assert!(state.is_shown(ResourceKind::Phos, ResourceType::DensityMap));
        assert!(!state.is_shown(ResourceKind::Base, ResourceType::DensityMap));
    }

    #[test]
    fn density_defaults_derive_from_range() {
        let state = sample();
        let base = state.density_map(ResourceKind::Base).unwrap();
        assert_eq!(base.iso, 12.0);
        assert_eq!(base.style, MapStyle::Solid);
        assert_eq!(base.bounds().step, 1.0);
        assert_eq!(base.iso_range, ValueRange::new(0.0, 25.0));
    }

    #[test]
    fn updates_leave_original_untouched() {
        let state = sample();
        let shown = state.with_shown(ResourceKind::Step, ResourceType::Structure, true);
        let iso = shown.with_iso(ResourceKind::Base, 3.0);
        let styled = iso.with_style(ResourceKind::Base, MapStyle::Both);

        assert!(!state.is_shown(ResourceKind::Step, ResourceType::Structure));
        assert!(styled.is_shown(ResourceKind::Step, ResourceType::Structure));
        assert_eq!(styled.density_map(ResourceKind::Base).unwrap().iso, 3.0);
        assert_eq!(
            styled.density_map(ResourceKind::Base).unwrap().style,
            MapStyle::Both
        );
        assert_eq!(styled.colors(), state.colors());
    }

    #[test]
    fn color_updates_keep_display_flags() {
        let state = sample();
        let recolored = state.with_color(ResourceKind::Step, Color::new(9, 9, 9));
        assert_eq!(recolored.color(ResourceKind::Step), Color::new(9, 9, 9));
        assert_eq!(recolored.color(ResourceKind::Base), state.color(ResourceKind::Base));
        assert_eq!(recolored.hue(), 95.0);

        let reset = recolored.with_hue(190.0);
        assert_eq!(reset.colors(), &palette(190.0));
        assert!(reset.is_shown(ResourceKind::Base, ResourceType::Structure));
    }

    #[test]
    fn style_visuals() {
        assert_eq!(MapStyle::Both.visuals(), &["solid", "wireframe"]);
        assert_eq!(MapStyle::default(), MapStyle::Solid);
    }

    #[test]
    fn serializes_kinds_as_map_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value["structures"]["reference"]["shown"].is_boolean());
        assert_eq!(value["density_maps"]["phos"]["style"], "solid");
    }
}
