//! Keeps the fragment cache and the renderer in step.
//!
//! Each fragment moves through `absent → loaded → displayed`:
//!
//! - [`load`](DisplaySynchronizer::load) downloads and registers bundles,
//!   one fragment after another. A fragment is either fully loaded or not
//!   at all; a failing fragment does not stop the others.
//! - [`add`](DisplaySynchronizer::add) loads if needed, derives defaults,
//!   shows the requested subset and only then commits the display state.
//! - [`remove`](DisplaySynchronizer::remove) hides everything but keeps the
//!   data, [`unload`](DisplaySynchronizer::unload) drops the data too.
//!
//! Lifecycle calls take `&mut self`, so calls on one synchronizer never
//! overlap; share it behind a lock (see [`crate::api::Api`]).

mod colors;
mod lifecycle;
mod resources;

use crate::cache::FragmentCache;
use crate::color::{ColorFormat, ColorInfo, HueCursor};
use crate::download::Fetcher;
use crate::options::Options;
use crate::renderer::{ColorTheme, MapAppearance, Renderer, ShowSpec};
use crate::resources::{FragmentKey, ResourceKind, ResourceLinks};
use crate::state::{DensityMapState, FragmentState, MapStyle};

/// Callback invoked with the key of a fragment whose display changed.
pub type FragmentCallback = Box<dyn FnMut(&FragmentKey) + Send>;

/// Orchestrates downloads, the fragment cache and the renderer.
pub struct DisplaySynchronizer<R, F> {
    renderer: R,
    fetcher: F,
    links: ResourceLinks,
    cache: FragmentCache,
    hues: HueCursor,
    /// Cursor position before any fragment was added.
    initial_hues: HueCursor,
    default_style: MapStyle,
    alpha: f32,
    on_added: Option<FragmentCallback>,
    on_removed: Option<FragmentCallback>,
    on_colors_changed: Option<FragmentCallback>,
}

impl<R: Renderer, F: Fetcher> DisplaySynchronizer<R, F> {
    /// Create a synchronizer driving `renderer`, fetching with `fetcher`.
    pub fn new(renderer: R, fetcher: F, options: &Options) -> Self {
        let hues = options.colors.hue_cursor();
        Self {
            renderer,
            fetcher,
            links: ResourceLinks::new(options.links.data_root.as_str()),
            cache: FragmentCache::new(),
            hues,
            initial_hues: hues,
            default_style: options.density_maps.default_style,
            alpha: options.density_maps.alpha,
            on_added: None,
            on_removed: None,
            on_colors_changed: None,
        }
    }

    /// Whether `key` is displayed.
    #[must_use]
    pub fn has(&self, key: &FragmentKey) -> bool {
        self.cache.is_displayed(key)
    }

    /// Whether all resources of `key` are registered with the renderer.
    #[must_use]
    pub fn is_loaded(&self, key: &FragmentKey) -> bool {
        self.cache.is_loaded(key)
    }

    /// Display state of `key`.
    #[must_use]
    pub fn fragment(&self, key: &FragmentKey) -> Option<&FragmentState> {
        self.cache.displayed(key)
    }

    /// Every displayed fragment, sorted by key.
    #[must_use]
    pub fn displayed(&self) -> Vec<&FragmentState> {
        self.cache.displayed_fragments()
    }

    /// Colors of `key`, if it is displayed.
    #[must_use]
    pub fn fragment_colors(
        &self,
        key: &FragmentKey,
        format: ColorFormat,
    ) -> Option<ColorInfo> {
        let state = self.cache.displayed(key)?;
        Some(ColorInfo::new(state.colors(), format))
    }

    /// Hue the next committed `add` will use.
    #[must_use]
    pub fn next_hue(&self) -> f64 {
        self.hues.current()
    }

    /// The driven renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the driven renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The fetcher used for downloads.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Call `callback` after a fragment is added to the display.
    pub fn set_on_fragment_added(
        &mut self,
        callback: impl FnMut(&FragmentKey) + Send + 'static,
    ) {
        self.on_added = Some(Box::new(callback));
    }

    /// Call `callback` after a fragment is removed from the display.
    pub fn set_on_fragment_removed(
        &mut self,
        callback: impl FnMut(&FragmentKey) + Send + 'static,
    ) {
        self.on_removed = Some(Box::new(callback));
    }

    /// Call `callback` after the colors of a displayed fragment change.
    pub fn set_on_fragment_colors_changed(
        &mut self,
        callback: impl FnMut(&FragmentKey) + Send + 'static,
    ) {
        self.on_colors_changed = Some(Box::new(callback));
    }

    fn map_appearance(&self, map: &DensityMapState) -> MapAppearance {
        MapAppearance {
            iso: map.iso,
            style: map.style,
            alpha: self.alpha,
        }
    }

    fn density_map_spec(
        &self,
        state: &FragmentState,
        kind: ResourceKind,
        map: &DensityMapState,
    ) -> ShowSpec {
        ShowSpec::DensityMap {
            color: state.color(kind),
            appearance: self.map_appearance(map),
        }
    }
}

fn structure_spec(state: &FragmentState, kind: ResourceKind) -> ShowSpec {
    ShowSpec::Structure {
        color: state.color(kind),
        theme: ColorTheme::for_structure(kind),
    }
}

fn notify(callback: &mut Option<FragmentCallback>, key: &FragmentKey) {
    if let Some(cb) = callback {
        cb(key);
    }
}
