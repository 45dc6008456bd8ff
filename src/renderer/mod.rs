//! Boundary to the rendering engine.
//!
//! The synchronizer never builds meshes or parses file formats itself; it
//! hands raw resource data to a [`Renderer`] under a [`ResourceRef`] and
//! later asks it to show, hide or drop that resource.

mod headless;
mod volume;

use std::fmt;

pub use headless::HeadlessRenderer;
pub use volume::volume_value_range;

use crate::color::Color;
use crate::iso::ValueRange;
use crate::resources::{ResourceKind, ResourceRef};
use crate::state::MapStyle;

/// Failure reported by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    /// Nothing is registered under this reference.
    UnknownResource(ResourceRef),
    /// Raw data could not be turned into a structure or volume.
    InvalidData {
        /// Resource being registered.
        resource: ResourceRef,
        /// What was wrong with it.
        reason: String,
    },
    /// Engine-specific failure.
    Backend(String),
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownResource(r) => write!(f, "no data registered for {r}"),
            Self::InvalidData { resource, reason } => {
                write!(f, "invalid data for {resource}: {reason}")
            }
            Self::Backend(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for RendererError {}

/// Coloring scheme of a structure representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTheme {
    /// Colored by element, carbons in the fragment color.
    ElementSymbol,
    /// Whole representation in the fragment color.
    Uniform,
}

impl ColorTheme {
    /// Theme used for a structure kind.
    #[must_use]
    pub fn for_structure(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Reference | ResourceKind::Base => Self::ElementSymbol,
            ResourceKind::Step | ResourceKind::Phos => Self::Uniform,
        }
    }
}

/// Isosurface parameters of a density map representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapAppearance {
    /// Absolute iso level.
    pub iso: f64,
    /// Surface style.
    pub style: MapStyle,
    /// Surface opacity.
    pub alpha: f32,
}

/// What to draw when showing a resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShowSpec {
    /// Ball-and-stick structure.
    Structure {
        /// Fragment color of the kind.
        color: Color,
        /// Coloring scheme.
        theme: ColorTheme,
    },
    /// Density map isosurface.
    DensityMap {
        /// Fragment color of the kind.
        color: Color,
        /// Isosurface parameters.
        appearance: MapAppearance,
    },
}

/// Operations the synchronizer needs from a rendering engine.
///
/// Registration keeps parsed data around independently of whether it is
/// drawn; `hide` drops only the drawn representation, `unload` drops the
/// data as well.
pub trait Renderer {
    /// Parse and keep a structure (PDB text).
    fn register_structure(
        &mut self,
        data: &str,
        resource: &ResourceRef,
    ) -> Result<(), RendererError>;

    /// Parse and keep a volume (CCP4 bytes).
    fn register_volume(
        &mut self,
        data: &[u8],
        resource: &ResourceRef,
    ) -> Result<(), RendererError>;

    /// Native value range of a registered volume.
    fn volume_range(
        &self,
        resource: &ResourceRef,
    ) -> Result<ValueRange, RendererError>;

    /// Create a representation of a registered resource, replacing the
    /// live one if it is already shown.
    fn show(
        &mut self,
        resource: &ResourceRef,
        spec: &ShowSpec,
    ) -> Result<(), RendererError>;

    /// Change the isosurface of a shown density map. No-op when hidden.
    fn update_density_map(
        &mut self,
        resource: &ResourceRef,
        appearance: &MapAppearance,
    ) -> Result<(), RendererError>;

    /// Remove the representation, keeping the data.
    fn hide(&mut self, resource: &ResourceRef) -> Result<(), RendererError>;

    /// Remove the representation and the data.
    fn unload(&mut self, resource: &ResourceRef) -> Result<(), RendererError>;
}
