//! In-memory renderer without a display.
//!
//! Keeps registered data and live representations in maps so the
//! synchronizer can run (and be inspected) where no GPU viewer exists, e.g.
//! in the `watlas` command line tool.

use rustc_hash::FxHashMap;

use super::{volume_value_range, MapAppearance, Renderer, RendererError, ShowSpec};
use crate::iso::ValueRange;
use crate::resources::ResourceRef;

/// Parsed data of one registered resource.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Data {
    Structure { atoms: usize },
    Volume { range: ValueRange },
}

/// Renderer that tracks state without drawing anything.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    data: FxHashMap<ResourceRef, Data>,
    visuals: FxHashMap<ResourceRef, ShowSpec>,
}

impl HeadlessRenderer {
    /// Create an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether data is registered under `resource`.
    #[must_use]
    pub fn is_registered(&self, resource: &ResourceRef) -> bool {
        self.data.contains_key(resource)
    }

    /// Number of atoms of a registered structure.
    #[must_use]
    pub fn atom_count(&self, resource: &ResourceRef) -> Option<usize> {
        match self.data.get(resource)? {
            Data::Structure { atoms } => Some(*atoms),
            Data::Volume { .. } => None,
        }
    }

    /// Live representation of `resource`.
    #[must_use]
    pub fn visual(&self, resource: &ResourceRef) -> Option<&ShowSpec> {
        self.visuals.get(resource)
    }

    /// Visuals making up the live representation of a density map.
    #[must_use]
    pub fn map_visuals(
        &self,
        resource: &ResourceRef,
    ) -> Option<&'static [&'static str]> {
        match self.visuals.get(resource)? {
            ShowSpec::DensityMap { appearance, .. } => {
                Some(appearance.style.visuals())
            }
            ShowSpec::Structure { .. } => None,
        }
    }

    /// Number of live representations.
    #[must_use]
    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    fn insert(&mut self, resource: &ResourceRef, data: Data) {
        if self.data.insert(resource.clone(), data).is_some() {
            log::debug!("replaced data registered under {resource}");
        }
    }
}

fn count_atoms(pdb: &str) -> usize {
    pdb.lines()
        .filter(|l| l.starts_with("ATOM") || l.starts_with("HETATM"))
        .count()
}

impl Renderer for HeadlessRenderer {
    fn register_structure(
        &mut self,
        data: &str,
        resource: &ResourceRef,
    ) -> Result<(), RendererError> {
        let atoms = count_atoms(data);
        if atoms == 0 {
            return Err(RendererError::InvalidData {
                resource: resource.clone(),
                reason: "structure has no atom records".to_owned(),
            });
        }
        self.insert(resource, Data::Structure { atoms });
        Ok(())
    }

    fn register_volume(
        &mut self,
        data: &[u8],
        resource: &ResourceRef,
    ) -> Result<(), RendererError> {
        let range = volume_value_range(data).map_err(|reason| {
            RendererError::InvalidData {
                resource: resource.clone(),
                reason,
            }
        })?;
        self.insert(resource, Data::Volume { range });
        Ok(())
    }

    fn volume_range(
        &self,
        resource: &ResourceRef,
    ) -> Result<ValueRange, RendererError> {
        match self.data.get(resource) {
            Some(Data::Volume { range }) => Ok(*range),
            Some(Data::Structure { .. }) => Err(RendererError::InvalidData {
                resource: resource.clone(),
                reason: "not a volume".to_owned(),
            }),
            None => Err(RendererError::UnknownResource(resource.clone())),
        }
    }

    fn show(
        &mut self,
        resource: &ResourceRef,
        spec: &ShowSpec,
    ) -> Result<(), RendererError> {
        let matches = match (self.data.get(resource), spec) {
            (None, _) => {
                return Err(RendererError::UnknownResource(resource.clone()))
            }
            (Some(Data::Structure { .. }), ShowSpec::Structure { .. })
            | (Some(Data::Volume { .. }), ShowSpec::DensityMap { .. }) => true,
            _ => false,
        };
        if !matches {
            return Err(RendererError::InvalidData {
                resource: resource.clone(),
                reason: "representation does not fit the data".to_owned(),
            });
        }
        let _ = self.visuals.insert(resource.clone(), *spec);
        Ok(())
    }

    fn update_density_map(
        &mut self,
        resource: &ResourceRef,
        appearance: &MapAppearance,
    ) -> Result<(), RendererError> {
        if let Some(ShowSpec::DensityMap { appearance: current, .. }) =
            self.visuals.get_mut(resource)
        {
            *current = *appearance;
        }
        Ok(())
    }

    fn hide(&mut self, resource: &ResourceRef) -> Result<(), RendererError> {
        let _ = self.visuals.remove(resource);
        Ok(())
    }

    fn unload(&mut self, resource: &ResourceRef) -> Result<(), RendererError> {
        let _ = self.visuals.remove(resource);
        let _ = self.data.remove(resource);
        Ok(())
    }
}
