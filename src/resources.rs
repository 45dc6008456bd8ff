//! Fragment identity and the resources each fragment is built from.
//!
//! Every fragment is a fixed bundle of four structures (`reference`,
//! `base`, `step`, `phos`) and three density maps (`base`, `step`, `phos`).
//! A [`ResourceRef`] names one member of that bundle inside the renderer.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifies one fragment: classification code plus sequence.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FragmentKey {
    class_code: String,
    sequence: String,
}

impl FragmentKey {
    /// Create a key from a classification code (e.g. `AA00`) and a sequence
    /// (e.g. `A_T`).
    pub fn new(class_code: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            class_code: class_code.into(),
            sequence: sequence.into(),
        }
    }

    /// Classification code.
    #[must_use]
    pub fn class_code(&self) -> &str {
        &self.class_code
    }

    /// Sequence string.
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }
}

impl fmt::Display for FragmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.class_code, self.sequence)
    }
}

/// Sub-part of a fragment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Reference geometry of the fragment. Structure only.
    Reference,
    /// Waters around the bases.
    Base,
    /// Waters around the whole dinucleotide step.
    Step,
    /// Waters around the phosphates.
    Phos,
}

/// Structure kinds in canonical order.
pub const STRUCTURE_KINDS: [ResourceKind; 4] = [
    ResourceKind::Reference,
    ResourceKind::Base,
    ResourceKind::Step,
    ResourceKind::Phos,
];

/// Density map kinds in canonical order.
pub const DENSITY_MAP_KINDS: [ResourceKind; 3] =
    [ResourceKind::Base, ResourceKind::Step, ResourceKind::Phos];

impl ResourceKind {
    /// Lowercase identifier used in references and serialized state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Base => "base",
            Self::Step => "step",
            Self::Phos => "phos",
        }
    }

    /// Whether this kind exists for the given resource type.
    #[must_use]
    pub fn exists_as(self, ty: ResourceType) -> bool {
        match ty {
            ResourceType::Structure => true,
            ResourceType::DensityMap => self != Self::Reference,
        }
    }

    /// Name of the kind as it appears in file names.
    fn file_stem(self) -> &'static str {
        match self {
            Self::Step => "dinu",
            other => other.as_str(),
        }
    }

    /// File name suffix of the structure of this kind.
    fn structure_suffix(self) -> &'static str {
        match self {
            Self::Reference => "scale",
            _ => "waterpeaks",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reference" => Ok(Self::Reference),
            "base" => Ok(Self::Base),
            "step" => Ok(Self::Step),
            "phos" => Ok(Self::Phos),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

/// Whether a resource is an atomic model or a volumetric density map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    /// Atomic model, downloaded as text.
    Structure,
    /// Volumetric density map, downloaded as binary.
    DensityMap,
}

impl ResourceType {
    /// Identifier used in references.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::DensityMap => "density-map",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle identifying one resource of one fragment inside the renderer.
///
/// Derived deterministically as `{code}_{seq}_{kind}_{type}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceRef(String);

impl ResourceRef {
    /// Derive the handle for `kind`/`ty` of fragment `key`.
    #[must_use]
    pub fn new(key: &FragmentKey, kind: ResourceKind, ty: ResourceType) -> Self {
        Self(format!("{key}_{kind}_{ty}"))
    }

    /// The handle as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every resource of a fragment as `(kind, type)` pairs: density maps
/// first, then structures, each in canonical order.
pub fn bundle() -> impl Iterator<Item = (ResourceKind, ResourceType)> {
    DENSITY_MAP_KINDS
        .into_iter()
        .map(|k| (k, ResourceType::DensityMap))
        .chain(
            STRUCTURE_KINDS
                .into_iter()
                .map(|k| (k, ResourceType::Structure)),
        )
}

/// Location of one remote resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Where to fetch it from.
    pub url: String,
    /// Which part of the fragment it is.
    pub kind: ResourceKind,
    /// Structure or density map.
    pub ty: ResourceType,
}

/// Builds resource locations from a data root.
///
/// A fragment `(code, seq)` lives under `{root}/{code}/{seq}`; its
/// structures are `{code}_{seq}_{kind}_{suffix}.pdb` and its density maps
/// `{code}_{seq}_{kind}_water.map`, where `step` files are named `dinu`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLinks {
    root: String,
}

impl ResourceLinks {
    /// Links rooted at `root` (a directory path or an HTTP(S) URL).
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.len() > 1 && root.ends_with('/') {
            let _ = root.pop();
        }
        Self { root }
    }

    /// The data root.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    fn base(&self, key: &FragmentKey) -> String {
        format!("{}/{}/{}", self.root, key.class_code(), key.sequence())
    }

    /// Location of one resource.
    #[must_use]
    pub fn url(
        &self,
        key: &FragmentKey,
        kind: ResourceKind,
        ty: ResourceType,
    ) -> String {
        let stem = kind.file_stem();
        match ty {
            ResourceType::Structure => format!(
                "{}/{key}_{stem}_{}.pdb",
                self.base(key),
                kind.structure_suffix()
            ),
            ResourceType::DensityMap => {
                format!("{}/{key}_{stem}_water.map", self.base(key))
            }
        }
    }

    /// All seven resources of a fragment, structures and maps interleaved
    /// per kind.
    #[must_use]
    pub fn bundle(&self, key: &FragmentKey) -> Vec<ResourceDescriptor> {
        let mut links = Vec::with_capacity(7);
        for kind in STRUCTURE_KINDS {
            for ty in [ResourceType::Structure, ResourceType::DensityMap] {
                if kind.exists_as(ty) {
                    links.push(ResourceDescriptor {
                        url: self.url(key, kind, ty),
                        kind,
                        ty,
                    });
                }
            }
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_ref_concatenates_parts() {
        let key = FragmentKey::new("AA00", "A_T");
        let r = ResourceRef::new(&key, ResourceKind::Base, ResourceType::DensityMap);
        assert_eq!(r.as_str(), "AA00_A_T_base_density-map");
    }

    #[test]
    fn reference_has_no_density_map() {
        assert!(ResourceKind::Reference.exists_as(ResourceType::Structure));
        assert!(!ResourceKind::Reference.exists_as(ResourceType::DensityMap));
        assert!(ResourceKind::Phos.exists_as(ResourceType::DensityMap));
    }

    #[test]
    fn structure_urls_follow_naming_convention() {
        let links = ResourceLinks::new("https://example.org/data/");
        let key = FragmentKey::new("BB00", "G_C");
        assert_eq!(
            links.url(&key, ResourceKind::Reference, ResourceType::Structure),
            "https://example.org/data/BB00/G_C/BB00_G_C_reference_scale.pdb"
        );
        assert_eq!(
            links.url(&key, ResourceKind::Step, ResourceType::Structure),
            "https://example.org/data/BB00/G_C/BB00_G_C_dinu_waterpeaks.pdb"
        );
    }

    #[test]
    fn density_map_urls_follow_naming_convention() {
        let links = ResourceLinks::new("./data");
        let key = FragmentKey::new("AA00", "A_A");
        assert_eq!(
            links.url(&key, ResourceKind::Step, ResourceType::DensityMap),
            "./data/AA00/A_A/AA00_A_A_dinu_water.map"
        );
        assert_eq!(
            links.url(&key, ResourceKind::Phos, ResourceType::DensityMap),
            "./data/AA00/A_A/AA00_A_A_phos_water.map"
        );
    }

    #[test]
    fn bundle_has_seven_resources() {
        let links = ResourceLinks::new("./data");
        let key = FragmentKey::new("AA00", "A_A");
        let bundle = links.bundle(&key);
        assert_eq!(bundle.len(), 7);
        let maps = bundle
            .iter()
            .filter(|d| d.ty == ResourceType::DensityMap)
            .count();
        assert_eq!(maps, 3);
        assert_eq!(super::bundle().count(), 7);
    }

    #[test]
    fn kind_parses_from_str() {
        assert_eq!("step".parse::<ResourceKind>(), Ok(ResourceKind::Step));
        assert!("sugar".parse::<ResourceKind>().is_err());
    }
}
