//! Configuration with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[links]` (or nothing at all) is valid.

mod colors;
mod density_maps;
mod fetch;
mod links;

use std::path::Path;

pub use colors::ColorOptions;
pub use density_maps::DensityMapOptions;
pub use fetch::FetchOptions;
pub use links::LinkOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AtlasError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Where fragment data lives.
    pub links: LinkOptions,
    /// Hue assignment.
    pub colors: ColorOptions,
    /// Density map defaults.
    pub density_maps: DensityMapOptions,
    /// Download limits.
    #[schemars(skip)]
    pub fetch: FetchOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, AtlasError> {
        let content = std::fs::read_to_string(path).map_err(AtlasError::Io)?;
        toml::from_str(&content)
            .map_err(|e| AtlasError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), AtlasError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AtlasError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(AtlasError::Io)?;
        }
        std::fs::write(path, content).map_err(AtlasError::Io)
    }
}
