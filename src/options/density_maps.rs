use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::MapStyle;

/// Defaults for density map representations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Density Maps", inline)]
#[serde(default)]
pub struct DensityMapOptions {
    /// Style of newly displayed maps.
    #[schemars(title = "Default Style")]
    pub default_style: MapStyle,
    /// Isosurface opacity.
    #[schemars(title = "Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub alpha: f32,
}

impl Default for DensityMapOptions {
    fn default() -> Self {
        Self {
            default_style: MapStyle::Solid,
            alpha: 0.5,
        }
    }
}
