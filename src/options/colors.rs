use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::HueCursor;

/// Hue assignment for newly displayed fragments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Colors", inline)]
#[serde(default)]
pub struct ColorOptions {
    /// Hue of the first fragment, in degrees.
    #[schemars(title = "Initial Hue", range(min = 0.0, max = 359.0), extend("step" = 1.0))]
    pub initial_hue: f64,
    /// Degrees the hue advances for each new fragment.
    #[schemars(title = "Hue Increment", range(min = 1.0, max = 359.0), extend("step" = 1.0))]
    pub hue_increment: f64,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            initial_hue: 0.0,
            hue_increment: 95.0,
        }
    }
}

impl ColorOptions {
    /// Cursor starting at the configured hue.
    #[must_use]
    pub fn hue_cursor(&self) -> HueCursor {
        HueCursor::new(self.initial_hue, self.hue_increment)
    }
}
