use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Location of the fragment data tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Data", inline)]
#[serde(default)]
pub struct LinkOptions {
    /// Directory or HTTP(S) URL holding `{code}/{seq}/` fragment folders.
    #[schemars(title = "Data Root")]
    pub data_root: String,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            data_root: "./data".to_owned(),
        }
    }
}
