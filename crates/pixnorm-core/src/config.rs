//! Serializable preprocessing settings carried by a caller's pipeline config.

use serde::{Deserialize, Serialize};

use crate::registry::DEFAULT_MODEL;

/// Which model family's pixel convention to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Model-family identifier. Default: `"mobilenet"`.
    #[serde(default = "PreprocessConfig::default_model")]
    pub model: String,
}

impl PreprocessConfig {
    /// Default for serde deserialization when the field is absent.
    fn default_model() -> String {
        DEFAULT_MODEL.to_owned()
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
        }
    }
}
