//! Node.js auxiliary runtime configuration.

use serde::Deserialize;

use crate::error::ValidationErrors;
use crate::service::ServiceConfig;

/// Node.js service block of a stack description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeJsConfig {
    /// Node.js version, e.g. `"10"` or `"20"`.
    pub version: String,
}

impl ServiceConfig for NodeJsConfig {
    fn fill_defaults_if_not_set(&mut self) {
        // No implicit defaults beyond presence.
    }

    fn validate(&self) -> Option<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.version.is_empty() {
            errors.add("NodeJS version is required");
        }

        errors.into_option()
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
