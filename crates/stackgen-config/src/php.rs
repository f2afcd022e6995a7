//! PHP runtime configuration.

use serde::Deserialize;

use crate::database::DatabaseEngine;
use crate::error::ValidationErrors;
use crate::service::ServiceConfig;

/// PHP service block of a stack description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhpConfig {
    /// PHP version, e.g. `"7.4"` or `"8.3"`.
    pub version: String,
    /// Extensions to install into the runtime image.
    pub extensions: Vec<String>,
}

impl PhpConfig {
    /// Appends the PDO driver extension for `engine` to the extension list.
    ///
    /// Called by the services registry during default-filling when a database
    /// is configured. The extension is appended at most once, so repeated
    /// default-fill passes leave the list unchanged.
    pub fn add_database_extension(&mut self, engine: DatabaseEngine) {
        let driver = engine.driver_extension();
        if !self.extensions.iter().any(|ext| ext == driver) {
            self.extensions.push(driver.to_owned());
        }
    }
}

impl ServiceConfig for PhpConfig {
    fn fill_defaults_if_not_set(&mut self) {
        // No implicit defaults. The database driver extension is injected by
        // the registry, which knows the resolved database engine.
    }

    fn validate(&self) -> Option<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.version.is_empty() {
            errors.add("PHP version is required");
        }

        errors.into_option()
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_database_extension_appends_driver() {
        let mut php = PhpConfig {
            version: "7.4".into(),
            extensions: vec!["mbstring".into(), "zip".into()],
        };
        php.add_database_extension(DatabaseEngine::MySql);
        assert_eq!(php.extensions, ["mbstring", "zip", "pdo_mysql"]);
    }

    #[test]
    fn add_database_extension_is_idempotent() {
        let mut php = PhpConfig {
            version: "7.4".into(),
            extensions: vec!["gd".into()],
        };
        php.add_database_extension(DatabaseEngine::MySql);
        php.add_database_extension(DatabaseEngine::MySql);
        assert_eq!(
            php.extensions.iter().filter(|e| *e == "pdo_mysql").count(),
            1
        );
    }

    #[test]
    fn validate_requires_version() {
        let php = PhpConfig {
            version: String::new(),
            extensions: vec!["mbstring".into()],
        };
        let errors = php.validate().expect("missing version must fail");
        let msg = errors.to_string();
        assert!(msg.contains("PHP version is required"), "got: {msg}");
    }

    #[test]
    fn validate_accepts_version_without_extensions() {
        let php = PhpConfig {
            version: "8.3".into(),
            extensions: Vec::new(),
        };
        assert!(php.validate().is_none());
    }

    #[test]
    fn default_value_is_empty() {
        assert!(PhpConfig::default().is_empty());
        let php = PhpConfig {
            version: "7.4".into(),
            extensions: Vec::new(),
        };
        assert!(!php.is_empty());
    }
}
