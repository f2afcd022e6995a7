//! The closed set of supported stack services and their shared capability set.

use std::fmt;

use crate::error::ValidationErrors;

/// One of the four services a stack description may configure.
///
/// The variant order is the canonical iteration order: every presence query,
/// validation pass, and assembled output walks services in this order so
/// identical input always produces identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    /// PHP runtime (language runtime).
    Php,
    /// Nginx web server.
    Nginx,
    /// Database engine.
    Database,
    /// Node.js tooling (auxiliary runtime).
    NodeJs,
}

impl Service {
    /// Returns every supported service in canonical order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Php, Self::Nginx, Self::Database, Self::NodeJs]
    }

    /// Returns the service name used for compose service keys and file paths.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Php => "php",
            Self::Nginx => "nginx",
            Self::Database => "database",
            Self::NodeJs => "nodejs",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Php => write!(f, "PHP"),
            Self::Nginx => write!(f, "Nginx"),
            Self::Database => write!(f, "Database"),
            Self::NodeJs => write!(f, "NodeJS"),
        }
    }
}

/// Capability set every per-service configuration implements.
pub trait ServiceConfig {
    /// Sets every unset field to its documented default. Idempotent.
    fn fill_defaults_if_not_set(&mut self);

    /// Checks every field-level constraint and returns all violations at
    /// once, or `None` when the configuration is valid.
    fn validate(&self) -> Option<ValidationErrors>;

    /// Returns `true` when the configuration equals its all-default value.
    ///
    /// Used for presence detection only. An explicitly empty block in the
    /// input decodes to the all-default value and is treated as absent.
    fn is_empty(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_stable() {
        assert_eq!(
            Service::all(),
            [
                Service::Php,
                Service::Nginx,
                Service::Database,
                Service::NodeJs
            ]
        );
    }

    #[test]
    fn display_names() {
        let names: Vec<String> = Service::all().iter().map(ToString::to_string).collect();
        assert_eq!(names, ["PHP", "Nginx", "Database", "NodeJS"]);
    }

    #[test]
    fn ord_matches_enumeration_order() {
        assert!(Service::Php < Service::Nginx);
        assert!(Service::Nginx < Service::Database);
        assert!(Service::Database < Service::NodeJs);
    }
}
