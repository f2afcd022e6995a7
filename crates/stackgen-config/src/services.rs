//! Registry of per-service configurations.
//!
//! Holds up to one configuration per supported service and orchestrates
//! default-filling and validation across them, including the one-directional
//! database-to-PHP driver extension injection.

use serde::Deserialize;

use crate::database::DatabaseConfig;
use crate::error::ValidationErrors;
use crate::nginx::NginxConfig;
use crate::nodejs::NodeJsConfig;
use crate::php::PhpConfig;
use crate::service::{Service, ServiceConfig};

/// The `services` block of a stack description.
///
/// A service absent from the input decodes to `None` and stays absent: no
/// step of the pipeline materializes a service the user did not write down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServicesConfig {
    /// PHP runtime block.
    pub php: Option<PhpConfig>,
    /// Nginx block.
    pub nginx: Option<NginxConfig>,
    /// Database block.
    pub database: Option<DatabaseConfig>,
    /// Node.js block.
    #[serde(rename = "nodejs")]
    pub node_js: Option<NodeJsConfig>,
}

impl ServicesConfig {
    /// Fills defaults for every configured service.
    ///
    /// The database is resolved first: the PHP driver extension injected
    /// below depends on the resolved database engine.
    pub fn fill_defaults_if_not_set(&mut self) {
        if let Some(database) = &mut self.database {
            database.fill_defaults_if_not_set();
        }

        if let Some(php) = &mut self.php {
            php.fill_defaults_if_not_set();

            if let Some(engine) = self.database.as_ref().and_then(DatabaseConfig::engine) {
                php.add_database_extension(engine);
            }
        }

        if let Some(node_js) = &mut self.node_js {
            node_js.fill_defaults_if_not_set();
        }

        if let Some(nginx) = &mut self.nginx {
            nginx.fill_defaults_if_not_set();
        }
    }

    /// Validates every present service in canonical order, merging all
    /// failures into one aggregate. Absent services are skipped, never
    /// defaulted into existence.
    #[must_use]
    pub fn validate(&self) -> Option<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for service in Service::all() {
            if !self.is_present(service) {
                continue;
            }

            if let Some(config) = self.config_for(service) {
                if let Some(failures) = config.validate() {
                    errors.merge(failures);
                }
            }
        }

        errors.into_option()
    }

    /// Returns `true` when `service` is configured and not the zero value.
    ///
    /// An input that supplies an explicitly empty block decodes to the
    /// all-default value and counts as absent.
    #[must_use]
    pub fn is_present(&self, service: Service) -> bool {
        self.config_for(service)
            .is_some_and(|config| !config.is_empty())
    }

    /// Counts present services.
    #[must_use]
    pub fn present_services_count(&self) -> usize {
        Service::all()
            .into_iter()
            .filter(|service| self.is_present(*service))
            .count()
    }

    /// Present services in canonical enumeration order.
    #[must_use]
    pub fn present_services(&self) -> Vec<Service> {
        Service::all()
            .into_iter()
            .filter(|service| self.is_present(*service))
            .collect()
    }

    fn config_for(&self, service: Service) -> Option<&dyn ServiceConfig> {
        match service {
            Service::Php => self.php.as_ref().map(|c| c as &dyn ServiceConfig),
            Service::Nginx => self.nginx.as_ref().map(|c| c as &dyn ServiceConfig),
            Service::Database => self.database.as_ref().map(|c| c as &dyn ServiceConfig),
            Service::NodeJs => self.node_js.as_ref().map(|c| c as &dyn ServiceConfig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Credentials;

    fn full_services() -> ServicesConfig {
        ServicesConfig {
            php: Some(PhpConfig {
                version: "7.4".into(),
                extensions: vec!["mbstring".into(), "zip".into()],
            }),
            nginx: Some(NginxConfig {
                server_name: "test-server".into(),
                ..NginxConfig::default()
            }),
            database: Some(DatabaseConfig {
                system: "mysql".into(),
                version: "5.7".into(),
                name: "test-db".into(),
                port: None,
                credentials: Credentials {
                    username: "bocmah".into(),
                    password: "test".into(),
                    root_password: "testRoot".into(),
                },
            }),
            node_js: Some(NodeJsConfig {
                version: "10".into(),
            }),
        }
    }

    #[test]
    fn fill_defaults_injects_database_driver_into_php() {
        let mut services = full_services();
        services.fill_defaults_if_not_set();

        let php = services.php.expect("php present");
        assert_eq!(php.extensions, ["mbstring", "zip", "pdo_mysql"]);
        assert_eq!(
            services.database.expect("database present").port,
            Some(3306)
        );
    }

    #[test]
    fn fill_defaults_twice_injects_driver_once() {
        let mut services = full_services();
        services.fill_defaults_if_not_set();
        services.fill_defaults_if_not_set();

        let php = services.php.expect("php present");
        assert_eq!(
            php.extensions.iter().filter(|e| *e == "pdo_mysql").count(),
            1
        );
    }

    #[test]
    fn fill_defaults_without_database_leaves_php_untouched() {
        let mut services = ServicesConfig {
            php: Some(PhpConfig {
                version: "7.4".into(),
                extensions: vec!["gd".into()],
            }),
            ..ServicesConfig::default()
        };
        services.fill_defaults_if_not_set();

        assert_eq!(services.php.expect("php present").extensions, ["gd"]);
    }

    #[test]
    fn fill_defaults_never_materializes_absent_services() {
        let mut services = ServicesConfig::default();
        services.fill_defaults_if_not_set();

        assert!(services.php.is_none());
        assert!(services.nginx.is_none());
        assert!(services.database.is_none());
        assert!(services.node_js.is_none());
    }

    #[test]
    fn unresolvable_engine_skips_driver_injection() {
        let mut services = full_services();
        services
            .database
            .as_mut()
            .expect("database present")
            .system = "mysqlll".into();
        services.fill_defaults_if_not_set();

        let php = services.php.expect("php present");
        assert!(!php.extensions.iter().any(|e| e == "pdo_mysql"));
    }

    #[test]
    fn is_present_rejects_empty_block() {
        let services = ServicesConfig {
            php: Some(PhpConfig::default()),
            ..ServicesConfig::default()
        };

        assert!(!services.is_present(Service::Php));
        assert_eq!(services.present_services_count(), 0);
    }

    #[test]
    fn present_services_follow_canonical_order() {
        let services = full_services();
        assert_eq!(
            services.present_services(),
            [
                Service::Php,
                Service::Nginx,
                Service::Database,
                Service::NodeJs
            ]
        );
        assert_eq!(services.present_services_count(), 4);
    }

    #[test]
    fn validate_merges_failures_from_every_present_service() {
        let mut services = full_services();
        services.php.as_mut().expect("php present").version = String::new();
        services.node_js.as_mut().expect("nodejs present").version = String::new();

        let errors = services.validate().expect("two services invalid");
        let msg = errors.to_string();
        assert!(msg.contains("PHP version is required"), "got: {msg}");
        assert!(msg.contains("NodeJS version is required"), "got: {msg}");
    }

    #[test]
    fn validate_skips_absent_services() {
        let services = ServicesConfig {
            php: Some(PhpConfig {
                version: "7.4".into(),
                extensions: Vec::new(),
            }),
            ..ServicesConfig::default()
        };

        assert!(services.validate().is_none());
    }
}
