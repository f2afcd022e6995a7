//! Top-level stack description and the load pipeline.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result, ValidationErrors};
use crate::files::{File, FileKind, Files};
use crate::service::Service;
use crate::services::ServicesConfig;

/// Directory under the project root used when no output path is set.
pub const DEFAULT_OUTPUT_DIR: &str = ".docker";

/// Per-service runtime environment variables.
///
/// Only services that inject variables have an entry; a stack with nothing
/// to inject yields no map at all.
pub type Environment = BTreeMap<Service, BTreeMap<String, String>>;

/// A complete stack description.
///
/// Constructed once from decoded input, mutated by exactly two passes
/// ([`Self::fill_defaults_if_not_set`], then [`Self::validate`]) and treated
/// as immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FullConfig {
    /// Application name, used to derive network and volume names.
    pub app_name: String,
    /// Root of the application source tree on the host.
    pub project_root: PathBuf,
    /// Where generated artifacts land. Defaults to `<projectRoot>/.docker`.
    pub output_path: Option<PathBuf>,
    /// Configured services.
    pub services: Option<ServicesConfig>,
}

impl FullConfig {
    /// Loads, default-fills, and validates a stack description.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it is not valid YAML for this shape, and
    /// [`ConfigError::Validation`] with every constraint violation found.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading stack description");

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = serde_yaml::from_str(&raw)?;

        config.fill_defaults_if_not_set();

        if let Some(errors) = config.validate() {
            return Err(ConfigError::Validation(errors));
        }

        tracing::info!(
            app = %config.app_name,
            services = config.services.as_ref().map_or(0, ServicesConfig::present_services_count),
            "stack description loaded"
        );

        Ok(config)
    }

    /// Fills defaults for every configured service.
    pub fn fill_defaults_if_not_set(&mut self) {
        if let Some(services) = &mut self.services {
            services.fill_defaults_if_not_set();
        }
    }

    /// Validates the whole description, collecting every failure.
    #[must_use]
    pub fn validate(&self) -> Option<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.app_name.is_empty() {
            errors.add("App name is required");
        }

        if self.project_root.as_os_str().is_empty() {
            errors.add("Project root is required");
        }

        // A nil services block and a present-but-empty one are the same
        // failure from the user's point of view.
        match &self.services {
            Some(services) if services.present_services_count() > 0 => {
                if let Some(failures) = services.validate() {
                    errors.merge(failures);
                }
            }
            _ => errors.add("At least one service is required"),
        }

        errors.into_option()
    }

    /// Resolved output path: the explicit one, else `<projectRoot>/.docker`.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| self.project_root.join(DEFAULT_OUTPUT_DIR))
    }

    /// File-mount descriptors for every present service that owns on-disk
    /// artifacts, rooted at [`Self::output_path`].
    ///
    /// The database service keeps no generated files and contributes no
    /// entry.
    #[must_use]
    pub fn service_files(&self) -> Files {
        let mut files = Files::new();

        let Some(services) = &self.services else {
            return files;
        };

        let output = self.output_path();

        if services.is_present(Service::Php) {
            let _ = files.insert(
                Service::Php,
                vec![File {
                    kind: FileKind::Dockerfile,
                    path_on_host: output.join("php/Dockerfile"),
                    path_in_container: None,
                    template_path: "/php/php.dockerfile.tmpl".to_owned(),
                }],
            );
        }

        if services.is_present(Service::Nginx) {
            let _ = files.insert(
                Service::Nginx,
                vec![File {
                    kind: FileKind::ConfigFile,
                    path_on_host: output.join("nginx/conf.d/app.conf"),
                    path_in_container: Some("/etc/nginx/conf.d/app.conf".to_owned()),
                    template_path: "/nginx/conf.tmpl".to_owned(),
                }],
            );
        }

        if services.is_present(Service::NodeJs) {
            let _ = files.insert(
                Service::NodeJs,
                vec![File {
                    kind: FileKind::Dockerfile,
                    path_on_host: output.join("nodejs/Dockerfile"),
                    path_in_container: None,
                    template_path: "/nodejs/nodejs.dockerfile.tmpl".to_owned(),
                }],
            );
        }

        files
    }

    /// Runtime environment variables per service.
    ///
    /// `None` when no present service injects variables, so callers can tell
    /// "nothing to inject" apart from an empty environment.
    #[must_use]
    pub fn environment(&self) -> Option<Environment> {
        let services = self.services.as_ref()?;

        if !services.is_present(Service::Database) {
            return None;
        }

        let env = services.database.as_ref()?.environment()?;

        let mut environment = Environment::new();
        let _ = environment.insert(Service::Database, env);
        Some(environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Credentials, DatabaseConfig};
    use crate::nginx::NginxConfig;
    use crate::nodejs::NodeJsConfig;
    use crate::php::PhpConfig;

    fn valid_config() -> FullConfig {
        FullConfig {
            app_name: "stackgen".into(),
            project_root: PathBuf::from("/home/user/projects/test"),
            output_path: Some(PathBuf::from("/home/user/output")),
            services: Some(ServicesConfig {
                php: Some(PhpConfig {
                    version: "7.4".into(),
                    extensions: vec!["mbstring".into()],
                }),
                nginx: Some(NginxConfig {
                    server_name: "test-server".into(),
                    ..NginxConfig::default()
                }),
                database: Some(DatabaseConfig {
                    system: "mysql".into(),
                    version: "5.7".into(),
                    name: "test-db".into(),
                    port: Some(3306),
                    credentials: Credentials {
                        username: "bocmah".into(),
                        password: "test".into(),
                        root_password: "testRoot".into(),
                    },
                }),
                node_js: Some(NodeJsConfig {
                    version: "10".into(),
                }),
            }),
        }
    }

    #[test]
    fn validate_accepts_complete_config() {
        let mut config = valid_config();
        config.fill_defaults_if_not_set();
        assert!(config.validate().is_none());
    }

    #[test]
    fn validate_reports_missing_name_and_root_together() {
        let mut config = valid_config();
        config.app_name = String::new();
        config.project_root = PathBuf::new();
        config.fill_defaults_if_not_set();

        let errors = config.validate().expect("invalid config");
        let msg = errors.to_string();
        assert!(msg.contains("App name is required"), "got: {msg}");
        assert!(msg.contains("Project root is required"), "got: {msg}");
    }

    #[test]
    fn validate_requires_at_least_one_service_when_block_missing() {
        let mut config = valid_config();
        config.services = None;

        let errors = config.validate().expect("invalid config");
        let msg = errors.to_string();
        assert!(msg.contains("At least one service is required"), "got: {msg}");
    }

    #[test]
    fn validate_requires_at_least_one_service_when_block_empty() {
        let mut config = valid_config();
        config.services = Some(ServicesConfig::default());

        let errors = config.validate().expect("invalid config");
        let msg = errors.to_string();
        assert!(msg.contains("At least one service is required"), "got: {msg}");
    }

    #[test]
    fn output_path_defaults_under_project_root() {
        let mut config = valid_config();
        config.output_path = None;
        assert_eq!(
            config.output_path(),
            PathBuf::from("/home/user/projects/test/.docker")
        );

        config.output_path = Some(PathBuf::from("/home/test/output"));
        assert_eq!(config.output_path(), PathBuf::from("/home/test/output"));
    }

    #[test]
    fn service_files_cover_php_nginx_and_nodejs() {
        let config = valid_config();
        let files = config.service_files();

        let php = &files[&Service::Php];
        assert_eq!(php.len(), 1);
        assert_eq!(php[0].kind, FileKind::Dockerfile);
        assert_eq!(
            php[0].path_on_host,
            PathBuf::from("/home/user/output/php/Dockerfile")
        );

        let nginx = &files[&Service::Nginx];
        assert_eq!(nginx[0].kind, FileKind::ConfigFile);
        assert_eq!(
            nginx[0].path_in_container.as_deref(),
            Some("/etc/nginx/conf.d/app.conf")
        );

        assert!(files.contains_key(&Service::NodeJs));
        assert!(!files.contains_key(&Service::Database));
    }

    #[test]
    fn environment_is_absent_without_database() {
        let mut config = valid_config();
        config
            .services
            .as_mut()
            .expect("services present")
            .database = None;

        assert!(config.environment().is_none());
    }

    #[test]
    fn environment_exposes_database_variables() {
        let config = valid_config();
        let environment = config.environment().expect("database present");

        let db_env = &environment[&Service::Database];
        assert_eq!(db_env.len(), 4);
        assert_eq!(
            db_env.get("MYSQL_ROOT_PASSWORD").map(String::as_str),
            Some("testRoot")
        );
        assert_eq!(
            db_env.get("MYSQL_DATABASE").map(String::as_str),
            Some("test-db")
        );
        assert_eq!(db_env.get("MYSQL_USER").map(String::as_str), Some("bocmah"));
        assert_eq!(db_env.get("MYSQL_PASSWORD").map(String::as_str), Some("test"));
    }
}
