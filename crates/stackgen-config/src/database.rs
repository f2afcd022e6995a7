//! Database service configuration.
//!
//! The engine is decoded as a plain string tag and resolved against the
//! closed [`DatabaseEngine`] set at validation time. An unsupported tag is a
//! validation failure with everything else that is wrong in the input, never
//! a decode failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::error::ValidationErrors;
use crate::service::ServiceConfig;

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseEngine {
    /// MySQL.
    MySql,
    /// MariaDB. Wire-compatible with MySQL, including the PDO driver.
    MariaDb,
    /// PostgreSQL.
    PostgreSql,
}

impl DatabaseEngine {
    /// Resolves a raw configuration tag to an engine.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "mysql" => Some(Self::MySql),
            "mariadb" => Some(Self::MariaDb),
            "postgres" | "postgresql" => Some(Self::PostgreSql),
            _ => None,
        }
    }

    /// Tags accepted in the stack description.
    #[must_use]
    pub const fn supported_tags() -> [&'static str; 4] {
        ["mysql", "mariadb", "postgres", "postgresql"]
    }

    /// PHP PDO driver extension for this engine.
    #[must_use]
    pub const fn driver_extension(self) -> &'static str {
        match self {
            Self::MySql | Self::MariaDb => "pdo_mysql",
            Self::PostgreSql => "pdo_pgsql",
        }
    }

    /// Port the engine listens on by default.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::MySql | Self::MariaDb => 3306,
            Self::PostgreSql => 5432,
        }
    }

    /// Container image name for this engine.
    #[must_use]
    pub const fn image(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::PostgreSql => "postgres",
        }
    }

    /// In-container directory where the engine stores its data.
    #[must_use]
    pub const fn data_dir(self) -> &'static str {
        match self {
            Self::MySql | Self::MariaDb => "/var/lib/mysql",
            Self::PostgreSql => "/var/lib/postgresql/data",
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MySql => write!(f, "mysql"),
            Self::MariaDb => write!(f, "mariadb"),
            Self::PostgreSql => write!(f, "postgres"),
        }
    }
}

/// Access credentials for the database service.
///
/// Owned exclusively by [`DatabaseConfig`] and never validated on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Credentials {
    /// Application user name.
    pub username: String,
    /// Application user password.
    pub password: String,
    /// Superuser password.
    pub root_password: String,
}

/// Database service block of a stack description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Raw engine tag, resolved via [`DatabaseConfig::engine`].
    pub system: String,
    /// Engine version, e.g. `"5.7"`.
    pub version: String,
    /// Name of the database to create.
    pub name: String,
    /// Published port. Defaults to the resolved engine's own port.
    pub port: Option<u16>,
    /// Access credentials, decoded from the same block.
    #[serde(flatten)]
    pub credentials: Credentials,
}

impl DatabaseConfig {
    /// Resolves the configured engine tag, or `None` for unsupported tags.
    #[must_use]
    pub fn engine(&self) -> Option<DatabaseEngine> {
        DatabaseEngine::from_tag(&self.system)
    }

    /// Runtime environment variables the engine container expects.
    ///
    /// The key names are a wire contract consumed by the container runtime
    /// and must stay stable. Returns `None` when the engine tag does not
    /// resolve.
    #[must_use]
    pub fn environment(&self) -> Option<BTreeMap<String, String>> {
        let engine = self.engine()?;
        let mut env = BTreeMap::new();

        match engine {
            DatabaseEngine::MySql | DatabaseEngine::MariaDb => {
                let _ = env.insert(
                    "MYSQL_ROOT_PASSWORD".to_owned(),
                    self.credentials.root_password.clone(),
                );
                let _ = env.insert("MYSQL_DATABASE".to_owned(), self.name.clone());
                let _ = env.insert("MYSQL_USER".to_owned(), self.credentials.username.clone());
                let _ = env.insert(
                    "MYSQL_PASSWORD".to_owned(),
                    self.credentials.password.clone(),
                );
            }
            DatabaseEngine::PostgreSql => {
                // The postgres image creates POSTGRES_USER as a superuser
                // with a single password slot, so the root password lands in
                // POSTGRES_PASSWORD.
                let _ = env.insert("POSTGRES_DB".to_owned(), self.name.clone());
                let _ = env.insert(
                    "POSTGRES_USER".to_owned(),
                    self.credentials.username.clone(),
                );
                let _ = env.insert(
                    "POSTGRES_PASSWORD".to_owned(),
                    self.credentials.root_password.clone(),
                );
            }
        }

        Some(env)
    }
}

impl ServiceConfig for DatabaseConfig {
    fn fill_defaults_if_not_set(&mut self) {
        // The port default depends on the engine, so an unresolvable tag
        // leaves the port unset and validation reports both problems.
        if self.port.is_none() {
            if let Some(engine) = self.engine() {
                self.port = Some(engine.default_port());
            }
        }
    }

    fn validate(&self) -> Option<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.system.is_empty() {
            errors.add("Database system is required");
        } else if self.engine().is_none() {
            errors.add(format!(
                "Unsupported database system \"{}\" (supported: {})",
                self.system,
                DatabaseEngine::supported_tags().join(", ")
            ));
        }

        if self.version.is_empty() {
            errors.add("Database version is required");
        }

        if self.name.is_empty() {
            errors.add("Database name is required");
        }

        if self.port == Some(0) {
            errors.add("Database port must be a positive number");
        }

        errors.into_option()
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
