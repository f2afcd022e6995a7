//! Assembly of a validated stack description into a compose configuration.
//!
//! The assembler takes input that already passed validation and therefore
//! has no error return. Per-service file lists and environment maps are
//! computed once per call and shared across all service assembly steps.

use stackgen_config::config::{Environment, FullConfig};
use stackgen_config::files::{FileKind, Files};
use stackgen_config::nginx::{DEFAULT_HTTP_PORT, DEFAULT_HTTPS_PORT};
use stackgen_config::service::Service;
use stackgen_config::services::ServicesConfig;

use crate::model::{
    Build, ComposeConfig, ComposeService, NamedVolume, Network, NetworkDriver, PortMapping,
    ServiceSpec, VolumeDriver, VolumeMount,
};

/// Restart policy applied to every assembled service.
const RESTART_POLICY: &str = "unless-stopped";

/// Everything the per-service assembly steps share for one invocation.
struct StackContext<'a> {
    app: String,
    services: &'a ServicesConfig,
    files: Files,
    environment: Option<Environment>,
    project_root: String,
    network: Option<String>,
}

impl StackContext<'_> {
    fn code_dir(&self) -> String {
        format!("/var/www/{}", self.app)
    }

    fn networks(&self) -> Vec<String> {
        self.network.iter().cloned().collect()
    }
}

/// Assembles a compose configuration from a validated stack description.
///
/// Services appear in canonical enumeration order. A shared network is
/// created when more than one service is present, and a named data volume
/// when a database is present.
///
/// # Panics
///
/// Panics when called with a configuration that did not pass validation,
/// e.g. with no services or an unresolvable database engine. That is a
/// caller contract breach, not a recoverable error.
#[allow(clippy::expect_used)]
pub fn assemble(config: &FullConfig) -> ComposeConfig {
    tracing::info!(app = %config.app_name, "assembling compose configuration");

    let services = config
        .services
        .as_ref()
        .expect("configuration must be validated before assembly");

    let app = slug(&config.app_name);
    let mut compose = ComposeConfig::new();

    if services.present_services_count() > 1 {
        compose.networks.push(default_network(&app));
    }

    if services.is_present(Service::Database) {
        compose.volumes.push(default_volume(&app));
    }

    let context = StackContext {
        network: compose.networks.first().map(|n| n.name.clone()),
        app,
        services,
        files: config.service_files(),
        environment: config.environment(),
        project_root: config.project_root.display().to_string(),
    };

    for service in Service::all() {
        if !services.is_present(service) {
            continue;
        }

        let spec = match service {
            Service::Php => assemble_php(&context),
            Service::Nginx => assemble_nginx(&context),
            Service::Database => assemble_database(&context),
            Service::NodeJs => assemble_nodejs(&context),
        };

        compose.services.push(ComposeService {
            name: service.key().to_owned(),
            spec,
        });
    }

    compose
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn default_network(app: &str) -> Network {
    Network {
        name: format!("{app}-network"),
        driver: NetworkDriver::Bridge,
    }
}

fn default_volume(app: &str) -> NamedVolume {
    NamedVolume {
        name: format!("{app}-data"),
        driver: VolumeDriver::Local,
    }
}

/// Build context for a service built from a generated Dockerfile.
///
/// Every present PHP and NodeJS service owns a Dockerfile entry in the
/// service file map, so a missing entry means the input skipped validation.
#[allow(clippy::expect_used)]
fn dockerfile_context(files: &Files, service: Service) -> String {
    files
        .get(&service)
        .and_then(|entries| {
            entries
                .iter()
                .find(|file| file.kind == FileKind::Dockerfile)
                .and_then(|file| file.path_on_host.parent())
        })
        .map(|dir| dir.display().to_string())
        .expect("configuration must be validated before assembly")
}

fn assemble_php(context: &StackContext<'_>) -> ServiceSpec {
    let mut depends_on = Vec::new();
    if context.services.is_present(Service::Database) {
        depends_on.push(Service::Database.key().to_owned());
    }

    ServiceSpec {
        build: Some(Build {
            context: dockerfile_context(&context.files, Service::Php),
            dockerfile: None,
        }),
        container_name: Some(format!("{}-php", context.app)),
        restart: Some(RESTART_POLICY.to_owned()),
        working_dir: Some(context.code_dir()),
        volumes: vec![VolumeMount::new(
            context.project_root.clone(),
            context.code_dir(),
        )],
        depends_on,
        networks: context.networks(),
        ..ServiceSpec::default()
    }
}

fn assemble_nginx(context: &StackContext<'_>) -> ServiceSpec {
    let nginx = context.services.nginx.as_ref();

    let ports = vec![
        PortMapping {
            host: nginx
                .and_then(|n| n.http_port)
                .unwrap_or(DEFAULT_HTTP_PORT),
            container: DEFAULT_HTTP_PORT,
        },
        PortMapping {
            host: nginx
                .and_then(|n| n.https_port)
                .unwrap_or(DEFAULT_HTTPS_PORT),
            container: DEFAULT_HTTPS_PORT,
        },
    ];

    let mut volumes = vec![VolumeMount::new(
        context.project_root.clone(),
        context.code_dir(),
    )];
    volumes.extend(config_file_mounts(&context.files, Service::Nginx));

    let mut depends_on = Vec::new();
    if context.services.is_present(Service::Php) {
        depends_on.push(Service::Php.key().to_owned());
    }

    ServiceSpec {
        image: Some("nginx:stable-alpine".to_owned()),
        container_name: Some(format!("{}-nginx", context.app)),
        restart: Some(RESTART_POLICY.to_owned()),
        ports,
        volumes,
        depends_on,
        networks: context.networks(),
        ..ServiceSpec::default()
    }
}

/// Mounts for generated config files that live inside the container.
fn config_file_mounts(files: &Files, service: Service) -> Vec<VolumeMount> {
    files
        .get(&service)
        .map(|entries| {
            entries
                .iter()
                .filter(|file| file.kind == FileKind::ConfigFile)
                .filter_map(|file| {
                    file.path_in_container.as_ref().map(|target| {
                        VolumeMount::new(file.path_on_host.display().to_string(), target.clone())
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[allow(clippy::expect_used)]
fn assemble_database(context: &StackContext<'_>) -> ServiceSpec {
    let database = context
        .services
        .database
        .as_ref()
        .expect("configuration must be validated before assembly");
    let engine = database
        .engine()
        .expect("configuration must be validated before assembly");

    let environment = context
        .environment
        .as_ref()
        .and_then(|env| env.get(&Service::Database))
        .cloned();

    ServiceSpec {
        image: Some(format!("{}:{}", engine.image(), database.version)),
        container_name: Some(format!("{}-database", context.app)),
        restart: Some(RESTART_POLICY.to_owned()),
        ports: vec![PortMapping {
            host: database.port.unwrap_or_else(|| engine.default_port()),
            container: engine.default_port(),
        }],
        volumes: vec![VolumeMount::new(
            format!("{}-data", context.app),
            engine.data_dir(),
        )],
        environment,
        networks: context.networks(),
        ..ServiceSpec::default()
    }
}

fn assemble_nodejs(context: &StackContext<'_>) -> ServiceSpec {
    ServiceSpec {
        build: Some(Build {
            context: dockerfile_context(&context.files, Service::NodeJs),
            dockerfile: None,
        }),
        container_name: Some(format!("{}-nodejs", context.app)),
        restart: Some(RESTART_POLICY.to_owned()),
        working_dir: Some(context.code_dir()),
        volumes: vec![VolumeMount::new(
            context.project_root.clone(),
            context.code_dir(),
        )],
        networks: context.networks(),
        ..ServiceSpec::default()
    }
}
