//! Serializable docker-compose file model.
//!
//! Services, networks, and volumes are kept as ordered lists and serialized
//! as insertion-ordered mappings, so the order services were assembled in is
//! the order they appear in the output file.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Compose file format version emitted by the assembler.
pub const COMPOSE_VERSION: &str = "3.8";

/// A complete docker-compose configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ComposeConfig {
    /// Compose file format version.
    pub version: String,
    /// Service definitions, in assembly order.
    #[serde(serialize_with = "serialize_services")]
    pub services: Vec<ComposeService>,
    /// Shared networks. Empty unless more than one service is configured.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_networks"
    )]
    pub networks: Vec<Network>,
    /// Named volumes. Empty unless a database service is configured.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_volumes"
    )]
    pub volumes: Vec<NamedVolume>,
}

impl ComposeConfig {
    /// Creates an empty configuration at [`COMPOSE_VERSION`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: COMPOSE_VERSION.to_owned(),
            services: Vec::new(),
            networks: Vec::new(),
            volumes: Vec::new(),
        }
    }

    /// Renders the configuration as docker-compose YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One service definition: its compose key plus the definition body.
#[derive(Debug, Clone, Serialize)]
pub struct ComposeService {
    /// Key under the `services` mapping.
    pub name: String,
    /// Definition body.
    pub spec: ServiceSpec,
}

/// Body of a service definition.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceSpec {
    /// Prebuilt image reference. Mutually exclusive with `build` in practice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Build instructions for services built from a generated Dockerfile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    /// Explicit container name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    /// Restart policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart: Option<String>,
    /// Working directory inside the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    /// Published ports.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortMapping>,
    /// Bind mounts and named volume mounts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeMount>,
    /// Injected environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
    /// Services this one depends on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Networks this service joins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
}

/// Build instructions for a service image.
#[derive(Debug, Clone, Serialize)]
pub struct Build {
    /// Build context directory.
    pub context: String,
    /// Dockerfile path relative to the context, when not the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
}

/// A `host:container` port mapping, serialized in compose short syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    /// Port published on the host.
    pub host: u16,
    /// Port inside the container.
    pub container: u16,
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.container)
    }
}

impl Serialize for PortMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A volume entry in compose short syntax: `source:target`, or a bare
/// source for anonymous named volumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    /// Host path or named volume.
    pub source: String,
    /// Mount point inside the container.
    pub target: Option<String>,
}

impl VolumeMount {
    /// Creates a mount of `source` at `target`.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: Some(target.into()),
        }
    }
}

impl fmt::Display for VolumeMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}:{}", self.source, target),
            None => write!(f, "{}", self.source),
        }
    }
}

impl Serialize for VolumeMount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Driver for a shared network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkDriver {
    /// The default bridge driver.
    Bridge,
}

/// A shared network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Network name.
    pub name: String,
    /// Network driver.
    pub driver: NetworkDriver,
}

/// Driver for a named volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeDriver {
    /// The default local driver.
    Local,
}

/// A named volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedVolume {
    /// Volume name.
    pub name: String,
    /// Volume driver.
    pub driver: VolumeDriver,
}

#[derive(Serialize)]
struct NetworkSpec {
    driver: NetworkDriver,
}

#[derive(Serialize)]
struct VolumeSpec {
    driver: VolumeDriver,
}

fn serialize_services<S: Serializer>(
    services: &[ComposeService],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(services.len()))?;
    for service in services {
        map.serialize_entry(&service.name, &service.spec)?;
    }
    map.end()
}

fn serialize_networks<S: Serializer>(
    networks: &[Network],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(networks.len()))?;
    for network in networks {
        map.serialize_entry(
            &network.name,
            &NetworkSpec {
                driver: network.driver,
            },
        )?;
    }
    map.end()
}

fn serialize_volumes<S: Serializer>(
    volumes: &[NamedVolume],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(volumes.len()))?;
    for volume in volumes {
        map.serialize_entry(
            &volume.name,
            &VolumeSpec {
                driver: volume.driver,
            },
        )?;
    }
    map.end()
}
