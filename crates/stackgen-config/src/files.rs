//! File-mount descriptors for generated per-service artifacts.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::service::Service;

/// Kind of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A Dockerfile used to build the service image.
    Dockerfile,
    /// A configuration file mounted into the running container.
    ConfigFile,
}

/// Descriptor pairing a template resource with its destination.
///
/// The template contents are owned by the render collaborator; this crate
/// only derives where the rendered file lands and, for mounted config files,
/// where it appears inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// What kind of artifact this is.
    pub kind: FileKind,
    /// Destination path on the host, rooted at the resolved output path.
    pub path_on_host: PathBuf,
    /// Mount path inside the container, when the file is mounted at runtime.
    pub path_in_container: Option<String>,
    /// Template resource path understood by the render collaborator.
    pub template_path: String,
}

/// Per-service file lists in canonical service order.
///
/// A service with no file artifacts has no entry, rather than an empty list.
pub type Files = BTreeMap<Service, Vec<File>>;
