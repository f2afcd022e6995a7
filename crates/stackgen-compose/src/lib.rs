//! # stackgen-compose
//!
//! Docker-compose output side of the pipeline.
//!
//! - **Model**: serde-serializable compose file representation with stable,
//!   insertion-ordered service output.
//! - **Assemble**: turns a validated [`stackgen_config::config::FullConfig`]
//!   into that model, deriving ports, mounts, environment, and inter-service
//!   dependencies per service.

pub mod assemble;
pub mod model;
