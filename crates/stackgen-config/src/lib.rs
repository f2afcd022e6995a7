//! # stackgen-config
//!
//! Strongly-typed model of a PHP application stack description.
//!
//! This crate is the leaf of the workspace dependency graph. It decodes a
//! declarative YAML description into [`config::FullConfig`], fills
//! cross-service defaults, and validates the result, collecting every
//! violation into one [`error::ValidationErrors`] report instead of stopping
//! at the first failure.

pub mod config;
pub mod database;
pub mod error;
pub mod files;
pub mod nginx;
pub mod nodejs;
pub mod php;
pub mod service;
pub mod services;
