//! AWS-oriented adapters and handlers for the deployment hook Lambdas.
//!
//! This crate owns runtime integration details (Lambda handlers, S3 and App
//! Runner adapters, environment configuration, logging) and builds on the
//! AWS-free contracts in `deploy_hooks_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;
