//! Deployment hook domain primitives.
//!
//! This crate owns the request contracts, lifecycle dispatch rules and the zip
//! tree writer. It intentionally excludes AWS SDK and Lambda runtime concerns,
//! which live in `deploy_hooks_lambda`.

pub mod archive;
pub mod contract;
