//! Environment-driven configuration for the hook binaries.
//!
//! Every loader has a `from_lookup` form taking the variable source as a
//! closure so tests never touch the process environment.

use std::path::{Path, PathBuf};

use deploy_hooks_core::contract::{source_tree_path, ArchiveRequest, ServiceImagePatch};

use crate::error::DeployHookError;

pub const TASK_ROOT_VAR: &str = "LAMBDA_TASK_ROOT";
pub const SCRATCH_DIR_VAR: &str = "SCRATCH_DIR";
pub const SERVICE_ARN_VAR: &str = "SERVICE_ARN";
pub const IMAGE_REPO_VAR: &str = "IMAGE_REPO";
pub const SRC_BUCKET_VAR: &str = "SRC_BUCKET";
pub const SRC_KEY_VAR: &str = "SRC_KEY";
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBundleConfig {
    pub task_root: PathBuf,
    pub scratch_dir: PathBuf,
}

impl SourceBundleConfig {
    pub fn from_env() -> Result<Self, DeployHookError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DeployHookError> {
        let task_root = required(&lookup, TASK_ROOT_VAR)?;
        let scratch_dir = optional(&lookup, SCRATCH_DIR_VAR)
            .unwrap_or_else(|| DEFAULT_SCRATCH_DIR.to_string());
        Ok(Self {
            task_root: PathBuf::from(task_root),
            scratch_dir: PathBuf::from(scratch_dir),
        })
    }

    pub fn source_dir(&self) -> PathBuf {
        source_tree_path(&self.task_root)
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn archive_request(&self, bucket: &str, key: &str) -> ArchiveRequest {
        ArchiveRequest::bundled_source(&self.task_root, bucket, key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerUpdateConfig {
    pub service_arn: String,
    pub image_repo: String,
}

impl RunnerUpdateConfig {
    pub fn from_env() -> Result<Self, DeployHookError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DeployHookError> {
        Ok(Self {
            service_arn: required(&lookup, SERVICE_ARN_VAR)?,
            image_repo: required(&lookup, IMAGE_REPO_VAR)?,
        })
    }

    pub fn patch(&self) -> ServiceImagePatch {
        ServiceImagePatch::latest(self.service_arn.clone(), &self.image_repo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUploadConfig {
    pub bundle: SourceBundleConfig,
    pub bucket: String,
    pub key: String,
}

impl SourceUploadConfig {
    pub fn from_env() -> Result<Self, DeployHookError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DeployHookError> {
        Ok(Self {
            bundle: SourceBundleConfig::from_lookup(&lookup)?,
            bucket: required(&lookup, SRC_BUCKET_VAR)?,
            key: required(&lookup, SRC_KEY_VAR)?,
        })
    }

    pub fn request(&self) -> ArchiveRequest {
        self.bundle.archive_request(&self.bucket, &self.key)
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, DeployHookError> {
    optional(lookup, key)
        .ok_or_else(|| DeployHookError::Config(format!("{key} must be configured")))
}
