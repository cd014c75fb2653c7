use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const LATEST_IMAGE_TAG: &str = "latest";
pub const SOURCE_TREE_DIR: &str = "src";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("Invalid request type: {0}")]
    InvalidRequestType(String),
    #[error("Malformed custom resource event: {0}")]
    MalformedEvent(String),
    #[error("Invalid resource properties: {0}")]
    InvalidProperties(String),
}

/// Phase of a managed resource's life that triggered the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleVerb {
    Create,
    Update,
    Delete,
}

impl LifecycleVerb {
    pub fn parse(value: &str) -> Result<Self, ContractError> {
        match value {
            "Create" => Ok(Self::Create),
            "Update" => Ok(Self::Update),
            "Delete" => Ok(Self::Delete),
            other => Err(ContractError::InvalidRequestType(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    pub fn applies_changes(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for LifecycleVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of a provider-framework custom resource event the hooks read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomResourceEvent {
    #[serde(rename = "RequestType")]
    pub request_type: String,
    #[serde(rename = "ResourceProperties", default)]
    pub resource_properties: Map<String, Value>,
}

impl CustomResourceEvent {
    pub fn from_value(event: Value) -> Result<Self, ContractError> {
        serde_json::from_value(event)
            .map_err(|error| ContractError::MalformedEvent(error.to_string()))
    }

    pub fn verb(&self) -> Result<LifecycleVerb, ContractError> {
        LifecycleVerb::parse(&self.request_type)
    }

    pub fn properties<T: DeserializeOwned>(&self) -> Result<T, ContractError> {
        serde_json::from_value(Value::Object(self.resource_properties.clone()))
            .map_err(|error| ContractError::InvalidProperties(error.to_string()))
    }
}

/// Runs `action` with the decoded properties for Create and Update.
///
/// Delete returns without decoding properties or running the action. An
/// unknown verb fails before anything else happens. The parsed verb is
/// returned so callers can log what was done.
pub fn dispatch_lifecycle<P, E>(
    event: &CustomResourceEvent,
    action: impl FnOnce(P) -> Result<(), E>,
) -> Result<LifecycleVerb, E>
where
    P: DeserializeOwned,
    E: From<ContractError>,
{
    let verb = event.verb()?;
    if verb.applies_changes() {
        let properties = event.properties::<P>()?;
        action(properties)?;
    }
    Ok(verb)
}

/// Properties of the bootstrap resource: point the service at the latest
/// image and publish the bundled source tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapProperties {
    pub service_arn: String,
    pub image_repo: String,
    pub src_bucket: String,
    pub src_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceTriggerProperties {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub source_dir: PathBuf,
    pub bucket: String,
    pub key: String,
}

impl ArchiveRequest {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Request for the source tree bundled under `<task_root>/src`.
    pub fn bundled_source(
        task_root: &Path,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::new(source_tree_path(task_root), bucket, key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceImagePatch {
    pub service_arn: String,
    pub image_identifier: String,
}

impl ServiceImagePatch {
    pub fn latest(service_arn: impl Into<String>, repository: &str) -> Self {
        Self {
            service_arn: service_arn.into(),
            image_identifier: latest_image_identifier(repository),
        }
    }
}

pub fn latest_image_identifier(repository: &str) -> String {
    format!("{repository}:{LATEST_IMAGE_TAG}")
}

pub fn source_tree_path(task_root: &Path) -> PathBuf {
    task_root.join(SOURCE_TREE_DIR)
}
