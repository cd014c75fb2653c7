use deploy_hooks_core::archive::validate_archive_key;
use deploy_hooks_core::contract::{
    dispatch_lifecycle, BootstrapProperties, CustomResourceEvent, LifecycleVerb,
    ServiceImagePatch, SourceTriggerProperties,
};
use serde_json::Value;

use crate::adapters::deployment::DeploymentService;
use crate::adapters::object_store::ObjectStore;
use crate::config::SourceBundleConfig;
use crate::error::DeployHookError;
use crate::handlers::archive_upload::archive_and_upload;
use crate::handlers::service_image::update_service_image;
use crate::telemetry::log_failure;

const BOOTSTRAP_COMPONENT: &str = "bootstrap";
const SOURCE_TRIGGER_COMPONENT: &str = "source_trigger";

pub fn handle_bootstrap_event(
    event: Value,
    bundle: &SourceBundleConfig,
    deployments: &impl DeploymentService,
    store: &impl ObjectStore,
) -> Result<LifecycleVerb, DeployHookError> {
    log_received(BOOTSTRAP_COMPONENT, &event);
    let result = parse_event(event).and_then(|event| {
        dispatch_lifecycle(&event, |properties: BootstrapProperties| {
            bootstrap(&properties, bundle, deployments, store)
        })
    });
    log_failure(BOOTSTRAP_COMPONENT, result)
        .inspect(|verb| log_completed(BOOTSTRAP_COMPONENT, *verb))
}

pub fn handle_source_trigger_event(
    event: Value,
    bundle: &SourceBundleConfig,
    store: &impl ObjectStore,
) -> Result<LifecycleVerb, DeployHookError> {
    log_received(SOURCE_TRIGGER_COMPONENT, &event);
    let result = parse_event(event).and_then(|event| {
        dispatch_lifecycle(&event, |properties: SourceTriggerProperties| {
            let request = bundle.archive_request(&properties.bucket, &properties.key);
            archive_and_upload(&request, store, bundle.scratch_dir()).map(|_| ())
        })
    });
    log_failure(SOURCE_TRIGGER_COMPONENT, result)
        .inspect(|verb| log_completed(SOURCE_TRIGGER_COMPONENT, *verb))
}

fn bootstrap(
    properties: &BootstrapProperties,
    bundle: &SourceBundleConfig,
    deployments: &impl DeploymentService,
    store: &impl ObjectStore,
) -> Result<(), DeployHookError> {
    // A bad key must fail before the service is redeployed.
    validate_archive_key(&properties.src_key)?;

    let patch = ServiceImagePatch::latest(properties.service_arn.clone(), &properties.image_repo);
    update_service_image(&patch, deployments)?;

    let request = bundle.archive_request(&properties.src_bucket, &properties.src_key);
    archive_and_upload(&request, store, bundle.scratch_dir())?;
    Ok(())
}

fn parse_event(event: Value) -> Result<CustomResourceEvent, DeployHookError> {
    Ok(CustomResourceEvent::from_value(event)?)
}

fn log_received(component: &'static str, event: &Value) {
    tracing::info!(component, event = "event_received", payload = %event, "received event");
}

fn log_completed(component: &'static str, verb: LifecycleVerb) {
    let event = if verb.applies_changes() {
        "lifecycle_applied"
    } else {
        "lifecycle_skipped"
    };
    tracing::info!(component, event, request_type = verb.as_str(), "lifecycle handled");
}
