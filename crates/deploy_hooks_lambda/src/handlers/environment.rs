use deploy_hooks_core::archive::ArchiveSummary;

use crate::adapters::deployment::DeploymentService;
use crate::adapters::object_store::ObjectStore;
use crate::config::{RunnerUpdateConfig, SourceUploadConfig};
use crate::error::DeployHookError;
use crate::handlers::archive_upload::archive_and_upload;
use crate::handlers::service_image::update_service_image;
use crate::telemetry::log_failure;

const RUNNER_UPDATE_COMPONENT: &str = "runner_update";
const SOURCE_UPLOAD_COMPONENT: &str = "source_upload";

pub fn handle_runner_update(
    config: &RunnerUpdateConfig,
    deployments: &impl DeploymentService,
) -> Result<(), DeployHookError> {
    log_failure(
        RUNNER_UPDATE_COMPONENT,
        update_service_image(&config.patch(), deployments),
    )
}

pub fn handle_source_upload(
    config: &SourceUploadConfig,
    store: &impl ObjectStore,
) -> Result<ArchiveSummary, DeployHookError> {
    log_failure(
        SOURCE_UPLOAD_COMPONENT,
        archive_and_upload(&config.request(), store, config.bundle.scratch_dir()),
    )
}
