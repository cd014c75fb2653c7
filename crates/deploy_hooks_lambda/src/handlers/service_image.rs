use aws_sdk_apprunner::types::SourceConfiguration;
use deploy_hooks_core::contract::ServiceImagePatch;

use crate::adapters::deployment::DeploymentService;
use crate::error::DeployHookError;

const COMPONENT: &str = "service_image";

/// Points the service at `patch.image_identifier` and triggers a redeploy.
///
/// The fetched configuration is sent back whole with only the image
/// identifier replaced. The call returns once the update is accepted.
pub fn update_service_image(
    patch: &ServiceImagePatch,
    deployments: &impl DeploymentService,
) -> Result<(), DeployHookError> {
    let mut configuration = deployments
        .describe_source_configuration(&patch.service_arn)
        .map_err(|message| DeployHookError::provider("describe_service", message))?;

    let previous = apply_image_identifier(&mut configuration, &patch.image_identifier)?;

    deployments
        .update_source_configuration(&patch.service_arn, configuration)
        .map_err(|message| DeployHookError::provider("update_service", message))?;

    tracing::info!(
        component = COMPONENT,
        event = "service_update_requested",
        service_arn = %patch.service_arn,
        previous_image = %previous,
        image = %patch.image_identifier,
        "service update requested"
    );
    Ok(())
}

pub fn apply_image_identifier(
    configuration: &mut SourceConfiguration,
    image_identifier: &str,
) -> Result<String, DeployHookError> {
    let Some(image_repository) = configuration.image_repository.as_mut() else {
        return Err(DeployHookError::InvalidInput(
            "service source configuration has no image repository".to_string(),
        ));
    };
    Ok(std::mem::replace(
        &mut image_repository.image_identifier,
        image_identifier.to_string(),
    ))
}
