use aws_sdk_apprunner::error::DisplayErrorContext;
use aws_sdk_apprunner::types::SourceConfiguration;

use crate::adapters::deployment::DeploymentService;

#[derive(Debug, Clone)]
pub struct AppRunnerDeploymentService {
    client: aws_sdk_apprunner::Client,
}

impl AppRunnerDeploymentService {
    pub fn new(client: aws_sdk_apprunner::Client) -> Self {
        Self { client }
    }
}

impl DeploymentService for AppRunnerDeploymentService {
    fn describe_source_configuration(
        &self,
        service_arn: &str,
    ) -> Result<SourceConfiguration, String> {
        let arn = service_arn.to_string();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .describe_service()
                    .service_arn(&arn)
                    .send()
                    .await
                    .map_err(|error| {
                        format!(
                            "failed to describe app runner service: {}",
                            DisplayErrorContext(&error)
                        )
                    })?;
                output
                    .service
                    .and_then(|service| service.source_configuration)
                    .ok_or_else(|| format!("service '{arn}' has no source configuration"))
            })
        })
    }

    fn update_source_configuration(
        &self,
        service_arn: &str,
        configuration: SourceConfiguration,
    ) -> Result<(), String> {
        let arn = service_arn.to_string();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .update_service()
                    .service_arn(arn)
                    .source_configuration(configuration)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!(
                            "failed to update app runner service: {}",
                            DisplayErrorContext(&error)
                        )
                    })
            })
        })
    }
}
