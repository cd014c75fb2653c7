use aws_sdk_apprunner::types::SourceConfiguration;

pub trait DeploymentService {
    fn describe_source_configuration(
        &self,
        service_arn: &str,
    ) -> Result<SourceConfiguration, String>;

    fn update_source_configuration(
        &self,
        service_arn: &str,
        configuration: SourceConfiguration,
    ) -> Result<(), String>;
}
