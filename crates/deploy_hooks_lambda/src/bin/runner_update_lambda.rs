use aws_config::BehaviorVersion;
use deploy_hooks_lambda::adapters::apprunner::AppRunnerDeploymentService;
use deploy_hooks_lambda::config::RunnerUpdateConfig;
use deploy_hooks_lambda::handlers::environment::handle_runner_update;
use deploy_hooks_lambda::telemetry::{init_logging, log_failure};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    _event: LambdaEvent<Value>,
    deployments: &AppRunnerDeploymentService,
) -> Result<(), Error> {
    let config = log_failure("runner_update", RunnerUpdateConfig::from_env())?;
    handle_runner_update(&config, deployments)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let deployments = AppRunnerDeploymentService::new(aws_sdk_apprunner::Client::new(&aws_config));

    lambda_runtime::run(service_fn(|event| handle_request(event, &deployments))).await
}
