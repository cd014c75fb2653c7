use aws_config::BehaviorVersion;
use deploy_hooks_lambda::adapters::s3::S3ObjectStore;
use deploy_hooks_lambda::config::SourceBundleConfig;
use deploy_hooks_lambda::handlers::custom_resource::handle_source_trigger_event;
use deploy_hooks_lambda::telemetry::{init_logging, log_failure};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>, store: &S3ObjectStore) -> Result<(), Error> {
    let bundle = log_failure("source_trigger", SourceBundleConfig::from_env())?;
    handle_source_trigger_event(event.payload, &bundle, store)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = S3ObjectStore::new(aws_sdk_s3::Client::new(&aws_config));

    lambda_runtime::run(service_fn(|event| handle_request(event, &store))).await
}
