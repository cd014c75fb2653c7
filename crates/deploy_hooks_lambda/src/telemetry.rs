//! Records carry a `component` and an `event` field.

use tracing_subscriber::EnvFilter;

use crate::error::DeployHookError;

const DEFAULT_LOG_FILTER: &str = "info";

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .init();
}

pub fn log_failure<T>(
    component: &'static str,
    result: Result<T, DeployHookError>,
) -> Result<T, DeployHookError> {
    if let Err(error) = &result {
        tracing::error!(
            component,
            event = "hook_failed",
            error_kind = error.kind(),
            error = %error,
            "hook failed"
        );
    }
    result
}
