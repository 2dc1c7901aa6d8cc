use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const METRIC_SYNC_REQUESTS: &str = "ataps_sync_requests_total";
pub const METRIC_SYNC_ERRORS: &str = "ataps_sync_errors_total";
pub const METRIC_ENCODE_MS: &str = "ataps_encode_ms";
pub const METRIC_RESULT_ROWS: &str = "ataps_result_rows";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install the global tracing subscriber and register metric descriptions.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_SYNC_REQUESTS,
            Unit::Count,
            "Sync requests that passed validation, by output format."
        );
        describe_counter!(
            METRIC_SYNC_ERRORS,
            Unit::Count,
            "Sync requests answered with an error document, by HTTP status."
        );
        describe_histogram!(
            METRIC_ENCODE_MS,
            Unit::Milliseconds,
            "Time spent encoding a result, by output format."
        );
        describe_histogram!(
            METRIC_RESULT_ROWS,
            Unit::Count,
            "Rows per encoded result."
        );
    });
}
