//! Synchronous query flow: validate, execute, encode.

use std::sync::Arc;

use metrics::counter;
use tracing::{info, instrument, warn};

use crate::infra::telemetry::{METRIC_SYNC_ERRORS, METRIC_SYNC_REQUESTS};

use super::{
    encode::{self, Payload},
    error::TapError,
    format::ResponseFormat,
    query::QueryExecutor,
};

pub const SUPPORTED_LANG: &str = "PSQL";

/// Raw sync parameters. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncRequest {
    pub lang: Option<String>,
    pub query: Option<String>,
    pub format: Option<String>,
    pub response_format: Option<String>,
}

impl SyncRequest {
    pub fn new(lang: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = Some(format.into());
        self
    }

    /// Check LANG, then QUERY, then the format parameters.
    pub fn validate(&self) -> Result<(&str, ResponseFormat), TapError> {
        let lang = present(&self.lang);
        if lang != Some(SUPPORTED_LANG) {
            return Err(TapError::InvalidLanguage(
                lang.unwrap_or_default().to_string(),
            ));
        }

        let query = present(&self.query).ok_or(TapError::MissingQuery)?;
        let format = ResponseFormat::resolve(present(&self.format), present(&self.response_format))?;
        Ok((query, format))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

#[derive(Clone)]
pub struct SyncService {
    executor: Arc<dyn QueryExecutor>,
}

impl SyncService {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn execute(&self, request: &SyncRequest) -> Result<Payload, TapError> {
        let outcome = self.run(request).await;
        if let Err(err) = &outcome {
            let status = err.status_code();
            counter!(METRIC_SYNC_ERRORS, "status" => status.as_u16().to_string()).increment(1);
            warn!(
                target = "ataps::sync",
                status = status.as_u16(),
                error = %err,
                "sync request failed"
            );
        }
        outcome
    }

    #[instrument(name = "sync", skip_all, fields(format = tracing::field::Empty))]
    async fn run(&self, request: &SyncRequest) -> Result<Payload, TapError> {
        let (query, format) = request.validate()?;
        tracing::Span::current().record("format", format.as_str());
        counter!(METRIC_SYNC_REQUESTS, "format" => format.as_str()).increment(1);

        let result = self.executor.execute(query).await?;
        info!(
            target = "ataps::sync",
            rows = result.len(),
            columns = result.columns().len(),
            "query executed"
        );

        encode::encode(&result, format)
    }
}
