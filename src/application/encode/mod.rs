//! Result encoders and the format dispatcher.

pub mod delimited;
pub mod fits;
pub mod html;
pub mod text;
pub mod votable;

use std::time::Instant;

use bytes::Bytes;
use metrics::histogram;
use tracing::debug;

use crate::{
    domain::ResultSet,
    infra::telemetry::{METRIC_ENCODE_MS, METRIC_RESULT_ROWS},
};

use super::{error::TapError, format::ResponseFormat};

/// Encoded response body and its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub body: Bytes,
    pub content_type: &'static str,
}

impl Payload {
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Encode `result` in the format named by `format_name`.
pub fn dispatch(result: &ResultSet, format_name: &str) -> Result<Payload, TapError> {
    let format: ResponseFormat = format_name.parse()?;
    encode(result, format)
}

pub fn encode(result: &ResultSet, format: ResponseFormat) -> Result<Payload, TapError> {
    let started = Instant::now();

    let body = match format {
        ResponseFormat::VoTable => Bytes::from(votable::encode(result)),
        ResponseFormat::Csv => Bytes::from(delimited::encode(result, delimited::COMMA)?),
        ResponseFormat::Tsv => Bytes::from(delimited::encode(result, delimited::TAB)?),
        ResponseFormat::Fits => Bytes::from(fits::encode(result)?),
        ResponseFormat::Text => Bytes::from(text::encode(result)),
        ResponseFormat::Html => Bytes::from(html::encode(result)?),
    };

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_ENCODE_MS, "format" => format.as_str()).record(elapsed_ms);
    histogram!(METRIC_RESULT_ROWS).record(result.len() as f64);
    debug!(
        target = "ataps::encode",
        format = format.as_str(),
        rows = result.len(),
        columns = result.columns().len(),
        bytes = body.len(),
        elapsed_ms,
        "result encoded"
    );

    Ok(Payload {
        body,
        content_type: format.content_type(),
    })
}
