use axum::{
    extract::{
        Form, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_LENGTH, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::application::{
    encode::Payload,
    error::TapError,
    sync::SyncRequest,
};

use super::HttpState;

/// Sync parameters as they appear on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SyncParams {
    #[serde(rename = "LANG")]
    lang: Option<String>,
    #[serde(rename = "QUERY")]
    query: Option<String>,
    #[serde(rename = "FORMAT")]
    format: Option<String>,
    #[serde(rename = "RESPONSEFORMAT")]
    response_format: Option<String>,
}

impl From<SyncParams> for SyncRequest {
    fn from(params: SyncParams) -> Self {
        SyncRequest {
            lang: params.lang,
            query: params.query,
            format: params.format,
            response_format: params.response_format,
        }
    }
}

pub(super) async fn sync_get(
    State(state): State<HttpState>,
    params: Result<Query<SyncParams>, QueryRejection>,
) -> Response {
    match params {
        Ok(Query(params)) => respond(&state, params.into()).await,
        Err(rejection) => TapError::MalformedRequest(rejection.body_text()).into_response(),
    }
}

pub(super) async fn sync_post(
    State(state): State<HttpState>,
    form: Result<Form<SyncParams>, FormRejection>,
) -> Response {
    match form {
        Ok(Form(params)) => respond(&state, params.into()).await,
        Err(rejection) => TapError::MalformedRequest(rejection.body_text()).into_response(),
    }
}

async fn respond(state: &HttpState, request: SyncRequest) -> Response {
    match state.sync.execute(&request).await {
        Ok(payload) => payload_response(payload),
        Err(err) => err.into_response(),
    }
}

fn payload_response(payload: Payload) -> Response {
    let headers = [
        (CONTENT_TYPE, HeaderValue::from_static(payload.content_type)),
        (CONTENT_LENGTH, HeaderValue::from(payload.len())),
    ];
    (StatusCode::OK, headers, payload.body).into_response()
}
