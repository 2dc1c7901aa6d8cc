use std::error::Error as StdError;

use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::DomainError,
    infra::{error::InfraError, fits::FitsError},
};

use super::{encode::votable, format::VOTABLE_CONTENT_TYPE, query::QueryError};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Failures of a sync request, each rendered as a VOTable error document.
#[derive(Debug, Error)]
pub enum TapError {
    #[error("Invalid LANG {0}")]
    InvalidLanguage(String),
    #[error("No query provided")]
    MissingQuery,
    #[error("Invalid format {0}")]
    InvalidFormat(String),
    #[error("Both FORMAT and RESPONSEFORMAT provided")]
    ConflictingFormatParams,
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("{0}")]
    QueryExecution(String),
    #[error("{0}")]
    Serialization(String),
}

impl TapError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TapError::InvalidLanguage(_)
            | TapError::MissingQuery
            | TapError::InvalidFormat(_)
            | TapError::ConflictingFormatParams
            | TapError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            TapError::QueryExecution(_) | TapError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Error document body for this failure.
    pub fn to_document(&self) -> String {
        votable::error_document(&self.to_string(), self.status_code().as_u16())
    }
}

impl From<QueryError> for TapError {
    fn from(error: QueryError) -> Self {
        TapError::QueryExecution(error.to_string())
    }
}

impl From<DomainError> for TapError {
    fn from(error: DomainError) -> Self {
        TapError::Serialization(error.to_string())
    }
}

impl From<FitsError> for TapError {
    fn from(error: FitsError) -> Self {
        TapError::Serialization(error.to_string())
    }
}

impl IntoResponse for TapError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_document();
        let report = ErrorReport::from_error("application::error::TapError", status, &self);
        let mut response = (status, [(CONTENT_TYPE, VOTABLE_CONTENT_TYPE)], body).into_response();
        report.attach(&mut response);
        response
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Tap(#[from] TapError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
