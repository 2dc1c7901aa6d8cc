//! Query execution capability consumed by the sync service.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ResultSet;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Message reported by the database, passed through unchanged.
    #[error("{0}")]
    Database(String),
    #[error("column `{column}` has unsupported type {type_name}")]
    UnsupportedType { column: String, type_name: String },
    #[error("failed to decode column `{column}`: {message}")]
    Decode { column: String, message: String },
}

/// Runs one SQL statement and returns its rows as a canonical result.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<ResultSet, QueryError>;
}
