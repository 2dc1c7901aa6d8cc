//! Postgres-backed query execution.

mod decode;
mod util;

pub use decode::decode_row;
pub use util::map_sqlx_error;

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    query,
};
use tracing::debug;

use crate::{
    application::query::{QueryError, QueryExecutor},
    domain::ResultSet,
};

/// Executes statements on a connection pool; each request checks out its own
/// connection.
#[derive(Clone)]
pub struct PostgresExecutor {
    pool: PgPool,
}

impl PostgresExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    async fn execute(&self, sql: &str) -> Result<ResultSet, QueryError> {
        let mut rows = query(sql).fetch(self.pool());
        let mut records = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
            records.push(decode_row(&row)?);
        }
        debug!(target = "ataps::db", rows = records.len(), "statement fetched");
        Ok(ResultSet::from_records(records))
    }
}
