//! HTTP surface: the sync endpoint and a database health check.

mod middleware;
mod sync;

pub use middleware::{REQUEST_ID_HEADER, RequestContext};
pub use sync::SyncParams;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
};
use sqlx::Error as SqlxError;

use crate::{
    application::{error::ErrorReport, sync::SyncService},
    infra::db::PostgresExecutor,
};

use middleware::{log_responses, set_request_context};

/// Liveness check against the backing database.
#[async_trait]
pub trait DatabaseHealth: Send + Sync {
    async fn ping(&self) -> Result<(), SqlxError>;
}

#[async_trait]
impl DatabaseHealth for PostgresExecutor {
    async fn ping(&self) -> Result<(), SqlxError> {
        self.health_check().await
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub sync: SyncService,
    pub db: Arc<dyn DatabaseHealth>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/sync", get(sync::sync_get).post(sync::sync_post))
        .route("/_health/db", get(db_health))
        .with_state(state)
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
}

async fn db_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.ping().await)
}

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
