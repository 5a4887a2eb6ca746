//! Liveness and readiness probes for the catalog process

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusReport {
    /// `healthy` for liveness, `ready` once the book store answers
    #[schema(example = "ready")]
    pub status: &'static str,
    /// Crate version of the running binary
    pub version: &'static str,
}

impl StatusReport {
    fn new(status: &'static str) -> Json<Self> {
        Json(Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
        })
    }
}

/// The process is up; says nothing about the store
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive", body = StatusReport))
)]
pub async fn health_check() -> Json<StatusReport> {
    StatusReport::new("healthy")
}

/// The book store is reachable and can serve requests
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Book store reachable", body = StatusReport),
        (status = 500, description = "Book store unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> AppResult<Json<StatusReport>> {
    state.services.books.ping().await?;
    Ok(StatusReport::new("ready"))
}
