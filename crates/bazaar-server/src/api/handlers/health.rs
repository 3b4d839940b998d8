//! Liveness endpoint

use crate::api::AppState;
use crate::api::dto::HealthResponse;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// `GET /health`: 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> Response {
    let status = match state.db.health_check().await {
        Ok(()) => state.db.migration_status().await,
        Err(e) => Err(e),
    };

    match status {
        Ok(status) => Json(HealthResponse {
            status: "ok",
            schema_version: status.current_version,
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    schema_version: 0,
                }),
            )
                .into_response()
        }
    }
}
