use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{error, instrument};

use crate::state::AppState;

/// Health probe. Reports unavailable when the store does not answer a trivial
/// query.
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            error!(error = %e, "health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
