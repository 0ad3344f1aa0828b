use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness plus a store connectivity probe; 503 when the store is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store_ok = state.store.ping().await;
    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "success": store_ok,
            "message": if store_ok { "Service is healthy" } else { "Store is unreachable" },
            "data": {
                "service": "edoo-api",
                "version": env!("CARGO_PKG_VERSION"),
                "store": {
                    "backend": state.store.backend_name(),
                    "connected": store_ok
                }
            }
        })),
    )
}

/// GET /api/health
pub async fn api_health_handler() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is running",
        "data": {
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339()
        }
    }))
}
