pub mod health;


use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::payments::handlers as payments;
use crate::reports::handlers as reports;
use crate::simulations::handlers as simulations;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::api_health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/profile", get(auth::handle_profile))
        // Wizard
        .route(
            "/api/simulations",
            get(simulations::handle_list).post(simulations::handle_save),
        )
        .route("/api/simulations/current", get(simulations::handle_current))
        .route("/api/simulations/:id", get(simulations::handle_get))
        // Reports
        .route("/api/reports/generate", post(reports::handle_generate))
        .route("/api/reports/current", get(reports::handle_current))
        .route("/api/reports/export/pdf", get(reports::handle_export_pdf))
        // Plan
        .route("/api/payments/plan", get(payments::handle_plan))
        .fallback(not_found)
        .with_state(state)
}
