use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::envelope::{ApiResponse, AppJson};
use crate::errors::AppError;
use crate::models::simulation::{SimulationRow, SimulationSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SimulationPayload {
    pub simulation: SimulationRow,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSimulationPayload {
    pub wizard_data: Value,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SimulationListPayload {
    pub simulations: Vec<SimulationSummary>,
}

/// Wizard bodies must be a non-empty JSON object keyed by step.
pub fn validate_wizard(body: &Value) -> Result<(), AppError> {
    match body.as_object() {
        Some(steps) if !steps.is_empty() => Ok(()),
        Some(_) => Err(AppError::Validation("Wizard data is required".to_string())),
        None => Err(AppError::Validation(
            "Wizard data must be a JSON object".to_string(),
        )),
    }
}

/// POST /api/simulations
pub async fn handle_save(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(body): AppJson<Value>,
) -> Result<ApiResponse<SimulationPayload>, AppError> {
    validate_wizard(&body)?;
    let simulation = state.store.upsert_simulation(user.id, &body).await?;
    Ok(ApiResponse::ok(
        "Wizard data saved successfully",
        SimulationPayload { simulation },
    ))
}

/// GET /api/simulations/current
pub async fn handle_current(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<ApiResponse<CurrentSimulationPayload>, AppError> {
    let simulation = state.store.current_simulation(user.id).await?;
    Ok(ApiResponse::ok(
        "Simulation retrieved",
        CurrentSimulationPayload {
            wizard_data: simulation.wizard_data,
            status: simulation.status,
        },
    ))
}

/// GET /api/simulations
pub async fn handle_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<ApiResponse<SimulationListPayload>, AppError> {
    let rows = state.store.list_simulations(user.id).await?;
    Ok(ApiResponse::ok(
        "Simulations retrieved",
        SimulationListPayload {
            simulations: rows.iter().map(SimulationSummary::from).collect(),
        },
    ))
}

/// GET /api/simulations/:id
pub async fn handle_get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<SimulationPayload>, AppError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::NotFound("Simulation not found".to_string()))?;
    let simulation = state.store.get_simulation(user.id, id).await?;
    Ok(ApiResponse::ok("Simulation retrieved", SimulationPayload { simulation }))
}
