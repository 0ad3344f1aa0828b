use axum::extract::State;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::{AuthUser, PremiumUser};
use crate::envelope::ApiResponse;
use crate::errors::AppError;
use crate::estimator::{self, report::FinancialReport};
use crate::state::AppState;
use crate::store::StoreError;

/// POST /api/reports/generate
///
/// Loads the caller's current wizard data, runs the estimator and overwrites
/// the stored report, marking the simulation completed.
pub async fn handle_generate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<ApiResponse<FinancialReport>, AppError> {
    let simulation = match state.store.current_simulation(user.id).await {
        Ok(simulation) => simulation,
        Err(StoreError::NotFound(_)) => {
            return Err(AppError::NotFound(
                "No simulation data found to generate the report".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    let report = estimator::analyze_now(&simulation.wizard_data);
    let report_json = serde_json::to_value(&report).map_err(|e| AppError::Internal(e.into()))?;
    state
        .store
        .attach_report(user.id, simulation.revision, &report_json)
        .await?;

    info!(
        "Generated report for user {} (risk {:?}, yearly {})",
        user.id, report.summary.risk_level, report.summary.yearly_total
    );
    Ok(ApiResponse::ok("Report generated successfully", report))
}

/// GET /api/reports/current
pub async fn handle_current(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<ApiResponse<Value>, AppError> {
    match state.store.current_report(user.id).await {
        Ok(report) => Ok(ApiResponse::ok("Report retrieved", report)),
        Err(StoreError::NotFound(_)) => Err(AppError::NotFound(
            "No previous analysis found".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Serialize)]
pub struct ExportUserInfo {
    pub name: String,
    pub email: String,
}

/// Report plus the owner details a client needs to render a document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub report_data: Value,
    pub user_info: ExportUserInfo,
    pub export_format: &'static str,
}

/// GET /api/reports/export/pdf
///
/// Premium only. Rendering happens client-side; this returns the data.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    PremiumUser(user): PremiumUser,
) -> Result<ApiResponse<ExportPayload>, AppError> {
    let report_data = match state.store.current_report(user.id).await {
        Ok(report) => report,
        Err(StoreError::NotFound(_)) => {
            return Err(AppError::NotFound("No analysis found to export".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    info!("Prepared PDF export for user {}", user.id);
    Ok(ApiResponse::ok(
        "Data prepared for PDF export",
        ExportPayload {
            report_data,
            user_info: ExportUserInfo {
                name: user.name,
                email: user.email,
            },
            export_format: "pdf",
        },
    ))
}
