//! Axum route handlers for registration, login and profile.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::credentials::{self, validate_registration};
use crate::auth::extractor::AuthUser;
use crate::envelope::{ApiResponse, AppJson};
use crate::errors::AppError;
use crate::models::user::{User, UserProfile};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfilePayload {
    pub user: UserProfile,
}

fn auth_payload(state: &AppState, user: &User) -> Result<AuthPayload, AppError> {
    let token = state
        .tokens
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(AuthPayload {
        user: UserProfile::from(user),
        token,
    })
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<AuthPayload>), AppError> {
    let registration = validate_registration(
        req.name.as_deref(),
        req.email.as_deref(),
        req.password.as_deref(),
    )?;
    let user = credentials::register(state.store.as_ref(), registration).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("User registered successfully", auth_payload(&state, &user)?),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<ApiResponse<AuthPayload>, AppError> {
    let (Some(email), Some(password)) = (
        req.email.filter(|e| !e.trim().is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let user = credentials::verify(state.store.as_ref(), &email, &password).await?;
    Ok(ApiResponse::ok("Login successful", auth_payload(&state, &user)?))
}

/// GET /api/auth/profile
///
/// `AuthUser` has already loaded the caller's row.
pub async fn handle_profile(AuthUser(user): AuthUser) -> ApiResponse<ProfilePayload> {
    ApiResponse::ok(
        "Profile retrieved",
        ProfilePayload {
            user: UserProfile::from(&user),
        },
    )
}
