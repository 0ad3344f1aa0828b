use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use crate::auth::token::TokenError;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::store::StoreError;

/// The authenticated caller, resolved from `Authorization: Bearer <token>`
/// before the handler body runs. Rejections render as 401 envelopes.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

        let claims = state.tokens.verify(token).map_err(|e| {
            warn!("Rejected bearer token: {e}");
            match e {
                TokenError::Expired => AppError::Unauthorized("Token expired".to_string()),
                _ => AppError::Unauthorized("Invalid token".to_string()),
            }
        })?;

        match state.store.get_user(claims.sub).await {
            Ok(user) => Ok(AuthUser(user)),
            Err(StoreError::NotFound(_)) => {
                warn!("Token subject {} no longer exists", claims.sub);
                Err(AppError::Unauthorized("Invalid token - user not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// An authenticated caller on the premium plan. Free-plan callers get 403.
#[derive(Debug, Clone)]
pub struct PremiumUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for PremiumUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_premium {
            return Err(AppError::Forbidden(
                "Access denied - premium plan required".to_string(),
            ));
        }
        Ok(PremiumUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
