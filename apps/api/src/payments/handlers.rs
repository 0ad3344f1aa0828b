use serde::Serialize;

use crate::auth::AuthUser;
use crate::envelope::ApiResponse;
use crate::errors::AppError;
use crate::models::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPayload {
    pub plan: Plan,
    pub is_premium: bool,
}

impl From<&User> for PlanPayload {
    fn from(user: &User) -> Self {
        PlanPayload {
            plan: if user.is_premium { Plan::Premium } else { Plan::Free },
            is_premium: user.is_premium,
        }
    }
}

/// GET /api/payments/plan
pub async fn handle_plan(AuthUser(user): AuthUser) -> Result<ApiResponse<PlanPayload>, AppError> {
    Ok(ApiResponse::ok("Plan retrieved", PlanPayload::from(&user)))
}
