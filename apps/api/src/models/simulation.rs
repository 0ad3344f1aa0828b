use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    Draft,
    Completed,
}

impl SimulationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationStatus::Draft => "draft",
            SimulationStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the `simulations` table. `status` holds a `SimulationStatus` string.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SimulationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wizard_data: Value,
    pub report_data: Option<Value>,
    pub status: String,
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing view: everything except the payloads.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub id: Uuid,
    pub status: String,
    pub revision: i64,
    pub has_report: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SimulationRow> for SimulationSummary {
    fn from(row: &SimulationRow) -> Self {
        SimulationSummary {
            id: row.id,
            status: row.status.clone(),
            revision: row.revision,
            has_report: row.report_data.is_some(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
