use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimator::costs::CostBreakdown;
use crate::estimator::risk::RiskLevel;

/// Estimator output, persisted verbatim as `simulations.report_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub costs: Costs,
    pub summary: Summary,
    pub basic_recommendations: Vec<Recommendation>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Costs {
    pub breakdown: CostBreakdown,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub monthly: i64,
    pub yearly: i64,
    pub tuition_only: i64,
    pub living_expenses: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub monthly_expenses: i64,
    pub yearly_total: i64,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub location: String,
}
