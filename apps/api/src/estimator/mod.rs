//! Financial estimator: wizard answers → cost breakdown, risk and advice.
//!
//! Pure and infallible. Malformed or partial wizard data is defaulted, never
//! rejected. The generation instant is a parameter so output is reproducible.

pub mod costs;
pub mod recommendations;
pub mod report;
pub mod risk;
pub mod wizard;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::estimator::costs::{CostBreakdown, Country, FamilyStatus};
use crate::estimator::recommendations::basic_recommendations;
use crate::estimator::report::{Costs, FinancialReport, ReportMetadata, Summary, Totals};
use crate::estimator::wizard::WizardAnswers;

/// Builds the report for `wizard` as of `generated_at`.
pub fn analyze(wizard: &Value, generated_at: DateTime<Utc>) -> FinancialReport {
    let answers = WizardAnswers::from_value(wizard);
    let country = Country::resolve(answers.country.as_deref());
    let family = FamilyStatus::resolve(answers.family_status.as_deref());

    let breakdown = CostBreakdown::adjusted(country.base_costs(), family);
    let monthly = breakdown.monthly_total();
    let yearly = breakdown.yearly_total();
    let risk_level = risk::classify(answers.current_savings, yearly);

    FinancialReport {
        costs: Costs {
            totals: Totals {
                monthly,
                yearly,
                tuition_only: breakdown.tuition,
                living_expenses: monthly * 12,
            },
            breakdown,
        },
        summary: Summary {
            monthly_expenses: monthly,
            yearly_total: yearly,
            risk_level,
            risk_score: risk_level.score(),
        },
        basic_recommendations: basic_recommendations(),
        metadata: ReportMetadata {
            generated_at,
            location: format!("{}, {}", answers.city_or_default(), country.display_name()),
        },
    }
}

/// `analyze` stamped with the current time.
pub fn analyze_now(wizard: &Value) -> FinancialReport {
    analyze(wizard, Utc::now())
}
