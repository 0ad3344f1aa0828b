//! Lenient reads from the free-form wizard JSON. Missing steps, missing keys
//! and wrong types all collapse to `None` / defaults.

use serde_json::Value;

pub const DEFAULT_CITY: &str = "Toronto";

/// The handful of wizard answers the estimator consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardAnswers {
    pub country: Option<String>,
    pub family_status: Option<String>,
    pub city: Option<String>,
    pub current_savings: i64,
}

impl WizardAnswers {
    pub fn from_value(wizard: &Value) -> Self {
        WizardAnswers {
            country: step_str(wizard, "step6", "country"),
            family_status: step_str(wizard, "step3", "familyStatus"),
            city: step_str(wizard, "step7", "city"),
            current_savings: wizard
                .get("step5")
                .and_then(|step| step.get("currentSavings"))
                .and_then(parse_whole_amount)
                .unwrap_or(0),
        }
    }

    pub fn city_or_default(&self) -> &str {
        self.city.as_deref().unwrap_or(DEFAULT_CITY)
    }
}

fn step_str(wizard: &Value, step: &str, key: &str) -> Option<String> {
    wizard
        .get(step)?
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts numbers or numeric strings, truncating toward zero.
fn parse_whole_amount(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_all_fields() {
        let answers = WizardAnswers::from_value(&json!({
            "step3": {"familyStatus": "couple"},
            "step5": {"currentSavings": 12000},
            "step6": {"country": "usa"},
            "step7": {"city": "Boston"}
        }));
        assert_eq!(answers.country.as_deref(), Some("usa"));
        assert_eq!(answers.family_status.as_deref(), Some("couple"));
        assert_eq!(answers.city_or_default(), "Boston");
        assert_eq!(answers.current_savings, 12_000);
    }

    #[test]
    fn test_missing_steps_default() {
        let answers = WizardAnswers::from_value(&json!({}));
        assert_eq!(answers, WizardAnswers::default());
        assert_eq!(answers.city_or_default(), "Toronto");
    }

    #[test]
    fn test_wrong_shapes_tolerated() {
        let answers = WizardAnswers::from_value(&json!({
            "step5": "lots",
            "step6": {"country": 42},
            "step7": {"city": "   "}
        }));
        assert_eq!(answers, WizardAnswers::default());

        let answers = WizardAnswers::from_value(&json!([1, 2, 3]));
        assert_eq!(answers, WizardAnswers::default());
    }

    #[test]
    fn test_savings_parsing() {
        let savings = |v: Value| WizardAnswers::from_value(&json!({"step5": {"currentSavings": v}}))
            .current_savings;
        assert_eq!(savings(json!("15000")), 15_000);
        assert_eq!(savings(json!(" 2500.75 ")), 2_500);
        assert_eq!(savings(json!(999.9)), 999);
        assert_eq!(savings(json!("n/a")), 0);
        assert_eq!(savings(json!(null)), 0);
    }
}
