use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn score(&self) -> u32 {
        match self {
            RiskLevel::High => 25,
            RiskLevel::Medium => 55,
            RiskLevel::Low => 85,
        }
    }
}

/// Classifies savings coverage of the first-year total.
///
/// `savings / yearly < 0.2` → high, `< 0.5` → medium, otherwise low. The
/// ratios are compared by cross-multiplication so the boundaries are exact:
/// a ratio of exactly 0.2 is medium, exactly 0.5 is low.
pub fn classify(savings: i64, yearly_total: i64) -> RiskLevel {
    let savings = i128::from(savings);
    let yearly = i128::from(yearly_total);
    if savings * 5 < yearly {
        RiskLevel::High
    } else if savings * 2 < yearly {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
