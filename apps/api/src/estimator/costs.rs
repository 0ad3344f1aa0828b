//! Base cost table and household adjustment.

use serde::{Deserialize, Serialize};

/// Destination countries with a cost profile. Unknown inputs resolve to `DEFAULT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Canada,
    Usa,
}

impl Country {
    pub const DEFAULT: Country = Country::Canada;

    /// Case-insensitive lookup; anything unrecognised falls back to `DEFAULT`.
    pub fn resolve(raw: Option<&str>) -> Country {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("canada") => Country::Canada,
            Some("usa") => Country::Usa,
            _ => Country::DEFAULT,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Country::Canada => "Canada",
            Country::Usa => "USA",
        }
    }

    pub fn base_costs(&self) -> BaseCosts {
        match self {
            Country::Canada => BaseCosts {
                tuition: 25_000,
                housing: 1_200,
                food: 450,
                transport: 120,
                insurance: 100,
                misc: 350,
            },
            Country::Usa => BaseCosts {
                tuition: 35_000,
                housing: 1_800,
                food: 600,
                transport: 180,
                insurance: 200,
                misc: 450,
            },
        }
    }
}

/// Yearly tuition plus monthly living costs for a single adult, in whole dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseCosts {
    pub tuition: i64,
    pub housing: i64,
    pub food: i64,
    pub transport: i64,
    pub insurance: i64,
    pub misc: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyStatus {
    Single,
    Couple,
    Family,
}

impl FamilyStatus {
    pub fn resolve(raw: Option<&str>) -> FamilyStatus {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("couple") => FamilyStatus::Couple,
            Some("family") => FamilyStatus::Family,
            _ => FamilyStatus::Single,
        }
    }

    /// Household multiplier in tenths (1.0, 1.7, 2.3), kept integral so
    /// `180 × 2.3` floors to 414 rather than 413.
    pub fn multiplier_tenths(&self) -> i64 {
        match self {
            FamilyStatus::Single => 10,
            FamilyStatus::Couple => 17,
            FamilyStatus::Family => 23,
        }
    }

    pub fn apply(&self, amount: i64) -> i64 {
        (amount * self.multiplier_tenths()).div_euclid(10)
    }
}

/// Adjusted per-category amounts as they appear in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub tuition: i64,
    pub housing: i64,
    pub food: i64,
    pub transport: i64,
    pub insurance: i64,
    pub miscellaneous: i64,
}

impl CostBreakdown {
    /// Tuition is never scaled by household size.
    pub fn adjusted(base: BaseCosts, family: FamilyStatus) -> Self {
        CostBreakdown {
            tuition: base.tuition,
            housing: family.apply(base.housing),
            food: family.apply(base.food),
            transport: family.apply(base.transport),
            insurance: family.apply(base.insurance),
            miscellaneous: family.apply(base.misc),
        }
    }

    pub fn monthly_total(&self) -> i64 {
        self.housing + self.food + self.transport + self.insurance + self.miscellaneous
    }

    pub fn yearly_total(&self) -> i64 {
        self.tuition + self.monthly_total() * 12
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_country_falls_back_to_canada() {
        assert_eq!(Country::resolve(Some("mexico")), Country::Canada);
        assert_eq!(Country::resolve(None), Country::Canada);
        assert_eq!(Country::resolve(Some(" USA ")), Country::Usa);
        assert_eq!(
            Country::resolve(Some("atlantis")).base_costs(),
            Country::Canada.base_costs()
        );
    }

    #[test]
    fn test_family_multipliers() {
        let cases = [
            (Some("single"), 10),
            (Some("couple"), 17),
            (Some("family"), 23),
            (Some("roommates"), 10),
            (None, 10),
        ];
        for (raw, expected) in cases {
            assert_eq!(FamilyStatus::resolve(raw).multiplier_tenths(), expected, "{raw:?}");
        }
    }

    #[test]
    fn test_multiplier_floors_exactly() {
        // Float math would give 413.99999999999994 here.
        assert_eq!(FamilyStatus::Family.apply(180), 414);
        assert_eq!(FamilyStatus::Family.apply(200), 460);
        assert_eq!(FamilyStatus::Couple.apply(350), 595);
        assert_eq!(FamilyStatus::Couple.apply(125), 212);
    }

    #[test]
    fn test_tuition_not_scaled() {
        let breakdown = CostBreakdown::adjusted(Country::Usa.base_costs(), FamilyStatus::Family);
        assert_eq!(breakdown.tuition, 35_000);
    }

    #[test]
    fn test_every_living_category_scaled_identically() {
        let base = Country::Canada.base_costs();
        let breakdown = CostBreakdown::adjusted(base, FamilyStatus::Couple);
        assert_eq!(breakdown.housing, base.housing * 17 / 10);
        assert_eq!(breakdown.food, base.food * 17 / 10);
        assert_eq!(breakdown.transport, base.transport * 17 / 10);
        assert_eq!(breakdown.insurance, base.insurance * 17 / 10);
        assert_eq!(breakdown.miscellaneous, base.misc * 17 / 10);
    }

    #[test]
    fn test_yearly_total_identity() {
        for country in [Country::Canada, Country::Usa] {
            for family in [FamilyStatus::Single, FamilyStatus::Couple, FamilyStatus::Family] {
                let b = CostBreakdown::adjusted(country.base_costs(), family);
                assert_eq!(b.yearly_total(), b.tuition + 12 * b.monthly_total());
            }
        }
    }
}
