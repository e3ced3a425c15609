use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EquityModelError;
use crate::types::Money;
use crate::EquityModelResult;

// ─── Plan identifiers ────────────────────────────────────────────────────────

/// Subscription plan identifier.
///
/// Ordering follows the dashboard's slider order (base, premium, corporate),
/// which is also the order in which the mix split assigns rounded segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Base,
    Premium,
    Corporate,
}

impl PlanId {
    pub const ALL: [PlanId; 3] = [PlanId::Base, PlanId::Premium, PlanId::Corporate];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Base => "base",
            PlanId::Premium => "premium",
            PlanId::Corporate => "corporate",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = EquityModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(PlanId::Base),
            "premium" => Ok(PlanId::Premium),
            "corporate" => Ok(PlanId::Corporate),
            _ => Err(EquityModelError::UnknownPlan(s.to_string())),
        }
    }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// A priced subscription plan. Prices are per agent per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub id: PlanId,
    pub name: String,
    pub monthly_price_per_agent: Money,
    pub included_minutes: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// The set of plans on offer plus the plan-agnostic overage rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingCatalog {
    pub plans: Vec<PricingPlan>,
    /// Charged per minute used beyond a plan's included minutes, on every plan.
    pub extra_minute_rate: Money,
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PricingCatalog {
    /// The published price list: 114 / 163 / 327 per agent per month and
    /// 0.55 per extra minute.
    pub fn standard() -> Self {
        PricingCatalog {
            plans: vec![
                PricingPlan {
                    id: PlanId::Base,
                    name: "Base".into(),
                    monthly_price_per_agent: dec!(114),
                    included_minutes: 180,
                    description: "For individuals getting started".into(),
                },
                PricingPlan {
                    id: PlanId::Premium,
                    name: "Premium".into(),
                    monthly_price_per_agent: dec!(163),
                    included_minutes: 180,
                    description: "For startups and growing teams".into(),
                },
                PricingPlan {
                    id: PlanId::Corporate,
                    name: "Corporate".into(),
                    monthly_price_per_agent: dec!(327),
                    included_minutes: 300,
                    description: "For enterprises and large teams".into(),
                },
            ],
            extra_minute_rate: dec!(0.55),
        }
    }

    /// Look up a plan by identifier.
    pub fn get_plan(&self, id: PlanId) -> EquityModelResult<&PricingPlan> {
        self.plans
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| EquityModelError::UnknownPlan(id.to_string()))
    }

    /// Look up a plan by its textual identifier (`"base"`, `"premium"`, `"corporate"`).
    pub fn plan_by_name(&self, name: &str) -> EquityModelResult<&PricingPlan> {
        let id: PlanId = name.parse()?;
        self.get_plan(id)
    }

    /// Monthly per-agent price for a plan.
    pub fn price_of(&self, id: PlanId) -> EquityModelResult<Money> {
        Ok(self.get_plan(id)?.monthly_price_per_agent)
    }

    /// Reject catalogs the revenue model cannot price.
    pub fn validate(&self) -> EquityModelResult<()> {
        for id in PlanId::ALL {
            let matches = self.plans.iter().filter(|p| p.id == id).count();
            if matches == 0 {
                return Err(EquityModelError::Configuration(format!(
                    "pricing catalog has no '{id}' plan"
                )));
            }
            if matches > 1 {
                return Err(EquityModelError::Configuration(format!(
                    "pricing catalog defines '{id}' {matches} times"
                )));
            }
        }
        for plan in &self.plans {
            if plan.monthly_price_per_agent <= Decimal::ZERO {
                return Err(EquityModelError::invalid(
                    format!("plans.{}.monthly_price_per_agent", plan.id),
                    "Plan price must be positive",
                ));
            }
        }
        if self.extra_minute_rate < Decimal::ZERO {
            return Err(EquityModelError::invalid(
                "extra_minute_rate",
                "Extra minute rate cannot be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_prices() {
        let catalog = PricingCatalog::standard();
        assert_eq!(catalog.price_of(PlanId::Base).unwrap(), dec!(114));
        assert_eq!(catalog.price_of(PlanId::Premium).unwrap(), dec!(163));
        assert_eq!(catalog.price_of(PlanId::Corporate).unwrap(), dec!(327));
        assert_eq!(catalog.extra_minute_rate, dec!(0.55));
        assert_eq!(catalog.get_plan(PlanId::Corporate).unwrap().included_minutes, 300);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_plan_by_name_is_case_insensitive() {
        let catalog = PricingCatalog::standard();
        assert_eq!(catalog.plan_by_name("Premium").unwrap().id, PlanId::Premium);
    }

    #[test]
    fn test_unknown_plan_name() {
        let catalog = PricingCatalog::standard();
        match catalog.plan_by_name("enterprise") {
            Err(EquityModelError::UnknownPlan(name)) => assert_eq!(name, "enterprise"),
            other => panic!("expected UnknownPlan, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_plan_is_unknown() {
        let mut catalog = PricingCatalog::standard();
        catalog.plans.retain(|p| p.id != PlanId::Corporate);
        assert!(matches!(
            catalog.get_plan(PlanId::Corporate),
            Err(EquityModelError::UnknownPlan(_))
        ));
        assert!(matches!(
            catalog.validate(),
            Err(EquityModelError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut catalog = PricingCatalog::standard();
        catalog.plans[0].monthly_price_per_agent = Decimal::ZERO;
        assert!(matches!(
            catalog.validate(),
            Err(EquityModelError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_plan_id_serde_lowercase() {
        let json = serde_json::to_string(&PlanId::Corporate).unwrap();
        assert_eq!(json, "\"corporate\"");
        let back: PlanId = serde_json::from_str("\"base\"").unwrap();
        assert_eq!(back, PlanId::Base);
    }
}
