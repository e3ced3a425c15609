use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::cashflow::{OperatingCostPolicy, SalaryPolicy};
use crate::equity::EquityTable;
use crate::pricing::PricingCatalog;
use crate::valuation::ValuationConfig;
use crate::EquityModelResult;

/// Every tunable constant of the model in one place.
///
/// Missing sections fall back to the standard dashboard values, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub catalog: PricingCatalog,
    #[serde(default)]
    pub valuation: ValuationConfig,
    #[serde(default)]
    pub salary: SalaryPolicy,
    #[serde(default)]
    pub operating_cost: OperatingCostPolicy,
    #[serde(default)]
    pub equity_table: EquityTable,
}

impl EngineConfig {
    /// Operating costs at 25% of revenue; the dashboard's reserved-pool
    /// register at the investment round.
    pub fn revenue_ratio_variant() -> Self {
        EngineConfig {
            operating_cost: OperatingCostPolicy::RevenueRatio { ratio: dec!(0.25) },
            equity_table: EquityTable::reserved_pool(),
            ..EngineConfig::default()
        }
    }

    pub fn validate(&self) -> EquityModelResult<()> {
        self.catalog.validate()?;
        self.valuation.validate()?;
        self.salary.validate()?;
        self.operating_cost.validate()?;
        self.equity_table.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(s: &str) -> EquityModelResult<Self> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::revenue_ratio_variant().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "operating_cost": { "policy": "revenue_ratio", "ratio": "0.3" } }"#,
        )
        .unwrap();
        assert_eq!(
            config.operating_cost,
            OperatingCostPolicy::RevenueRatio { ratio: dec!(0.3) }
        );
        assert_eq!(config.catalog, PricingCatalog::standard());
        assert_eq!(config.salary, SalaryPolicy::default());
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let err = EngineConfig::from_json_str(
            r#"{ "salary": { "founders": 2, "annual_salary_per_founder": "-1" } }"#,
        );
        assert!(err.is_err());
    }
}
