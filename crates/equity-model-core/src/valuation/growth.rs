//! Growth-stage company valuation.
//!
//! Blends two independent views of value:
//! - **Investment-implied value**: the post-money valuation implied by an
//!   offer of `investment` for `equity%` of the company.
//! - **Growth premium**: annual revenue times a multiple that starts at a
//!   SaaS base multiple and rises with the customer count until it saturates.
//!
//! This is a heuristic, not a DCF. The two terms are simply added.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EquityModelError;
use crate::pricing::{PlanId, PricingCatalog, SubscriptionMix};
use crate::revenue::calculator::{compute_revenue, default_plan, mix_warnings};
use crate::revenue::RevenueMetrics;
use crate::types::{checked, div_floor_one, with_metadata, ComputationOutput, Money, Multiple, Percent};
use crate::EquityModelResult;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Parameters of the revenue-multiple ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Multiple applied to annual revenue regardless of scale.
    pub base_multiple: Multiple,
    /// Extra multiple earned per `customers_per_step` customers.
    pub multiplier_step: Multiple,
    pub customers_per_step: Decimal,
    /// Ceiling on the extra multiple.
    pub cap_multiple: Multiple,
}

impl Default for ValuationConfig {
    /// 5x base, +0.5x per 100 customers, extra capped at 5x (10x total from 1,000 customers).
    fn default() -> Self {
        ValuationConfig {
            base_multiple: dec!(5),
            multiplier_step: dec!(0.5),
            customers_per_step: dec!(100),
            cap_multiple: dec!(5),
        }
    }
}

impl ValuationConfig {
    pub fn validate(&self) -> EquityModelResult<()> {
        if self.base_multiple < Decimal::ZERO {
            return Err(EquityModelError::invalid(
                "valuation.base_multiple",
                "Base multiple cannot be negative",
            ));
        }
        if self.multiplier_step < Decimal::ZERO {
            return Err(EquityModelError::invalid(
                "valuation.multiplier_step",
                "Multiplier step cannot be negative",
            ));
        }
        if self.customers_per_step <= Decimal::ZERO {
            return Err(EquityModelError::invalid(
                "valuation.customers_per_step",
                "Customers per step must be positive",
            ));
        }
        if self.cap_multiple < Decimal::ZERO {
            return Err(EquityModelError::invalid(
                "valuation.cap_multiple",
                "Cap multiple cannot be negative",
            ));
        }
        Ok(())
    }

    /// Extra multiple earned at `customer_count`, saturating at `cap_multiple`.
    /// A product too large for `Decimal` is past any cap, so it yields the cap.
    pub fn additional_multiple(&self, customer_count: u64) -> Multiple {
        Decimal::from(customer_count)
            .checked_div(self.customers_per_step)
            .and_then(|steps| steps.checked_mul(self.multiplier_step))
            .map_or(self.cap_multiple, |earned| earned.min(self.cap_multiple))
    }

    pub fn total_multiple(&self, customer_count: u64) -> EquityModelResult<Multiple> {
        checked(
            self.base_multiple
                .checked_add(self.additional_multiple(customer_count)),
            "valuation.base_multiple",
        )
    }
}

// ─── Structs ─────────────────────────────────────────────────────────────────

/// Components of a valuation and the per-unit figures derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationBreakdown {
    pub investment_implied_value: Money,
    pub additional_multiple: Multiple,
    pub total_multiple: Multiple,
    pub growth_premium: Money,
    pub valuation: Money,
    /// valuation / max(annual revenue, 1)
    pub revenue_multiple: Multiple,
    /// Zero when there are no customers.
    pub value_per_customer: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_per_share: Option<Money>,
}

/// Input for a self-contained valuation: revenue drivers plus deal terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationInput {
    pub investment_amount: Money,
    pub equity_percent_offered: Percent,
    pub customer_count: u64,
    pub agents_per_customer: Decimal,
    pub extra_minutes_per_agent: Decimal,
    /// Revenue split. When absent, revenue is priced on `plan` alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mix: Option<SubscriptionMix>,
    #[serde(default = "default_plan")]
    pub plan: PlanId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_authorized_shares: Option<u64>,
    #[serde(default)]
    pub config: ValuationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PricingCatalog>,
}

/// Valuation plus the revenue it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationOutput {
    pub valuation: ValuationBreakdown,
    pub revenue: RevenueMetrics,
}

// ─── Functions ───────────────────────────────────────────────────────────────

fn validate_terms(investment_amount: Money, equity_percent_offered: Percent) -> EquityModelResult<()> {
    if investment_amount < Decimal::ZERO {
        return Err(EquityModelError::invalid(
            "investment_amount",
            "Investment amount cannot be negative",
        ));
    }
    if equity_percent_offered < Decimal::ZERO || equity_percent_offered > dec!(100) {
        return Err(EquityModelError::invalid(
            "equity_percent_offered",
            format!("Equity offered must be in [0, 100], got {equity_percent_offered}"),
        ));
    }
    Ok(())
}

/// Post-money value implied by the deal terms; zero when either term is zero.
///
/// A tiny stake against a large cheque can exceed `Decimal`'s range, which is
/// reported as `InvalidArgument`.
pub fn investment_implied_value(
    investment_amount: Money,
    equity_percent_offered: Percent,
) -> EquityModelResult<Money> {
    if investment_amount > Decimal::ZERO && equity_percent_offered > Decimal::ZERO {
        checked(
            investment_amount.checked_div(equity_percent_offered / dec!(100)),
            "equity_percent_offered",
        )
    } else {
        Ok(Decimal::ZERO)
    }
}

/// Value the company and derive per-unit metrics.
pub fn value_company(
    investment_amount: Money,
    equity_percent_offered: Percent,
    customer_count: u64,
    revenue: &RevenueMetrics,
    config: &ValuationConfig,
    total_authorized_shares: Option<u64>,
) -> EquityModelResult<ValuationBreakdown> {
    validate_terms(investment_amount, equity_percent_offered)?;
    config.validate()?;

    let implied = investment_implied_value(investment_amount, equity_percent_offered)?;
    let additional_multiple = config.additional_multiple(customer_count);
    let total_multiple = config.total_multiple(customer_count)?;
    let growth_premium = checked(
        revenue.annual_revenue.checked_mul(total_multiple),
        "customer_count",
    )?;
    let valuation = checked(implied.checked_add(growth_premium), "investment_amount")?;

    let value_per_customer = if customer_count > 0 {
        valuation / Decimal::from(customer_count)
    } else {
        Decimal::ZERO
    };

    tracing::debug!(
        customer_count,
        %implied,
        %total_multiple,
        %valuation,
        "valued company"
    );

    Ok(ValuationBreakdown {
        investment_implied_value: implied,
        additional_multiple,
        total_multiple,
        growth_premium,
        valuation,
        revenue_multiple: div_floor_one(valuation, revenue.annual_revenue),
        value_per_customer,
        value_per_share: total_authorized_shares
            .map(|shares| div_floor_one(valuation, Decimal::from(shares))),
    })
}

/// Investment-implied value plus growth premium, as a single figure.
pub fn compute_valuation(
    investment_amount: Money,
    equity_percent_offered: Percent,
    customer_count: u64,
    revenue: &RevenueMetrics,
    config: &ValuationConfig,
) -> EquityModelResult<Money> {
    value_company(
        investment_amount,
        equity_percent_offered,
        customer_count,
        revenue,
        config,
        None,
    )
    .map(|b| b.valuation)
}

/// Compute revenue from the input's drivers, then value the company.
pub fn calculate_valuation(
    input: &ValuationInput,
) -> EquityModelResult<ComputationOutput<ValuationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let standard;
    let catalog = match &input.catalog {
        Some(c) => {
            c.validate()?;
            c
        }
        None => {
            standard = PricingCatalog::standard();
            &standard
        }
    };

    let revenue = compute_revenue(
        catalog,
        input.customer_count,
        input.agents_per_customer,
        input.extra_minutes_per_agent,
        input.mix.as_ref(),
        input.plan,
    )?;
    warnings.extend(mix_warnings(input.mix.as_ref(), &revenue));

    let valuation = value_company(
        input.investment_amount,
        input.equity_percent_offered,
        input.customer_count,
        &revenue,
        &input.config,
        input.total_authorized_shares,
    )?;

    if input.investment_amount > Decimal::ZERO && input.equity_percent_offered.is_zero() {
        warnings.push(
            "Investment offered for 0% equity implies no value; investment-implied term is zero"
                .into(),
        );
    }
    if input.customer_count > 0
        && valuation.additional_multiple >= input.config.cap_multiple
    {
        warnings.push(format!(
            "Customer multiple saturated at {}x",
            valuation.total_multiple
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Investment-implied post-money value plus revenue-multiple growth premium",
        &serde_json::json!({
            "base_multiple": input.config.base_multiple.to_string(),
            "multiplier_step": input.config.multiplier_step.to_string(),
            "customers_per_step": input.config.customers_per_step.to_string(),
            "cap_multiple": input.config.cap_multiple.to_string(),
            "plan": input.plan,
            "mix": input.mix,
        }),
        warnings,
        elapsed,
        ValuationOutput { valuation, revenue },
    ))
}
