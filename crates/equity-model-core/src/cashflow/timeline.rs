//! Twelve-month cashflow and founder-salary affordability projection.
//!
//! Each month adds that month's acquisition target to the running customer
//! base, prices the whole base from scratch, deducts operating costs and
//! then pays the combined founder salary only if the month's profit covers
//! it in full. Unpaid salary is deferred, never partially drawn.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EquityModelError;
use crate::pricing::{PlanId, PricingCatalog, SubscriptionMix};
use crate::revenue::calculator::{compute_revenue, default_plan, mix_warnings};
use crate::types::{checked, with_metadata, ComputationOutput, Money, Rate};
use crate::EquityModelResult;

/// Length of the projection window.
pub const TIMELINE_MONTHS: usize = 12;

// ─── Policies ────────────────────────────────────────────────────────────────

/// How monthly operating costs (everything except founder salaries) are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum OperatingCostPolicy {
    /// A flat amount every month.
    Fixed { monthly_amount: Money },
    /// A share of that month's revenue (0.25 = 25%).
    RevenueRatio { ratio: Rate },
}

impl Default for OperatingCostPolicy {
    fn default() -> Self {
        OperatingCostPolicy::Fixed {
            monthly_amount: dec!(5000),
        }
    }
}

impl OperatingCostPolicy {
    pub fn validate(&self) -> EquityModelResult<()> {
        match self {
            OperatingCostPolicy::Fixed { monthly_amount } if *monthly_amount < Decimal::ZERO => {
                Err(EquityModelError::invalid(
                    "operating_cost.monthly_amount",
                    "Operating cost cannot be negative",
                ))
            }
            OperatingCostPolicy::RevenueRatio { ratio } if *ratio < Decimal::ZERO => {
                Err(EquityModelError::invalid(
                    "operating_cost.ratio",
                    "Operating cost ratio cannot be negative",
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn cost_for(&self, monthly_revenue: Money) -> EquityModelResult<Money> {
        match self {
            OperatingCostPolicy::Fixed { monthly_amount } => Ok(*monthly_amount),
            OperatingCostPolicy::RevenueRatio { ratio } => {
                checked(monthly_revenue.checked_mul(*ratio), "operating_cost.ratio")
            }
        }
    }
}

/// Founder pay the business must cover before it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryPolicy {
    pub founders: u32,
    pub annual_salary_per_founder: Money,
}

impl Default for SalaryPolicy {
    /// Two founders at 70,000 a year each.
    fn default() -> Self {
        SalaryPolicy {
            founders: 2,
            annual_salary_per_founder: dec!(70000),
        }
    }
}

impl SalaryPolicy {
    pub fn validate(&self) -> EquityModelResult<()> {
        if self.annual_salary_per_founder < Decimal::ZERO {
            return Err(EquityModelError::invalid(
                "salary.annual_salary_per_founder",
                "Salary cannot be negative",
            ));
        }
        checked(
            self.monthly_per_founder()
                .checked_mul(Decimal::from(self.founders)),
            "salary.founders",
        )?;
        Ok(())
    }

    pub fn monthly_per_founder(&self) -> Money {
        self.annual_salary_per_founder / dec!(12)
    }

    /// Combined monthly salary target for all founders (11,666.67 by default).
    pub fn combined_monthly(&self) -> Money {
        self.monthly_per_founder() * Decimal::from(self.founders)
    }
}

// ─── Structs ─────────────────────────────────────────────────────────────────

/// Drivers for a 12-month projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineParams {
    /// New customers acquired in each of the 12 months.
    pub monthly_targets: Vec<u64>,
    pub agents_per_customer: Decimal,
    pub extra_minutes_per_agent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mix: Option<SubscriptionMix>,
    /// Plan used when no mix is supplied.
    #[serde(default = "default_plan")]
    pub plan: PlanId,
    #[serde(default)]
    pub operating_cost: OperatingCostPolicy,
    #[serde(default)]
    pub salary: SalaryPolicy,
    /// First day of month 1. Labels each month with a `period_start` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// One month of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowMonth {
    /// 1-based month index.
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    pub new_customers: u64,
    pub cumulative_customers: u64,
    pub monthly_revenue: Money,
    pub operating_cost: Money,
    pub profit_before_salaries: Money,
    pub salary_affordable: bool,
    pub salary_paid: Money,
    pub profit_after_salaries: Money,
    pub cumulative_profit: Money,
}

/// The full 12-month projection and its headline figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowTimeline {
    pub months: Vec<CashflowMonth>,
    pub combined_monthly_salary: Money,
    pub first_salary_affordable_month: Option<u32>,
    pub average_monthly_acquisition: Decimal,
    pub total_revenue: Money,
    pub total_salary_paid: Money,
    pub ending_cumulative_profit: Money,
}

/// Projection input with an optional price list override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowInput {
    #[serde(flatten)]
    pub params: TimelineParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PricingCatalog>,
}

// ─── Functions ───────────────────────────────────────────────────────────────

/// First month (1-based) in which the founders could be paid, if any.
pub fn first_affordable_month(months: &[CashflowMonth]) -> Option<u32> {
    months.iter().find(|m| m.salary_affordable).map(|m| m.month)
}

/// Run the 12-month projection.
///
/// Months are strictly sequential: cumulative customers and cumulative profit
/// carry forward, and revenue is recomputed on the cumulative base each month.
pub fn compute_timeline(
    catalog: &PricingCatalog,
    params: &TimelineParams,
) -> EquityModelResult<CashflowTimeline> {
    if params.monthly_targets.len() != TIMELINE_MONTHS {
        return Err(EquityModelError::Configuration(format!(
            "monthly_targets must have exactly {TIMELINE_MONTHS} entries, got {}",
            params.monthly_targets.len()
        )));
    }
    params.operating_cost.validate()?;
    params.salary.validate()?;

    let salary_target = params.salary.combined_monthly();
    let mut months = Vec::with_capacity(TIMELINE_MONTHS);
    let mut cumulative_customers: u64 = 0;
    let mut cumulative_profit = Decimal::ZERO;

    for (i, &new_customers) in params.monthly_targets.iter().enumerate() {
        cumulative_customers = cumulative_customers.checked_add(new_customers).ok_or_else(|| {
            EquityModelError::invalid("monthly_targets", "Cumulative customer count overflows")
        })?;

        let revenue = compute_revenue(
            catalog,
            cumulative_customers,
            params.agents_per_customer,
            params.extra_minutes_per_agent,
            params.mix.as_ref(),
            params.plan,
        )?;
        let monthly_revenue = revenue.total_monthly_revenue;
        let operating_cost = params.operating_cost.cost_for(monthly_revenue)?;
        let profit_before_salaries = checked(
            monthly_revenue.checked_sub(operating_cost),
            "operating_cost",
        )?;

        let salary_affordable = profit_before_salaries >= salary_target;
        let salary_paid = if salary_affordable {
            salary_target
        } else {
            Decimal::ZERO
        };
        let profit_after_salaries = checked(
            profit_before_salaries.checked_sub(salary_paid),
            "salary",
        )?;
        cumulative_profit = checked(
            cumulative_profit.checked_add(profit_after_salaries),
            "monthly_targets",
        )?;

        let period_start = match params.start_date {
            Some(start) => Some(start.checked_add_months(Months::new(i as u32)).ok_or_else(
                || EquityModelError::DateError(format!("{start} + {i} months is out of range")),
            )?),
            None => None,
        };

        months.push(CashflowMonth {
            month: i as u32 + 1,
            period_start,
            new_customers,
            cumulative_customers,
            monthly_revenue,
            operating_cost,
            profit_before_salaries,
            salary_affordable,
            salary_paid,
            profit_after_salaries,
            cumulative_profit,
        });
    }

    let first_salary_affordable_month = first_affordable_month(&months);
    let total_revenue = checked(
        months
            .iter()
            .try_fold(Decimal::ZERO, |acc, m| acc.checked_add(m.monthly_revenue)),
        "monthly_targets",
    )?;
    let total_salary_paid: Money = months.iter().map(|m| m.salary_paid).sum();

    tracing::debug!(
        final_customers = cumulative_customers,
        ?first_salary_affordable_month,
        %cumulative_profit,
        "projected cashflow timeline"
    );

    Ok(CashflowTimeline {
        months,
        combined_monthly_salary: salary_target,
        first_salary_affordable_month,
        average_monthly_acquisition: Decimal::from(cumulative_customers)
            / Decimal::from(TIMELINE_MONTHS as u64),
        total_revenue,
        total_salary_paid,
        ending_cumulative_profit: cumulative_profit,
    })
}

/// Run the projection and wrap it in the standard envelope.
pub fn project_cashflow(
    input: &CashflowInput,
) -> EquityModelResult<ComputationOutput<CashflowTimeline>> {
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

    let timeline = compute_timeline(catalog, &input.params)?;

    if let Some(last) = timeline.months.last() {
        let final_revenue = compute_revenue(
            catalog,
            last.cumulative_customers,
            input.params.agents_per_customer,
            input.params.extra_minutes_per_agent,
            input.params.mix.as_ref(),
            input.params.plan,
        )?;
        warnings.extend(mix_warnings(input.params.mix.as_ref(), &final_revenue));
    }
    if timeline.first_salary_affordable_month.is_none() {
        warnings.push(format!(
            "Salaries not affordable within {TIMELINE_MONTHS} months at {} per month combined",
            timeline.combined_monthly_salary.round_dp(2)
        ));
    }
    if timeline.ending_cumulative_profit < Decimal::ZERO {
        warnings.push(format!(
            "Cumulative profit after {TIMELINE_MONTHS} months is negative ({})",
            timeline.ending_cumulative_profit.round_dp(2)
        ));
    }

    let methodology = match input.params.operating_cost {
        OperatingCostPolicy::Fixed { .. } => {
            "12-month cumulative cashflow with fixed operating costs and binary salary affordability"
        }
        OperatingCostPolicy::RevenueRatio { .. } => {
            "12-month cumulative cashflow with revenue-linked operating costs and binary salary affordability"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "operating_cost": input.params.operating_cost,
            "salary": input.params.salary,
            "plan": input.params.plan,
            "mix": input.params.mix,
        }),
        warnings,
        elapsed,
        timeline,
    ))
}
