//! One full recomputation of the model for the current parameter state.
//!
//! A front-end calls this on every parameter change and renders the result;
//! nothing is cached between calls.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cashflow::{compute_timeline, CashflowTimeline, TimelineParams};
use crate::config::EngineConfig;
use crate::equity::{resolve_distribution, EquityDistribution};
use crate::milestones::{stage_index_for, standard_milestones, InvestorPool, MilestoneStage};
use crate::pricing::{PlanId, SubscriptionMix};
use crate::revenue::calculator::{compute_revenue, default_plan, mix_warnings};
use crate::revenue::RevenueMetrics;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::valuation::{value_company, ValuationBreakdown};
use crate::EquityModelResult;

fn default_targets() -> Vec<u64> {
    vec![4, 8, 12, 18, 25, 35, 45, 60, 75, 95, 120, 150]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInput {
    pub customer_count: u64,
    pub agents_per_customer: Decimal,
    pub extra_minutes_per_agent: Decimal,
    #[serde(default)]
    pub mix: SubscriptionMix,
    /// Plan used wherever revenue is priced without the mix.
    #[serde(default = "default_plan")]
    pub selected_plan: PlanId,
    pub investment_amount: Money,
    pub equity_percent_offered: Percent,
    #[serde(default = "default_targets")]
    pub monthly_targets: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Price the valuation's revenue on the mix instead of `selected_plan`.
    #[serde(default)]
    pub valuation_uses_mix: bool,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub revenue: RevenueMetrics,
    pub valuation: ValuationBreakdown,
    pub timeline: CashflowTimeline,
    pub equity: EquityDistribution,
    pub milestone_index: usize,
    pub milestone: MilestoneStage,
    pub investor_pool_allocated: u64,
}

/// Recompute revenue, valuation, cashflow timeline and equity for one state.
pub fn build_snapshot(
    input: &SnapshotInput,
) -> EquityModelResult<ComputationOutput<DashboardSnapshot>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let config = &input.config;
    config.validate()?;

    let revenue = compute_revenue(
        &config.catalog,
        input.customer_count,
        input.agents_per_customer,
        input.extra_minutes_per_agent,
        Some(&input.mix),
        input.selected_plan,
    )?;
    warnings.extend(mix_warnings(Some(&input.mix), &revenue));

    let stages = standard_milestones();
    let milestone_index = stage_index_for(&stages, input.customer_count)?;
    let milestone = stages[milestone_index].clone();

    let valuation_revenue = if input.valuation_uses_mix {
        revenue.clone()
    } else {
        compute_revenue(
            &config.catalog,
            input.customer_count,
            input.agents_per_customer,
            input.extra_minutes_per_agent,
            None,
            input.selected_plan,
        )?
    };
    let valuation = value_company(
        input.investment_amount,
        input.equity_percent_offered,
        input.customer_count,
        &valuation_revenue,
        &config.valuation,
        Some(milestone.shares.total_authorized),
    )?;

    let timeline = compute_timeline(
        &config.catalog,
        &TimelineParams {
            monthly_targets: input.monthly_targets.clone(),
            agents_per_customer: input.agents_per_customer,
            extra_minutes_per_agent: input.extra_minutes_per_agent,
            mix: Some(input.mix),
            plan: input.selected_plan,
            operating_cost: config.operating_cost.clone(),
            salary: config.salary.clone(),
            start_date: input.start_date,
        },
    )?;
    if timeline.first_salary_affordable_month.is_none() {
        warnings.push("Salaries not affordable within 12 months".into());
    }

    let equity = resolve_distribution(&config.equity_table, input.customer_count)?;
    if equity.total_percentage != Decimal::ONE_HUNDRED {
        warnings.push(format!(
            "Ownership percentages sum to {}% after rounding",
            equity.total_percentage
        ));
    }

    let investor_pool_allocated = InvestorPool::default().allocated_at(milestone_index);

    let snapshot = DashboardSnapshot {
        revenue,
        valuation,
        timeline,
        equity,
        milestone_index,
        milestone,
        investor_pool_allocated,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Full model recomputation: blended revenue, growth valuation, 12-month cashflow, milestone equity",
        &serde_json::json!({
            "customer_count": input.customer_count,
            "selected_plan": input.selected_plan,
            "valuation_uses_mix": input.valuation_uses_mix,
            "operating_cost": config.operating_cost,
        }),
        warnings,
        elapsed,
        snapshot,
    ))
}
