use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use equity_model_core::config::EngineConfig;
use equity_model_core::pricing::PlanId;
use equity_model_core::revenue::calculator::{self, RevenueInput};

use super::MixArgs;
use crate::input;

/// Arguments for monthly and annual revenue
#[derive(Args)]
pub struct RevenueArgs {
    /// Number of paying customers
    #[arg(long)]
    pub customers: Option<u64>,

    /// Billable agents per customer
    #[arg(long, default_value = "1.8")]
    pub agents_per_customer: Decimal,

    /// Overage minutes per agent per month
    #[arg(long, default_value = "300")]
    pub extra_minutes: Decimal,

    /// Plan used when no mix is given
    #[arg(long, default_value = "premium")]
    pub plan: PlanId,

    #[command(flatten)]
    pub mix: MixArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_revenue(
    args: RevenueArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut revenue_input: RevenueInput =
        if let Some(data) = input::read_input(args.input.as_deref())? {
            data
        } else {
            RevenueInput {
                customer_count: args
                    .customers
                    .ok_or("--customers is required (or provide --input)")?,
                agents_per_customer: args.agents_per_customer,
                extra_minutes_per_agent: args.extra_minutes,
                mix: args.mix.to_mix()?,
                plan: args.plan,
                catalog: None,
            }
        };
    if revenue_input.catalog.is_none() {
        revenue_input.catalog = Some(config.catalog.clone());
    }

    let result = calculator::calculate_revenue(&revenue_input)?;
    Ok(serde_json::to_value(result)?)
}
