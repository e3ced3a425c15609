use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use equity_model_core::config::EngineConfig;
use equity_model_core::pricing::PlanId;
use equity_model_core::valuation::growth::{self, ValuationInput};

use super::MixArgs;
use crate::input;

/// Arguments for the growth-adjusted company valuation
#[derive(Args)]
pub struct ValuationArgs {
    /// Investment amount offered
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Equity offered for the investment, as a percentage (10 = 10%)
    #[arg(long)]
    pub equity_pct: Option<Decimal>,

    /// Number of paying customers
    #[arg(long)]
    pub customers: Option<u64>,

    /// Billable agents per customer
    #[arg(long, default_value = "1.8")]
    pub agents_per_customer: Decimal,

    /// Overage minutes per agent per month
    #[arg(long, default_value = "300")]
    pub extra_minutes: Decimal,

    /// Plan revenue is priced on when no mix is given
    #[arg(long, default_value = "premium")]
    pub plan: PlanId,

    #[command(flatten)]
    pub mix: MixArgs,

    /// Authorised share count, for a per-share value
    #[arg(long)]
    pub authorized_shares: Option<u64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_valuation(
    args: ValuationArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut valuation_input: ValuationInput =
        if let Some(data) = input::read_input(args.input.as_deref())? {
            data
        } else {
            ValuationInput {
                investment_amount: args
                    .investment
                    .ok_or("--investment is required (or provide --input)")?,
                equity_percent_offered: args
                    .equity_pct
                    .ok_or("--equity-pct is required (or provide --input)")?,
                customer_count: args
                    .customers
                    .ok_or("--customers is required (or provide --input)")?,
                agents_per_customer: args.agents_per_customer,
                extra_minutes_per_agent: args.extra_minutes,
                mix: args.mix.to_mix()?,
                plan: args.plan,
                total_authorized_shares: args.authorized_shares,
                config: config.valuation.clone(),
                catalog: None,
            }
        };
    if valuation_input.catalog.is_none() {
        valuation_input.catalog = Some(config.catalog.clone());
    }

    let result = growth::calculate_valuation(&valuation_input)?;
    Ok(serde_json::to_value(result)?)
}
