use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use equity_model_core::config::EngineConfig;
use equity_model_core::pricing::PlanId;
use equity_model_core::scenarios::{self, SweepRange, ValuationSweepInput};
use equity_model_core::valuation::growth::ValuationInput;

use super::MixArgs;
use crate::input;

/// Arguments for the customers x investment valuation grid
#[derive(Args)]
pub struct SensitivityArgs {
    /// Customer axis as min:max:step (e.g. "0:1000:100")
    #[arg(long, default_value = "0:1000:100")]
    pub customers: String,

    /// Investment axis as min:max:step (e.g. "500000:2000000:250000")
    #[arg(long, default_value = "500000:2000000:250000")]
    pub investment: String,

    /// Base-case customer count, marked in the output
    #[arg(long, default_value = "400")]
    pub base_customers: u64,

    /// Base-case investment amount, marked in the output
    #[arg(long, default_value = "1000000")]
    pub base_investment: Decimal,

    /// Equity offered, as a percentage
    #[arg(long, default_value = "10")]
    pub equity_pct: Decimal,

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

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn parse_range(name: &str, raw: &str) -> Result<SweepRange, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("--{} must be min:max:step, got '{}'", name, raw).into());
    }
    Ok(SweepRange {
        min: parts[0].trim().parse()?,
        max: parts[1].trim().parse()?,
        step: parts[2].trim().parse()?,
    })
}

pub fn run_sensitivity(
    args: SensitivityArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sweep_input: ValuationSweepInput =
        if let Some(data) = input::read_input(args.input.as_deref())? {
            data
        } else {
            ValuationSweepInput {
                base: ValuationInput {
                    investment_amount: args.base_investment,
                    equity_percent_offered: args.equity_pct,
                    customer_count: args.base_customers,
                    agents_per_customer: args.agents_per_customer,
                    extra_minutes_per_agent: args.extra_minutes,
                    mix: args.mix.to_mix()?,
                    plan: args.plan,
                    total_authorized_shares: None,
                    config: config.valuation.clone(),
                    catalog: None,
                },
                customers: parse_range("customers", &args.customers)?,
                investment: parse_range("investment", &args.investment)?,
            }
        };
    if sweep_input.base.catalog.is_none() {
        sweep_input.base.catalog = Some(config.catalog.clone());
    }

    let result = scenarios::sweep_valuation(&sweep_input)?;
    Ok(serde_json::to_value(result)?)
}
