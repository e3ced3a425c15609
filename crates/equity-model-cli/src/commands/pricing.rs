use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use equity_model_core::config::EngineConfig;
use equity_model_core::pricing::{PlanId, SubscriptionMix};

use super::MixArgs;

/// Arguments for moving one plan's share of the subscription mix
#[derive(Args)]
pub struct RebalanceArgs {
    /// Plan whose percentage is being set: base, premium or corporate
    #[arg(long)]
    pub plan: PlanId,

    /// New percentage for that plan (0-100)
    #[arg(long)]
    pub percent: Decimal,

    /// Current mix; the 30/60/10 default when omitted
    #[command(flatten)]
    pub mix: MixArgs,
}

pub fn run_plans(config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = &config.catalog;
    let plans: Vec<Value> = catalog
        .plans
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "name": p.name,
                "monthly_price_per_agent": p.monthly_price_per_agent,
                "included_minutes": p.included_minutes,
                "extra_minute_rate": catalog.extra_minute_rate,
                "description": p.description,
            })
        })
        .collect();
    Ok(Value::Array(plans))
}

pub fn run_rebalance_mix(args: RebalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let current = args.mix.to_mix()?.unwrap_or_default();
    let rebalanced: SubscriptionMix = current.rebalance(args.plan, args.percent)?;
    Ok(serde_json::json!({
        "result": rebalanced,
        "warnings": if rebalanced.is_balanced() {
            Vec::<String>::new()
        } else {
            vec![format!(
                "Rounded mix totals {}%, not 100%",
                rebalanced.total()
            )]
        },
    }))
}
