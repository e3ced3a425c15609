use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use equity_model_core::cashflow::timeline::{self, CashflowInput};
use equity_model_core::cashflow::TimelineParams;
use equity_model_core::config::EngineConfig;
use equity_model_core::pricing::PlanId;

use super::MixArgs;
use crate::input;

const DEFAULT_TARGETS: &str = "4,8,12,18,25,35,45,60,75,95,120,150";

/// Arguments for the 12-month cashflow projection
#[derive(Args)]
pub struct CashflowArgs {
    /// New customers per month, 12 comma-separated values
    #[arg(long, default_value = DEFAULT_TARGETS)]
    pub targets: String,

    /// Billable agents per customer
    #[arg(long, default_value = "1.8")]
    pub agents_per_customer: Decimal,

    /// Overage minutes per agent per month
    #[arg(long, default_value = "300")]
    pub extra_minutes: Decimal,

    /// Plan every customer is on when no mix is given
    #[arg(long, default_value = "premium")]
    pub plan: PlanId,

    #[command(flatten)]
    pub mix: MixArgs,

    /// First day of month 1 (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn parse_targets(s: &str) -> Result<Vec<u64>, Box<dyn std::error::Error>> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u64>()
                .map_err(|e| -> Box<dyn std::error::Error> {
                    format!("Invalid monthly target '{}': {}", t.trim(), e).into()
                })
        })
        .collect()
}

fn input_from_flags(
    args: &CashflowArgs,
    config: &EngineConfig,
) -> Result<CashflowInput, Box<dyn std::error::Error>> {
    Ok(CashflowInput {
        params: TimelineParams {
            monthly_targets: parse_targets(&args.targets)?,
            agents_per_customer: args.agents_per_customer,
            extra_minutes_per_agent: args.extra_minutes,
            mix: args.mix.to_mix()?,
            plan: args.plan,
            operating_cost: config.operating_cost.clone(),
            salary: config.salary.clone(),
            start_date: args.start_date,
        },
        catalog: Some(config.catalog.clone()),
    })
}

pub fn run_cashflow(
    args: CashflowArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut cashflow_input: CashflowInput =
        match input::read_input(args.input.as_deref())? {
            Some(data) => data,
            None => input_from_flags(&args, config)?,
        };
    if cashflow_input.catalog.is_none() {
        cashflow_input.catalog = Some(config.catalog.clone());
    }

    let result = timeline::project_cashflow(&cashflow_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_targets() {
        let targets = parse_targets(DEFAULT_TARGETS).unwrap();
        assert_eq!(targets.len(), 12);
        assert_eq!(targets.iter().sum::<u64>(), 647);
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(parse_targets("4,-8").is_err());
    }

    #[derive(clap::Parser)]
    struct Harness {
        #[command(flatten)]
        args: CashflowArgs,
    }

    fn month_twelve_revenue(argv: &[&str]) -> Value {
        use clap::Parser;
        let mut full = vec!["cashflow"];
        full.extend_from_slice(argv);
        let harness = Harness::try_parse_from(full).unwrap();
        let input = input_from_flags(&harness.args, &EngineConfig::default()).unwrap();
        let out = serde_json::to_value(timeline::project_cashflow(&input).unwrap()).unwrap();
        out["result"]["months"][11]["monthly_revenue"].clone()
    }

    #[test]
    fn test_plan_applies_without_mix() {
        let base = month_twelve_revenue(&["--plan", "base"]);
        let corporate = month_twelve_revenue(&["--plan", "corporate"]);
        assert_ne!(base, corporate);
    }

    #[test]
    fn test_mix_overrides_plan() {
        let mix = ["--base-pct", "30", "--premium-pct", "60", "--corporate-pct", "10"];
        let mut with_base = vec!["--plan", "base"];
        with_base.extend_from_slice(&mix);
        let mut with_corporate = vec!["--plan", "corporate"];
        with_corporate.extend_from_slice(&mix);
        assert_eq!(
            month_twelve_revenue(&with_base),
            month_twelve_revenue(&with_corporate)
        );
    }
}
