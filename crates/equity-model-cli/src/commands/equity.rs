use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use equity_model_core::config::EngineConfig;
use equity_model_core::equity::distribution::{self, DistributionInput};
use equity_model_core::leaver::{self, LeaverEvent, LeaverInput};

use crate::input;

/// Arguments for the ownership split at a customer count
#[derive(Args)]
pub struct EquityArgs {
    /// Number of paying customers
    #[arg(long)]
    pub customers: Option<u64>,

    /// Path to JSON input file with a customer count and optional table
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LeaverKind {
    Good,
    Intermediate,
    Bad,
}

impl From<LeaverKind> for LeaverEvent {
    fn from(kind: LeaverKind) -> Self {
        match kind {
            LeaverKind::Good => LeaverEvent::Good,
            LeaverKind::Intermediate => LeaverEvent::Intermediate,
            LeaverKind::Bad => LeaverEvent::Bad,
        }
    }
}

/// Arguments for settling a departing shareholder's stake
#[derive(Args)]
pub struct LeaverArgs {
    /// Leaver classification
    #[arg(long, value_enum)]
    pub event: Option<LeaverKind>,

    /// Shares held at departure
    #[arg(long)]
    pub shares: Option<u64>,

    /// Market value per share
    #[arg(long)]
    pub market_value: Option<Decimal>,

    /// Independently assessed fair value per share
    #[arg(long)]
    pub fair_value: Option<Decimal>,

    /// Nominal (par) value per share
    #[arg(long, default_value = "0.0001")]
    pub nominal_value: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_equity(
    args: EquityArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let distribution_input: DistributionInput =
        if let Some(data) = input::read_input(args.input.as_deref())? {
            data
        } else {
            DistributionInput {
                customer_count: args
                    .customers
                    .ok_or("--customers is required (or provide --input)")?,
                table: config.equity_table.clone(),
            }
        };

    let result = distribution::calculate_distribution(&distribution_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_leaver(args: LeaverArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let leaver_input: LeaverInput = if let Some(data) = input::read_input(args.input.as_deref())? {
        data
    } else {
        LeaverInput {
            event: args
                .event
                .ok_or("--event is required (or provide --input)")?
                .into(),
            shares_held: args
                .shares
                .ok_or("--shares is required (or provide --input)")?,
            market_value_per_share: args
                .market_value
                .ok_or("--market-value is required (or provide --input)")?,
            fair_value_per_share: args.fair_value,
            nominal_value_per_share: args.nominal_value,
        }
    };

    let result = leaver::assess_leaver(&leaver_input)?;
    Ok(serde_json::to_value(result)?)
}
