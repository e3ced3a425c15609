mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use equity_model_core::config::EngineConfig;

use commands::cashflow::CashflowArgs;
use commands::equity::{EquityArgs, LeaverArgs};
use commands::pricing::RebalanceArgs;
use commands::revenue::RevenueArgs;
use commands::scenarios::SensitivityArgs;
use commands::snapshot::SnapshotArgs;
use commands::valuation::ValuationArgs;

/// Revenue, valuation, cashflow and equity projections for a subscription business
#[derive(Parser)]
#[command(
    name = "eqm",
    version,
    about = "Revenue, valuation, cashflow and equity projections",
    long_about = "A CLI for projecting subscription revenue, growth-adjusted valuation, \
                  a 12-month cashflow timeline and milestone-based equity distribution \
                  with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine config file (JSON, or YAML by .yaml/.yml extension)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log debug detail to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pricing plans
    Plans,
    /// Monthly and annual subscription revenue
    Revenue(RevenueArgs),
    /// Growth-adjusted company valuation
    Valuation(ValuationArgs),
    /// 12-month cashflow and founder salary timeline
    Cashflow(CashflowArgs),
    /// Ownership split at a customer count
    Equity(EquityArgs),
    /// Settle a good, intermediate or bad leaver
    Leaver(LeaverArgs),
    /// Set one plan's share of the mix and rebalance the others
    RebalanceMix(RebalanceArgs),
    /// Valuation grid over customers and investment amount
    Sensitivity(SensitivityArgs),
    /// Full dashboard recomputation from a state file
    Snapshot(SnapshotArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loaded = match cli.config.as_deref().map(input::file::read_config).transpose() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let config = loaded.clone().unwrap_or_default();
    debug!(custom_config = loaded.is_some(), "engine config ready");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Plans => commands::pricing::run_plans(&config),
        Commands::Revenue(args) => commands::revenue::run_revenue(args, &config),
        Commands::Valuation(args) => commands::valuation::run_valuation(args, &config),
        Commands::Cashflow(args) => commands::cashflow::run_cashflow(args, &config),
        Commands::Equity(args) => commands::equity::run_equity(args, &config),
        Commands::Leaver(args) => commands::equity::run_leaver(args),
        Commands::RebalanceMix(args) => commands::pricing::run_rebalance_mix(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args, &config),
        Commands::Snapshot(args) => commands::snapshot::run_snapshot(args, loaded.as_ref()),
        Commands::Version => {
            println!("eqm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_revenue_with_mix() {
        let cli = Cli::try_parse_from([
            "eqm",
            "revenue",
            "--customers",
            "100",
            "--base-pct",
            "30",
            "--premium-pct",
            "60",
            "--corporate-pct",
            "10",
            "--output",
            "table",
        ])
        .unwrap();
        match cli.command {
            Commands::Revenue(args) => {
                assert_eq!(args.customers, Some(100));
                assert!(args.mix.to_mix().unwrap().is_some());
            }
            _ => panic!("expected revenue subcommand"),
        }
    }

    #[test]
    fn test_partial_mix_rejected() {
        let cli = Cli::try_parse_from(["eqm", "revenue", "--customers", "10", "--base-pct", "50"])
            .unwrap();
        match cli.command {
            Commands::Revenue(args) => assert!(args.mix.to_mix().is_err()),
            _ => panic!("expected revenue subcommand"),
        }
    }
}
