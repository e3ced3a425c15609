use clap::Args;
use serde_json::Value;

use equity_model_core::config::EngineConfig;
use equity_model_core::snapshot::{self, SnapshotInput};

use crate::input;

/// Arguments for a full dashboard recomputation
#[derive(Args)]
pub struct SnapshotArgs {
    /// Path to JSON file with the dashboard state
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_snapshot(
    args: SnapshotArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut snapshot_input: SnapshotInput = input::read_input(args.input.as_deref())?
        .ok_or("--input file or piped JSON is required for snapshot")?;
    // An explicit --config replaces whatever config the state file carries.
    if let Some(config) = config {
        snapshot_input.config = config.clone();
    }

    let result = snapshot::build_snapshot(&snapshot_input)?;
    Ok(serde_json::to_value(result)?)
}
