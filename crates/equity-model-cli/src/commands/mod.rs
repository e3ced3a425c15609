pub mod cashflow;
pub mod equity;
pub mod pricing;
pub mod revenue;
pub mod scenarios;
pub mod snapshot;
pub mod valuation;

use clap::Args;
use rust_decimal::Decimal;

use equity_model_core::pricing::SubscriptionMix;

/// Subscription mix flags shared by every revenue-driven command.
#[derive(Args, Debug, Clone, Default)]
pub struct MixArgs {
    /// Percentage of customers on the base plan
    #[arg(long)]
    pub base_pct: Option<Decimal>,

    /// Percentage of customers on the premium plan
    #[arg(long)]
    pub premium_pct: Option<Decimal>,

    /// Percentage of customers on the corporate plan
    #[arg(long)]
    pub corporate_pct: Option<Decimal>,
}

impl MixArgs {
    /// The mix when all three flags are given, None when none are.
    pub fn to_mix(&self) -> Result<Option<SubscriptionMix>, Box<dyn std::error::Error>> {
        match (self.base_pct, self.premium_pct, self.corporate_pct) {
            (None, None, None) => Ok(None),
            (Some(b), Some(p), Some(c)) => Ok(Some(SubscriptionMix::new(b, p, c))),
            _ => Err("--base-pct, --premium-pct and --corporate-pct must be given together".into()),
        }
    }
}
