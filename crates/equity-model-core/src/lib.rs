pub mod error;
pub mod types;

#[cfg(feature = "revenue")]
pub mod pricing;

#[cfg(feature = "revenue")]
pub mod revenue;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "cashflow")]
pub mod cashflow;

#[cfg(feature = "equity")]
pub mod equity;

#[cfg(feature = "leaver")]
pub mod leaver;

#[cfg(feature = "milestones")]
pub mod milestones;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(all(feature = "valuation", feature = "cashflow", feature = "equity"))]
pub mod config;

#[cfg(feature = "snapshot")]
pub mod snapshot;

pub use error::EquityModelError;
pub use types::*;

/// Standard result type for all equity-model operations
pub type EquityModelResult<T> = Result<T, EquityModelError>;
