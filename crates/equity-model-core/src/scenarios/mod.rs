pub mod sensitivity;

pub use sensitivity::{sweep_valuation, SweepRange, ValuationSweepInput};
