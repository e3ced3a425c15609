pub mod growth;

pub use growth::{compute_valuation, value_company, ValuationBreakdown, ValuationConfig};
