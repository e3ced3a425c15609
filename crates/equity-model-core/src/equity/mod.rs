pub mod distribution;

pub use distribution::{
    resolve_distribution, Allocation, EquityBracket, EquityDistribution, EquityStake, EquityTable,
};
