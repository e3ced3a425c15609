pub mod calculator;

pub use calculator::{compute_revenue, split_customers, PlanRevenue, RevenueMetrics};
