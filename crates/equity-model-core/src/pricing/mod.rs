pub mod catalog;
pub mod mix;

pub use catalog::{PlanId, PricingCatalog, PricingPlan};
pub use mix::SubscriptionMix;
