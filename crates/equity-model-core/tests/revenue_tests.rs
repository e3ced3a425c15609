use equity_model_core::pricing::{PlanId, PricingCatalog, SubscriptionMix};
use equity_model_core::revenue::calculator::{calculate_revenue, RevenueInput};
use equity_model_core::revenue::{compute_revenue, split_customers};
use equity_model_core::EquityModelError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn dashboard_input(customers: u64) -> RevenueInput {
    RevenueInput {
        customer_count: customers,
        agents_per_customer: dec!(1.8),
        extra_minutes_per_agent: dec!(300),
        mix: Some(SubscriptionMix::default()),
        plan: PlanId::Premium,
        catalog: None,
    }
}

// ===========================================================================
// Plan identifiers
// ===========================================================================

#[test]
fn test_unknown_plan_name() {
    let err = "enterprise".parse::<PlanId>().unwrap_err();
    assert!(matches!(err, EquityModelError::UnknownPlan(ref s) if s == "enterprise"));
}

// ===========================================================================
// Dashboard worked example
// ===========================================================================

#[test]
fn test_hundred_customers_on_default_mix() {
    let out = calculate_revenue(&dashboard_input(100)).unwrap();
    let r = &out.result;

    assert_eq!(r.customers_on(PlanId::Base), 30);
    assert_eq!(r.customers_on(PlanId::Premium), 60);
    assert_eq!(r.customers_on(PlanId::Corporate), 10);
    assert_eq!(r.revenue_from(PlanId::Base), dec!(6156));
    assert_eq!(r.revenue_from(PlanId::Premium), dec!(17604));
    assert_eq!(r.revenue_from(PlanId::Corporate), dec!(5886));

    assert_eq!(r.base_monthly_revenue, dec!(29646));
    // 180 agents x 300 minutes x 0.55
    assert_eq!(r.extra_minutes_monthly_revenue, dec!(29700));
    assert_eq!(r.total_monthly_revenue, dec!(59346));
    assert_eq!(r.annual_revenue, dec!(712152));
    assert_eq!(r.revenue_per_customer, dec!(593.46));
    assert_eq!(r.revenue_per_agent, dec!(329.7));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_single_plan_fallback() {
    let mut input = dashboard_input(100);
    input.mix = None;
    input.plan = PlanId::Corporate;
    let r = calculate_revenue(&input).unwrap().result;
    assert_eq!(r.breakdown.len(), 1);
    assert_eq!(r.customers_on(PlanId::Corporate), 100);
    assert_eq!(r.base_monthly_revenue, dec!(58860));
}

#[test]
fn test_zero_customers_is_all_zero() {
    let r = calculate_revenue(&dashboard_input(0)).unwrap().result;
    assert_eq!(r.total_monthly_revenue, Decimal::ZERO);
    assert_eq!(r.annual_revenue, Decimal::ZERO);
    assert_eq!(r.revenue_per_customer, Decimal::ZERO);
    assert_eq!(r.revenue_per_agent, Decimal::ZERO);
}

// ===========================================================================
// Segment rounding
// ===========================================================================

#[test]
fn test_remainder_goes_to_corporate() {
    // 7 customers at 30/60/10: base round(2.1)=2, premium round(4.2)=4, corporate 1
    let split = split_customers(7, &SubscriptionMix::default()).unwrap();
    assert_eq!(
        split,
        [(PlanId::Base, 2), (PlanId::Premium, 4), (PlanId::Corporate, 1)]
    );
}

#[test]
fn test_negative_remainder_is_reported_not_fixed() {
    let mut input = dashboard_input(3);
    input.mix = Some(SubscriptionMix::new(dec!(50), dec!(50), dec!(0)));
    let out = calculate_revenue(&input).unwrap();
    // round(1.5) + round(1.5) = 4 > 3
    assert_eq!(out.result.customers_on(PlanId::Corporate), -1);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_unbalanced_mix_warns() {
    let mut input = dashboard_input(100);
    input.mix = Some(SubscriptionMix::new(dec!(30), dec!(30), dec!(30)));
    let out = calculate_revenue(&input).unwrap();
    assert_eq!(out.result.customers_on(PlanId::Corporate), 40);
    assert!(out.warnings.iter().any(|w| w.contains("90%")));
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_negative_drivers_rejected() {
    let catalog = PricingCatalog::standard();
    let err = compute_revenue(&catalog, 10, dec!(-1), dec!(0), None, PlanId::Base).unwrap_err();
    assert!(matches!(err, EquityModelError::InvalidArgument { .. }));
    let err = compute_revenue(&catalog, 10, dec!(1), dec!(-5), None, PlanId::Base).unwrap_err();
    assert!(matches!(err, EquityModelError::InvalidArgument { .. }));
}

#[test]
fn test_out_of_range_products_are_errors() {
    let catalog = PricingCatalog::standard();
    let customers = 1_000_000_000_000_000_000u64;
    // 10^18 customers x 10^10 agents x corporate price exceeds Decimal's range
    let err = compute_revenue(
        &catalog,
        customers,
        dec!(10000000000),
        dec!(0),
        None,
        PlanId::Corporate,
    )
    .unwrap_err();
    assert!(matches!(err, EquityModelError::InvalidArgument { .. }));

    // seat revenue fits, the overage minutes do not
    let err = compute_revenue(
        &catalog,
        customers,
        dec!(100000000),
        dec!(100000),
        None,
        PlanId::Corporate,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EquityModelError::InvalidArgument { ref field, .. } if field == "extra_minutes_per_agent"
    ));
}

#[test]
fn test_customer_count_above_i64_rejected() {
    let mut input = dashboard_input(u64::MAX);
    let err = calculate_revenue(&input).unwrap_err();
    assert!(matches!(err, EquityModelError::InvalidArgument { ref field, .. } if field == "customer_count"));
    input.mix = None;
    assert!(calculate_revenue(&input).is_err());
}

#[test]
fn test_custom_catalog_is_used() {
    let mut catalog = PricingCatalog::standard();
    catalog.extra_minute_rate = Decimal::ZERO;
    let mut input = dashboard_input(100);
    input.catalog = Some(catalog);
    let r = calculate_revenue(&input).unwrap().result;
    assert_eq!(r.total_monthly_revenue, dec!(29646));
}
