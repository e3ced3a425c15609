use equity_model_core::pricing::{PlanId, PricingCatalog, SubscriptionMix};
use equity_model_core::revenue::compute_revenue;
use equity_model_core::scenarios::{sweep_valuation, SweepRange, ValuationSweepInput};
use equity_model_core::valuation::growth::{calculate_valuation, investment_implied_value, ValuationInput};
use equity_model_core::valuation::{compute_valuation, ValuationConfig};
use equity_model_core::EquityModelError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn deal(customers: u64) -> ValuationInput {
    ValuationInput {
        investment_amount: dec!(1000000),
        equity_percent_offered: dec!(10),
        customer_count: customers,
        agents_per_customer: dec!(1.8),
        extra_minutes_per_agent: dec!(300),
        mix: None,
        plan: PlanId::Premium,
        total_authorized_shares: None,
        config: ValuationConfig::default(),
        catalog: None,
    }
}

// ===========================================================================
// Investment-implied value
// ===========================================================================

#[test]
fn test_implied_value_independent_of_customers() {
    assert_eq!(investment_implied_value(dec!(1000000), dec!(10)).unwrap(), dec!(10000000));
    for customers in [0, 100, 1000] {
        let v = calculate_valuation(&deal(customers)).unwrap().result.valuation;
        assert_eq!(v.investment_implied_value, dec!(10000000));
    }
}

#[test]
fn test_no_round_means_no_implied_value() {
    assert_eq!(investment_implied_value(dec!(0), dec!(10)).unwrap(), Decimal::ZERO);
    assert_eq!(investment_implied_value(dec!(1000000), dec!(0)).unwrap(), Decimal::ZERO);
}

#[test]
fn test_tiny_stake_out_of_range_is_an_error() {
    let cheque = Decimal::from_scientific("1e20").unwrap();
    let err = investment_implied_value(cheque, dec!(0.0000001)).unwrap_err();
    assert!(matches!(
        err,
        EquityModelError::InvalidArgument { ref field, .. } if field == "equity_percent_offered"
    ));

    let mut input = deal(100);
    input.investment_amount = cheque;
    input.equity_percent_offered = dec!(0.0000001);
    assert!(matches!(
        calculate_valuation(&input),
        Err(EquityModelError::InvalidArgument { .. })
    ));
}

// ===========================================================================
// Growth multiple
// ===========================================================================

#[test]
fn test_multiple_steps_and_saturates() {
    let config = ValuationConfig::default();
    assert_eq!(config.total_multiple(0).unwrap(), dec!(5));
    assert_eq!(config.total_multiple(100).unwrap(), dec!(5.5));
    assert_eq!(config.total_multiple(150).unwrap(), dec!(5.75));
    assert_eq!(config.total_multiple(1000).unwrap(), dec!(10));
    assert_eq!(config.total_multiple(5000).unwrap(), dec!(10));
}

#[test]
fn test_single_plan_valuation_at_hundred_customers() {
    let out = calculate_valuation(&deal(100)).unwrap().result;
    // premium: 180 x 163 + 180 x 300 x 0.55 = 59040/month
    assert_eq!(out.revenue.annual_revenue, dec!(708480));
    assert_eq!(out.valuation.growth_premium, dec!(3896640));
    assert_eq!(out.valuation.valuation, dec!(13896640));
    assert_eq!(out.valuation.value_per_customer, dec!(138966.4));
}

#[test]
fn test_mix_valuation_at_hundred_customers() {
    let mut input = deal(100);
    input.mix = Some(SubscriptionMix::default());
    let out = calculate_valuation(&input).unwrap().result;
    assert_eq!(out.revenue.annual_revenue, dec!(712152));
    assert_eq!(out.valuation.valuation, dec!(13916836));
}

#[test]
fn test_value_per_customer_zero_without_customers() {
    let out = calculate_valuation(&deal(0)).unwrap().result;
    assert_eq!(out.valuation.valuation, dec!(10000000));
    assert_eq!(out.valuation.value_per_customer, Decimal::ZERO);
}

#[test]
fn test_value_per_share() {
    let mut input = deal(0);
    input.total_authorized_shares = Some(10_000_000);
    let out = calculate_valuation(&input).unwrap().result;
    assert_eq!(out.valuation.value_per_share, Some(dec!(1)));
}

#[test]
fn test_compute_valuation_matches_breakdown() {
    let catalog = PricingCatalog::standard();
    let revenue = compute_revenue(&catalog, 400, dec!(1.8), dec!(300), None, PlanId::Premium).unwrap();
    let v = compute_valuation(dec!(1000000), dec!(10), 400, &revenue, &ValuationConfig::default())
        .unwrap();
    assert_eq!(v, dec!(10000000) + revenue.annual_revenue * dec!(7));
}

#[test]
fn test_equity_out_of_range_rejected() {
    let mut input = deal(10);
    input.equity_percent_offered = dec!(101);
    assert!(calculate_valuation(&input).is_err());
    input.equity_percent_offered = dec!(-1);
    assert!(calculate_valuation(&input).is_err());
}

// ===========================================================================
// Sensitivity grid
// ===========================================================================

#[test]
fn test_sweep_base_case_matches_point_valuation() {
    let input = ValuationSweepInput {
        base: deal(400),
        customers: SweepRange {
            min: dec!(0),
            max: dec!(1000),
            step: dec!(100),
        },
        investment: SweepRange {
            min: dec!(500000),
            max: dec!(1500000),
            step: dec!(500000),
        },
    };
    let grid = sweep_valuation(&input).unwrap().result;
    let point = calculate_valuation(&deal(400)).unwrap().result.valuation.valuation;
    assert_eq!(grid.base_case_position, (4, 1));
    assert_eq!(grid.base_case_value, point);
}
