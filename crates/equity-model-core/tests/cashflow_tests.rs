use chrono::NaiveDate;
use equity_model_core::cashflow::timeline::{project_cashflow, CashflowInput};
use equity_model_core::cashflow::{OperatingCostPolicy, SalaryPolicy, TimelineParams};
use equity_model_core::pricing::{PlanId, SubscriptionMix};
use equity_model_core::EquityModelError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn dashboard_params() -> TimelineParams {
    TimelineParams {
        monthly_targets: vec![4, 8, 12, 18, 25, 35, 45, 60, 75, 95, 120, 150],
        agents_per_customer: dec!(1.8),
        extra_minutes_per_agent: dec!(300),
        mix: Some(SubscriptionMix::default()),
        plan: PlanId::Premium,
        operating_cost: OperatingCostPolicy::default(),
        salary: SalaryPolicy::default(),
        start_date: None,
    }
}

fn project(params: TimelineParams) -> equity_model_core::cashflow::CashflowTimeline {
    project_cashflow(&CashflowInput {
        params,
        catalog: None,
    })
    .unwrap()
    .result
}

#[test]
fn test_dashboard_defaults() {
    let t = project(dashboard_params());
    assert_eq!(t.months.len(), 12);
    assert_eq!(t.months[11].cumulative_customers, 647);

    let first = &t.months[0];
    assert_eq!(first.cumulative_customers, 4);
    assert_eq!(first.monthly_revenue, dec!(2568.6));
    assert_eq!(first.operating_cost, dec!(5000));
    assert_eq!(first.profit_before_salaries, dec!(-2431.4));
    assert!(!first.salary_affordable);
    assert_eq!(first.salary_paid, Decimal::ZERO);
    assert_eq!(first.cumulative_profit, dec!(-2431.4));
}

#[test]
fn test_salaries_unlock_in_month_four() {
    let t = project(dashboard_params());
    // month 3 (24 customers) earns 14437.8, month 4 (42 customers) earns 24831
    assert_eq!(t.months[2].monthly_revenue, dec!(14437.8));
    assert_eq!(t.months[3].monthly_revenue, dec!(24831));
    assert_eq!(t.first_salary_affordable_month, Some(4));
    assert!(t.months[3].salary_affordable);
    assert_eq!(t.months[3].salary_paid, t.combined_monthly_salary);
}

#[test]
fn test_cumulative_profit_carries_forward() {
    let t = project(dashboard_params());
    let mut running = Decimal::ZERO;
    for m in &t.months {
        running += m.profit_after_salaries;
        assert_eq!(m.cumulative_profit, running);
        assert_eq!(
            m.profit_after_salaries,
            m.profit_before_salaries - m.salary_paid
        );
    }
    assert_eq!(t.ending_cumulative_profit, running);
}

#[test]
fn test_no_customers_burns_fixed_costs() {
    let mut params = dashboard_params();
    params.monthly_targets = vec![0; 12];
    let out = project_cashflow(&CashflowInput {
        params,
        catalog: None,
    })
    .unwrap();
    assert_eq!(out.result.ending_cumulative_profit, dec!(-60000));
    assert_eq!(out.result.first_salary_affordable_month, None);
    assert!(!out.warnings.is_empty());
}

#[test]
fn test_revenue_ratio_costs() {
    let mut params = dashboard_params();
    params.operating_cost = OperatingCostPolicy::RevenueRatio { ratio: dec!(0.25) };
    let t = project(params);
    assert_eq!(t.months[0].operating_cost, dec!(642.15));
    assert_eq!(t.months[0].profit_before_salaries, dec!(1926.45));
}

#[test]
fn test_period_labels() {
    let mut params = dashboard_params();
    params.start_date = NaiveDate::from_ymd_opt(2025, 6, 1);
    let t = project(params);
    assert_eq!(t.months[0].period_start, NaiveDate::from_ymd_opt(2025, 6, 1));
    assert_eq!(t.months[11].period_start, NaiveDate::from_ymd_opt(2026, 5, 1));
}

#[test]
fn test_wrong_target_length_is_configuration_error() {
    let mut params = dashboard_params();
    params.monthly_targets.pop();
    let err = project_cashflow(&CashflowInput {
        params,
        catalog: None,
    })
    .unwrap_err();
    assert!(matches!(err, EquityModelError::Configuration(_)));
}
