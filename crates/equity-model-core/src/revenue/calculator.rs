use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::EquityModelError;
use crate::pricing::{PlanId, PricingCatalog, SubscriptionMix};
use crate::types::{checked, div_floor_one, round_to_i64, with_metadata, ComputationOutput, Money};
use crate::EquityModelResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ─── Structs ─────────────────────────────────────────────────────────────────

/// Input for a standalone revenue calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueInput {
    pub customer_count: u64,
    /// Billable seats per customer account. Fractional values are averages.
    pub agents_per_customer: Decimal,
    /// Minutes each agent uses beyond the plan allowance, per month.
    pub extra_minutes_per_agent: Decimal,
    /// Split across plans. When absent every customer is on `plan`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mix: Option<SubscriptionMix>,
    /// Plan used when no mix is supplied.
    #[serde(default = "default_plan")]
    pub plan: PlanId,
    /// Price list override; the standard catalog when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PricingCatalog>,
}

pub(crate) fn default_plan() -> PlanId {
    PlanId::Premium
}

/// Customers, agents and subscription revenue attributed to one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRevenue {
    /// Signed: the remainder segment goes negative when the two rounded
    /// segments before it overshoot the customer count.
    pub customers: i64,
    pub agents: Decimal,
    pub revenue: Money,
}

/// Monthly and annual revenue for a customer base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    pub customer_count: u64,
    pub total_agents: Decimal,
    /// Subscription revenue across all plans, per month.
    pub base_monthly_revenue: Money,
    pub extra_minutes_monthly_revenue: Money,
    pub total_monthly_revenue: Money,
    pub annual_revenue: Money,
    pub revenue_per_customer: Money,
    pub revenue_per_agent: Money,
    pub breakdown: BTreeMap<PlanId, PlanRevenue>,
}

impl RevenueMetrics {
    pub fn customers_on(&self, plan: PlanId) -> i64 {
        self.breakdown.get(&plan).map(|b| b.customers).unwrap_or(0)
    }

    pub fn revenue_from(&self, plan: PlanId) -> Money {
        self.breakdown
            .get(&plan)
            .map(|b| b.revenue)
            .unwrap_or(Decimal::ZERO)
    }
}

// ─── Customer split ──────────────────────────────────────────────────────────

/// Customer counts are carried as `i64` so an overshooting mix can show a
/// negative remainder; counts above `i64::MAX` are rejected.
fn customers_as_i64(customer_count: u64) -> EquityModelResult<i64> {
    i64::try_from(customer_count).map_err(|_| {
        EquityModelError::invalid(
            "customer_count",
            format!("Customer count {customer_count} exceeds {}", i64::MAX),
        )
    })
}

/// Split `customer_count` across the mix.
///
/// Base and premium are each rounded half-up from their percentage; corporate
/// takes the exact remainder so the three always sum to `customer_count`.
pub fn split_customers(
    customer_count: u64,
    mix: &SubscriptionMix,
) -> EquityModelResult<[(PlanId, i64); 3]> {
    let total = customers_as_i64(customer_count)?;
    let n = Decimal::from(customer_count);
    let base = round_to_i64(n * mix.base / dec!(100));
    let premium = round_to_i64(n * mix.premium / dec!(100));
    let corporate = total - base - premium;
    Ok([
        (PlanId::Base, base),
        (PlanId::Premium, premium),
        (PlanId::Corporate, corporate),
    ])
}

// ─── Revenue ─────────────────────────────────────────────────────────────────

fn validate_drivers(agents_per_customer: Decimal, extra_minutes_per_agent: Decimal) -> EquityModelResult<()> {
    if agents_per_customer <= Decimal::ZERO {
        return Err(EquityModelError::invalid(
            "agents_per_customer",
            "Agents per customer must be positive",
        ));
    }
    if extra_minutes_per_agent < Decimal::ZERO {
        return Err(EquityModelError::invalid(
            "extra_minutes_per_agent",
            "Extra minutes per agent cannot be negative",
        ));
    }
    Ok(())
}

/// Monthly revenue for `customer_count` customers.
///
/// With a mix, customers are split per [`split_customers`] and each segment
/// is billed at its plan's per-agent price. Without one, every customer is on
/// `fallback_plan`. Overage minutes are billed once over the whole agent base
/// at the catalog's single extra-minute rate.
pub fn compute_revenue(
    catalog: &PricingCatalog,
    customer_count: u64,
    agents_per_customer: Decimal,
    extra_minutes_per_agent: Decimal,
    mix: Option<&SubscriptionMix>,
    fallback_plan: PlanId,
) -> EquityModelResult<RevenueMetrics> {
    validate_drivers(agents_per_customer, extra_minutes_per_agent)?;
    if let Some(m) = mix {
        m.validate()?;
    }

    let segments: Vec<(PlanId, i64)> = match mix {
        Some(m) if customer_count > 0 => split_customers(customer_count, m)?.to_vec(),
        _ => vec![(fallback_plan, customers_as_i64(customer_count)?)],
    };

    let mut breakdown = BTreeMap::new();
    let mut base_monthly_revenue = Decimal::ZERO;
    for (plan, customers) in segments {
        let price = catalog.price_of(plan)?;
        let agents = checked(
            Decimal::from(customers).checked_mul(agents_per_customer),
            "agents_per_customer",
        )?;
        let revenue = checked(agents.checked_mul(price), "customer_count")?;
        base_monthly_revenue = checked(base_monthly_revenue.checked_add(revenue), "customer_count")?;
        breakdown.insert(
            plan,
            PlanRevenue {
                customers,
                agents,
                revenue,
            },
        );
    }

    let customers_dec = Decimal::from(customer_count);
    let total_agents = checked(
        customers_dec.checked_mul(agents_per_customer),
        "agents_per_customer",
    )?;
    let extra_minutes_monthly_revenue = checked(
        total_agents
            .checked_mul(extra_minutes_per_agent)
            .and_then(|minutes| minutes.checked_mul(catalog.extra_minute_rate)),
        "extra_minutes_per_agent",
    )?;
    let total_monthly_revenue = checked(
        base_monthly_revenue.checked_add(extra_minutes_monthly_revenue),
        "extra_minutes_per_agent",
    )?;
    let annual_revenue = checked(
        total_monthly_revenue.checked_mul(MONTHS_PER_YEAR),
        "customer_count",
    )?;

    tracing::debug!(
        customer_count,
        %total_agents,
        %total_monthly_revenue,
        "computed revenue"
    );

    Ok(RevenueMetrics {
        customer_count,
        total_agents,
        base_monthly_revenue,
        extra_minutes_monthly_revenue,
        total_monthly_revenue,
        annual_revenue,
        revenue_per_customer: div_floor_one(total_monthly_revenue, customers_dec),
        revenue_per_agent: div_floor_one(total_monthly_revenue, total_agents),
        breakdown,
    })
}

/// Warnings shared by every operation that splits customers across a mix.
pub(crate) fn mix_warnings(mix: Option<&SubscriptionMix>, metrics: &RevenueMetrics) -> Vec<String> {
    let mut warnings = Vec::new();
    if let Some(m) = mix {
        if !m.is_balanced() {
            warnings.push(format!(
                "Subscription mix sums to {}%, not 100%; the corporate segment absorbs the difference",
                m.total()
            ));
        }
        let corporate = metrics.customers_on(PlanId::Corporate);
        if corporate < 0 {
            warnings.push(format!(
                "Rounded base and premium segments exceed {} customers; corporate remainder is {}",
                metrics.customer_count, corporate
            ));
        }
    }
    warnings
}

/// Compute revenue metrics and wrap them in the standard envelope.
pub fn calculate_revenue(
    input: &RevenueInput,
) -> EquityModelResult<ComputationOutput<RevenueMetrics>> {
    let start = Instant::now();
    let standard;
    let catalog = match &input.catalog {
        Some(c) => {
            c.validate()?;
            c
        }
        None => {
            standard = PricingCatalog::standard();
            &standard
        }
    };

    let metrics = compute_revenue(
        catalog,
        input.customer_count,
        input.agents_per_customer,
        input.extra_minutes_per_agent,
        input.mix.as_ref(),
        input.plan,
    )?;
    let warnings = mix_warnings(input.mix.as_ref(), &metrics);

    let methodology = if input.mix.is_some() {
        "Blended per-agent subscription revenue across plan mix plus overage minutes"
    } else {
        "Single-plan per-agent subscription revenue plus overage minutes"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "customer_count": input.customer_count,
            "agents_per_customer": input.agents_per_customer.to_string(),
            "extra_minutes_per_agent": input.extra_minutes_per_agent.to_string(),
            "extra_minute_rate": catalog.extra_minute_rate.to_string(),
            "plan": input.plan,
            "mix": input.mix,
        }),
        warnings,
        elapsed,
        metrics,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_mix() -> SubscriptionMix {
        SubscriptionMix::new(dec!(30), dec!(60), dec!(10))
    }

    #[test]
    fn test_blended_revenue_worked_example() {
        let catalog = PricingCatalog::standard();
        let m = compute_revenue(
            &catalog,
            100,
            dec!(1.8),
            Decimal::ZERO,
            Some(&standard_mix()),
            PlanId::Premium,
        )
        .unwrap();

        assert_eq!(m.customers_on(PlanId::Base), 30);
        assert_eq!(m.customers_on(PlanId::Premium), 60);
        assert_eq!(m.customers_on(PlanId::Corporate), 10);
        assert_eq!(m.breakdown[&PlanId::Base].agents, dec!(54));
        assert_eq!(m.breakdown[&PlanId::Premium].agents, dec!(108));
        assert_eq!(m.breakdown[&PlanId::Corporate].agents, dec!(18));
        assert_eq!(m.revenue_from(PlanId::Base), dec!(6156));
        assert_eq!(m.revenue_from(PlanId::Premium), dec!(17604));
        assert_eq!(m.revenue_from(PlanId::Corporate), dec!(5886));
        assert_eq!(m.base_monthly_revenue, dec!(29646));
        assert_eq!(m.total_monthly_revenue, dec!(29646));
        assert_eq!(m.annual_revenue, dec!(355752));
    }

    #[test]
    fn test_extra_minutes_use_blended_agent_count() {
        let catalog = PricingCatalog::standard();
        let m = compute_revenue(
            &catalog,
            100,
            dec!(1.8),
            dec!(300),
            Some(&standard_mix()),
            PlanId::Premium,
        )
        .unwrap();
        // 180 agents * 300 min * 0.55
        assert_eq!(m.extra_minutes_monthly_revenue, dec!(29700));
        assert_eq!(m.total_monthly_revenue, dec!(59346));
        assert_eq!(m.revenue_per_customer, dec!(593.46));
        assert_eq!(m.revenue_per_agent, dec!(59346) / dec!(180));
    }

    #[test]
    fn test_single_plan_fallback() {
        let catalog = PricingCatalog::standard();
        let m = compute_revenue(&catalog, 10, dec!(2), Decimal::ZERO, None, PlanId::Corporate)
            .unwrap();
        assert_eq!(m.breakdown.len(), 1);
        assert_eq!(m.customers_on(PlanId::Corporate), 10);
        assert_eq!(m.base_monthly_revenue, dec!(6540));
    }

    #[test]
    fn test_zero_customers_is_all_zero() {
        let catalog = PricingCatalog::standard();
        let m = compute_revenue(
            &catalog,
            0,
            dec!(1.8),
            dec!(300),
            Some(&standard_mix()),
            PlanId::Premium,
        )
        .unwrap();
        assert_eq!(m.total_monthly_revenue, Decimal::ZERO);
        assert_eq!(m.annual_revenue, Decimal::ZERO);
        assert_eq!(m.revenue_per_customer, Decimal::ZERO);
        assert_eq!(m.revenue_per_agent, Decimal::ZERO);
    }

    #[test]
    fn test_split_remainder_goes_negative_on_overshoot() {
        let mix = SubscriptionMix::new(dec!(50), dec!(50), dec!(0));
        let split = split_customers(3, &mix).unwrap();
        // round(1.5) + round(1.5) = 4 > 3
        assert_eq!(split[0].1, 2);
        assert_eq!(split[1].1, 2);
        assert_eq!(split[2].1, -1);
        assert_eq!(split.iter().map(|(_, c)| c).sum::<i64>(), 3);
    }

    #[test]
    fn test_customer_count_beyond_i64_rejected() {
        let too_many = i64::MAX as u64 + 1;
        let err = split_customers(too_many, &SubscriptionMix::default()).unwrap_err();
        assert!(matches!(err, EquityModelError::InvalidArgument { ref field, .. } if field == "customer_count"));

        let catalog = PricingCatalog::standard();
        let err = compute_revenue(&catalog, u64::MAX, dec!(1), dec!(0), None, PlanId::Base);
        assert!(matches!(err, Err(EquityModelError::InvalidArgument { .. })));
    }

    #[test]
    fn test_largest_count_still_splits_exactly() {
        let n = i64::MAX as u64;
        let split = split_customers(n, &SubscriptionMix::default()).unwrap();
        assert_eq!(split.iter().map(|(_, c)| c).sum::<i64>(), i64::MAX);
    }

    #[test]
    fn test_invalid_agents_rejected() {
        let catalog = PricingCatalog::standard();
        let err = compute_revenue(&catalog, 10, dec!(0), dec!(0), None, PlanId::Base);
        assert!(matches!(err, Err(EquityModelError::InvalidArgument { .. })));
        let err = compute_revenue(&catalog, 10, dec!(1), dec!(-1), None, PlanId::Base);
        assert!(matches!(err, Err(EquityModelError::InvalidArgument { .. })));
    }

    #[test]
    fn test_envelope_warns_on_unbalanced_mix() {
        let input = RevenueInput {
            customer_count: 3,
            agents_per_customer: dec!(1),
            extra_minutes_per_agent: dec!(0),
            mix: Some(SubscriptionMix::new(dec!(50), dec!(50), dec!(20))),
            plan: PlanId::Premium,
            catalog: None,
        };
        let out = calculate_revenue(&input).unwrap();
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings[0].contains("120%"));
    }
}
