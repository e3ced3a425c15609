use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EquityModelError;
use crate::pricing::PricingCatalog;
use crate::revenue::compute_revenue;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::valuation::growth::{value_company, ValuationInput};
use crate::EquityModelResult;

/// Largest grid a single sweep may evaluate.
pub const MAX_GRID_CELLS: usize = 10_000;

/// Inclusive sweep from `min` to `max` in increments of `step`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRange {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Two-way valuation sweep over customer count and investment amount.
/// Every other driver is taken from `base`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSweepInput {
    pub base: ValuationInput,
    pub customers: SweepRange,
    pub investment: SweepRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSensitivity {
    pub customer_values: Vec<u64>,
    pub investment_values: Vec<Money>,
    /// matrix[i][j] = valuation at customer_values[i], investment_values[j]
    pub matrix: Vec<Vec<Money>>,
    /// Valuation at the grid point nearest the base input
    pub base_case_value: Money,
    /// Position of the base case in the matrix (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a range from min to max with step.
fn generate_sweep_values(name: &str, range: &SweepRange) -> EquityModelResult<Vec<Decimal>> {
    if range.step <= Decimal::ZERO {
        return Err(EquityModelError::invalid(
            format!("sweep:{name}"),
            "Step must be positive",
        ));
    }
    if range.min > range.max {
        return Err(EquityModelError::invalid(
            format!("sweep:{name}"),
            "Min must be <= max",
        ));
    }
    if range.min < Decimal::ZERO {
        return Err(EquityModelError::invalid(
            format!("sweep:{name}"),
            "Min cannot be negative",
        ));
    }
    let span = (range.max - range.min)
        .checked_div(range.step)
        .map(|s| s.floor());
    if span.map_or(true, |s| s >= Decimal::from(MAX_GRID_CELLS)) {
        return Err(EquityModelError::invalid(
            format!("sweep:{name}"),
            format!("Range produces more than {MAX_GRID_CELLS} values"),
        ));
    }

    let mut values = Vec::new();
    let mut current = range.min;
    while current <= range.max {
        values.push(current);
        current += range.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < range.max {
            values.push(range.max);
        }
    }

    Ok(values)
}

fn customer_sweep(range: &SweepRange) -> EquityModelResult<Vec<u64>> {
    generate_sweep_values("customers", range)?
        .into_iter()
        .map(|v| {
            if v.fract() != Decimal::ZERO {
                return Err(EquityModelError::invalid(
                    "sweep:customers",
                    format!("Customer counts must be whole numbers, got {v}"),
                ));
            }
            v.to_u64().ok_or_else(|| {
                EquityModelError::invalid("sweep:customers", format!("{v} is out of range"))
            })
        })
        .collect()
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Value the company at every (customers, investment) grid point.
///
/// Revenue depends only on the customer count, so it is computed once per row.
pub fn sweep_valuation(
    input: &ValuationSweepInput,
) -> EquityModelResult<ComputationOutput<ValuationSensitivity>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let customer_values = customer_sweep(&input.customers)?;
    let investment_values = generate_sweep_values("investment", &input.investment)?;
    if customer_values.len() * investment_values.len() > MAX_GRID_CELLS {
        return Err(EquityModelError::invalid(
            "sweep",
            format!("Grid exceeds {MAX_GRID_CELLS} cells"),
        ));
    }

    let base = &input.base;
    let standard;
    let catalog = match &base.catalog {
        Some(c) => {
            c.validate()?;
            c
        }
        None => {
            standard = PricingCatalog::standard();
            &standard
        }
    };

    let mut matrix = Vec::with_capacity(customer_values.len());
    for &customers in &customer_values {
        let revenue = compute_revenue(
            catalog,
            customers,
            base.agents_per_customer,
            base.extra_minutes_per_agent,
            base.mix.as_ref(),
            base.plan,
        )?;
        let mut row = Vec::with_capacity(investment_values.len());
        for &investment in &investment_values {
            let b = value_company(
                investment,
                base.equity_percent_offered,
                customers,
                &revenue,
                &base.config,
                None,
            )?;
            row.push(b.valuation);
        }
        matrix.push(row);
    }

    let customer_axis: Vec<Decimal> = customer_values.iter().map(|&c| Decimal::from(c)).collect();
    let base_row = closest_index(&customer_axis, Decimal::from(base.customer_count));
    let base_col = closest_index(&investment_values, base.investment_amount);
    let base_case_value = matrix[base_row][base_col];

    let output = ValuationSensitivity {
        customer_values,
        investment_values,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Valuation Sensitivity (customers x investment)",
        &serde_json::json!({
            "equity_percent_offered": base.equity_percent_offered.to_string(),
            "agents_per_customer": base.agents_per_customer.to_string(),
            "plan": base.plan,
            "mix": base.mix,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PlanId;
    use crate::valuation::ValuationConfig;
    use rust_decimal_macros::dec;

    fn sample_input() -> ValuationSweepInput {
        ValuationSweepInput {
            base: ValuationInput {
                investment_amount: dec!(1000000),
                equity_percent_offered: dec!(10),
                customer_count: 400,
                agents_per_customer: dec!(1.8),
                extra_minutes_per_agent: dec!(300),
                mix: None,
                plan: PlanId::Premium,
                total_authorized_shares: None,
                config: ValuationConfig::default(),
                catalog: None,
            },
            customers: SweepRange {
                min: dec!(0),
                max: dec!(1000),
                step: dec!(200),
            },
            investment: SweepRange {
                min: dec!(0),
                max: dec!(2000000),
                step: dec!(500000),
            },
        }
    }

    #[test]
    fn test_grid_dimensions() {
        let out = sweep_valuation(&sample_input()).unwrap().result;
        assert_eq!(out.customer_values, vec![0, 200, 400, 600, 800, 1000]);
        assert_eq!(out.investment_values.len(), 5);
        assert_eq!(out.matrix.len(), 6);
        assert_eq!(out.matrix[0].len(), 5);
        assert_eq!(out.base_case_position, (2, 2));
    }

    #[test]
    fn test_grid_is_monotone() {
        let out = sweep_valuation(&sample_input()).unwrap().result;
        for i in 0..out.matrix.len() {
            for j in 0..out.matrix[i].len() {
                if i + 1 < out.matrix.len() {
                    assert!(out.matrix[i + 1][j] >= out.matrix[i][j]);
                }
                if j + 1 < out.matrix[i].len() {
                    assert!(out.matrix[i][j + 1] >= out.matrix[i][j]);
                }
            }
        }
    }

    #[test]
    fn test_zero_corner() {
        let out = sweep_valuation(&sample_input()).unwrap().result;
        assert_eq!(out.matrix[0][0], Decimal::ZERO);
    }

    #[test]
    fn test_sweep_with_non_exact_step() {
        let range = SweepRange {
            min: dec!(0),
            max: dec!(1),
            step: dec!(0.3),
        };
        let vals = generate_sweep_values("test", &range).unwrap();
        // 0, 0.3, 0.6, 0.9, 1.0 (max appended)
        assert_eq!(vals.len(), 5);
        assert_eq!(*vals.last().unwrap(), dec!(1));
    }

    #[test]
    fn test_step_too_fine_to_count_rejected() {
        let mut input = sample_input();
        input.investment = SweepRange {
            min: dec!(0),
            max: dec!(10000000000000000000000000000),
            step: dec!(0.0000000000000000000000000001),
        };
        assert!(matches!(
            sweep_valuation(&input),
            Err(EquityModelError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_invalid_step() {
        let mut input = sample_input();
        input.customers.step = dec!(0);
        assert!(sweep_valuation(&input).is_err());
    }

    #[test]
    fn test_fractional_customers_rejected() {
        let mut input = sample_input();
        input.customers.step = dec!(2.5);
        assert!(sweep_valuation(&input).is_err());
    }
}
