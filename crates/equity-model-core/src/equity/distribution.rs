use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EquityModelError;
use crate::types::{round_half_up, with_metadata, ComputationOutput, Percent};
use crate::EquityModelResult;

// ─── Table definition ────────────────────────────────────────────────────────

/// A literal ownership line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedStake {
    pub name: String,
    pub percentage: Percent,
}

/// A holder's absolute share count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareHolding {
    pub name: String,
    pub shares: u64,
}

/// How a bracket's ownership split is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Allocation {
    /// Percentages are taken as written.
    Fixed { stakes: Vec<FixedStake> },
    /// Percentages are `round(shares / total × 100)` per holder.
    /// `total_shares` defaults to the sum of the holdings.
    FromShares {
        holdings: Vec<ShareHolding>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total_shares: Option<u64>,
    },
}

/// Ownership structure that applies from `min_customers` upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityBracket {
    pub min_customers: u64,
    pub label: String,
    pub allocation: Allocation,
}

/// Customer-count milestones and the ownership split each one triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityTable {
    pub brackets: Vec<EquityBracket>,
}

impl Default for EquityTable {
    fn default() -> Self {
        Self::two_tranche()
    }
}

fn fixed(stakes: &[(&str, Decimal)]) -> Allocation {
    Allocation::Fixed {
        stakes: stakes
            .iter()
            .map(|(name, pct)| FixedStake {
                name: (*name).to_string(),
                percentage: *pct,
            })
            .collect(),
    }
}

fn holdings(holders: &[(&str, u64)]) -> Vec<ShareHolding> {
    holders
        .iter()
        .map(|(name, shares)| ShareHolding {
            name: (*name).to_string(),
            shares: *shares,
        })
        .collect()
}

const FOUNDER_SHARES: u64 = 5_000_000;
const INVESTOR_POOL_SHARES: u64 = 1_190_476;
const EMPLOYEE_POOL_SHARES: u64 = 714_286;

impl EquityTable {
    fn founding_brackets() -> Vec<EquityBracket> {
        vec![
            EquityBracket {
                min_customers: 0,
                label: "Foundation".into(),
                allocation: fixed(&[
                    ("Domenico", dec!(42)),
                    ("Michael", dec!(42)),
                    ("Investors (Reserved)", dec!(10)),
                    ("Employees (Reserved)", dec!(6)),
                ]),
            },
            EquityBracket {
                min_customers: 50,
                label: "Series A issued".into(),
                allocation: fixed(&[
                    ("Domenico", dec!(42)),
                    ("Michael", dec!(42)),
                    ("Investors (Series A)", dec!(10)),
                    ("Employees", dec!(6)),
                ]),
            },
        ]
    }

    /// 42/42/10/6 with the investor and employee pools reserved until 50
    /// customers, then issued; at 1,000 customers the split is recomputed
    /// from the full share register (11,904,762 authorised).
    pub fn reserved_pool() -> Self {
        let mut brackets = Self::founding_brackets();
        brackets.push(EquityBracket {
            min_customers: 1000,
            label: "Investment round".into(),
            allocation: Allocation::FromShares {
                holdings: holdings(&[
                    ("Domenico", FOUNDER_SHARES),
                    ("Michael", FOUNDER_SHARES),
                    ("Investors", INVESTOR_POOL_SHARES),
                    ("Employees", EMPLOYEE_POOL_SHARES),
                ]),
                total_shares: Some(11_904_762),
            },
        });
        EquityTable { brackets }
    }

    /// The default table. As [`EquityTable::reserved_pool`] up to 1,000
    /// customers, where a second investor tranche dilutes everyone into a
    /// five-party split.
    pub fn two_tranche() -> Self {
        let mut brackets = Self::founding_brackets();
        brackets.push(EquityBracket {
            min_customers: 1000,
            label: "Series A second tranche".into(),
            allocation: Allocation::FromShares {
                holdings: holdings(&[
                    ("Domenico", FOUNDER_SHARES),
                    ("Michael", FOUNDER_SHARES),
                    ("Seed investors", INVESTOR_POOL_SHARES),
                    ("Series A investors", 1_250_000),
                    ("Employees", EMPLOYEE_POOL_SHARES),
                ]),
                total_shares: None,
            },
        });
        EquityTable { brackets }
    }

    pub fn validate(&self) -> EquityModelResult<()> {
        let first = self.brackets.first().ok_or_else(|| {
            EquityModelError::Configuration("equity table has no brackets".into())
        })?;
        if first.min_customers != 0 {
            return Err(EquityModelError::Configuration(format!(
                "first equity bracket must start at 0 customers, starts at {}",
                first.min_customers
            )));
        }
        for pair in self.brackets.windows(2) {
            if pair[1].min_customers <= pair[0].min_customers {
                return Err(EquityModelError::Configuration(format!(
                    "equity bracket thresholds must be strictly ascending ({} then {})",
                    pair[0].min_customers, pair[1].min_customers
                )));
            }
        }
        for bracket in &self.brackets {
            validate_allocation(bracket)?;
        }
        Ok(())
    }

    /// The bracket in force at `customer_count`.
    pub fn bracket_for(&self, customer_count: u64) -> EquityModelResult<&EquityBracket> {
        self.brackets
            .iter()
            .rev()
            .find(|b| b.min_customers <= customer_count)
            .ok_or_else(|| {
                EquityModelError::Configuration(format!(
                    "no equity bracket covers {customer_count} customers"
                ))
            })
    }
}

fn shares_held(label: &str, holdings: &[ShareHolding]) -> EquityModelResult<u64> {
    holdings
        .iter()
        .try_fold(0u64, |acc, h| acc.checked_add(h.shares))
        .ok_or_else(|| {
            EquityModelError::Configuration(format!(
                "bracket '{label}' holds more shares than a u64 can count"
            ))
        })
}

fn validate_allocation(bracket: &EquityBracket) -> EquityModelResult<()> {
    match &bracket.allocation {
        Allocation::Fixed { stakes } => {
            if stakes.is_empty() {
                return Err(EquityModelError::Configuration(format!(
                    "bracket '{}' has no stakeholders",
                    bracket.label
                )));
            }
            for s in stakes {
                if s.percentage < Decimal::ZERO || s.percentage > dec!(100) {
                    return Err(EquityModelError::invalid(
                        format!("{}.{}", bracket.label, s.name),
                        format!("Ownership must be in [0, 100], got {}", s.percentage),
                    ));
                }
            }
        }
        Allocation::FromShares {
            holdings,
            total_shares,
        } => {
            if holdings.is_empty() {
                return Err(EquityModelError::Configuration(format!(
                    "bracket '{}' has no shareholders",
                    bracket.label
                )));
            }
            let held = shares_held(&bracket.label, holdings)?;
            let total = total_shares.unwrap_or(held);
            if total == 0 {
                return Err(EquityModelError::Configuration(format!(
                    "bracket '{}' has zero total shares",
                    bracket.label
                )));
            }
            if total < held {
                return Err(EquityModelError::Configuration(format!(
                    "bracket '{}' holds {held} shares but only {total} exist",
                    bracket.label
                )));
            }
        }
    }
    Ok(())
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// One line of a resolved ownership table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityStake {
    pub name: String,
    pub percentage: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
}

/// The ownership table in force at a customer count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityDistribution {
    pub bracket_label: String,
    pub min_customers: u64,
    pub stakes: Vec<EquityStake>,
    /// Sum of the stakes. May differ from 100 when percentages are rounded
    /// from share counts.
    pub total_percentage: Percent,
}

/// Resolve the ownership table for `customer_count`.
pub fn resolve_distribution(
    table: &EquityTable,
    customer_count: u64,
) -> EquityModelResult<EquityDistribution> {
    table.validate()?;
    let bracket = table.bracket_for(customer_count)?;

    let stakes: Vec<EquityStake> = match &bracket.allocation {
        Allocation::Fixed { stakes } => stakes
            .iter()
            .map(|s| EquityStake {
                name: s.name.clone(),
                percentage: s.percentage,
                shares: None,
            })
            .collect(),
        Allocation::FromShares {
            holdings,
            total_shares,
        } => {
            let total = Decimal::from(match total_shares {
                Some(total) => *total,
                None => shares_held(&bracket.label, holdings)?,
            });
            holdings
                .iter()
                .map(|h| EquityStake {
                    name: h.name.clone(),
                    percentage: round_half_up(Decimal::from(h.shares) / total * dec!(100)),
                    shares: Some(h.shares),
                })
                .collect()
        }
    };
    let total_percentage: Percent = stakes.iter().map(|s| s.percentage).sum();

    tracing::debug!(
        customer_count,
        bracket = %bracket.label,
        %total_percentage,
        "resolved equity distribution"
    );

    Ok(EquityDistribution {
        bracket_label: bracket.label.clone(),
        min_customers: bracket.min_customers,
        stakes,
        total_percentage,
    })
}

/// Input for resolving a distribution with an optional custom table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionInput {
    pub customer_count: u64,
    #[serde(default)]
    pub table: EquityTable,
}

/// Resolve the distribution and wrap it in the standard envelope.
pub fn calculate_distribution(
    input: &DistributionInput,
) -> EquityModelResult<ComputationOutput<EquityDistribution>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let distribution = resolve_distribution(&input.table, input.customer_count)?;
    if distribution.total_percentage != dec!(100) {
        warnings.push(format!(
            "Ownership percentages sum to {}% after rounding share counts; not normalised",
            distribution.total_percentage
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Milestone bracket lookup; share-register brackets rounded to whole percentage points",
        &serde_json::json!({
            "customer_count": input.customer_count,
            "thresholds": input
                .table
                .brackets
                .iter()
                .map(|b| b.min_customers)
                .collect::<Vec<_>>(),
        }),
        warnings,
        elapsed,
        distribution,
    ))
}
