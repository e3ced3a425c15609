//! KPI milestones along the customer-growth path and the investor share pool
//! released as the company moves through them.

use serde::{Deserialize, Serialize};

use crate::equity::distribution::ShareHolding;
use crate::error::EquityModelError;
use crate::EquityModelResult;

// ─── Share register ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRegister {
    pub holdings: Vec<ShareHolding>,
    pub total_authorized: u64,
    pub total_issued: u64,
}

impl ShareRegister {
    pub fn unissued(&self) -> u64 {
        self.total_authorized.saturating_sub(self.total_issued)
    }

    fn founding(total_issued: u64) -> Self {
        ShareRegister {
            holdings: vec![
                ShareHolding {
                    name: "Domenico".into(),
                    shares: 5_000_000,
                },
                ShareHolding {
                    name: "Michael".into(),
                    shares: 5_000_000,
                },
                ShareHolding {
                    name: "Investors".into(),
                    shares: 1_190_476,
                },
                ShareHolding {
                    name: "Employees".into(),
                    shares: 714_286,
                },
            ],
            total_authorized: 11_904_762,
            total_issued,
        }
    }
}

// ─── Milestones ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneStage {
    pub title: String,
    /// Customer count at which the stage is reached.
    pub customers: u64,
    pub shares: ShareRegister,
}

/// The five stages from incorporation to the investment round.
///
/// Only founder voting shares are issued until the investment round, when
/// the reserved investor and employee pools are issued too.
pub fn standard_milestones() -> Vec<MilestoneStage> {
    let founders_only = 10_000_000;
    let stages = [
        ("Foundation: 42/42/10/6 Structure", 0, founders_only),
        ("KPI Target: 50 Customers", 50, founders_only),
        ("Salary Unlocked: Growth Phase", 150, founders_only),
        ("Scale Phase: Investment Ready", 400, founders_only),
        ("Investment Round: Full Structure", 1000, 11_904_762),
    ];
    stages
        .into_iter()
        .map(|(title, customers, issued)| MilestoneStage {
            title: title.to_string(),
            customers,
            shares: ShareRegister::founding(issued),
        })
        .collect()
}

/// Index of the last stage whose threshold `customer_count` has reached.
pub fn stage_index_for(stages: &[MilestoneStage], customer_count: u64) -> EquityModelResult<usize> {
    stages
        .iter()
        .rposition(|s| s.customers <= customer_count)
        .ok_or_else(|| {
            EquityModelError::Configuration(format!(
                "no milestone stage covers {customer_count} customers"
            ))
        })
}

pub fn stage_for_customers(
    stages: &[MilestoneStage],
    customer_count: u64,
) -> EquityModelResult<&MilestoneStage> {
    let idx = stage_index_for(stages, customer_count)?;
    Ok(&stages[idx])
}

// ─── Investor pool ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrancheStatus {
    Reserved,
    Available,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolTranche {
    pub stage: String,
    pub shares: u64,
    pub status: TrancheStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorPool {
    pub tranches: Vec<PoolTranche>,
    /// Shares released per milestone stage passed.
    pub release_per_stage: u64,
}

impl Default for InvestorPool {
    fn default() -> Self {
        InvestorPool {
            tranches: vec![
                PoolTranche {
                    stage: "Pre-Investment".into(),
                    shares: 1_000_000,
                    status: TrancheStatus::Reserved,
                },
                PoolTranche {
                    stage: "Seed Round".into(),
                    shares: 500_000,
                    status: TrancheStatus::Available,
                },
                PoolTranche {
                    stage: "Series A".into(),
                    shares: 500_000,
                    status: TrancheStatus::Available,
                },
            ],
            release_per_stage: 500_000,
        }
    }
}

impl InvestorPool {
    /// Saturates at `u64::MAX`, like [`InvestorPool::allocated_at`].
    pub fn total_shares(&self) -> u64 {
        self.tranches
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.shares))
    }

    /// Pool shares allocated once `stage_index` stages have been passed.
    pub fn allocated_at(&self, stage_index: usize) -> u64 {
        (stage_index as u64)
            .saturating_mul(self.release_per_stage)
            .min(self.total_shares())
    }
}
