use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::catalog::PlanId;
use crate::error::EquityModelError;
use crate::types::{round_half_up, Percent};
use crate::EquityModelResult;

/// Percentage split of the customer base across the three plans.
///
/// The segments are expected to sum to 100 but nothing here enforces it: the
/// revenue split gives the corporate segment whatever the first two leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionMix {
    pub base: Percent,
    pub premium: Percent,
    pub corporate: Percent,
}

impl Default for SubscriptionMix {
    /// 30% base, 60% premium, 10% corporate.
    fn default() -> Self {
        SubscriptionMix {
            base: dec!(30),
            premium: dec!(60),
            corporate: dec!(10),
        }
    }
}

impl SubscriptionMix {
    pub fn new(base: Percent, premium: Percent, corporate: Percent) -> Self {
        SubscriptionMix {
            base,
            premium,
            corporate,
        }
    }

    /// Everyone on a single plan.
    pub fn single(plan: PlanId) -> Self {
        let mut mix = SubscriptionMix::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        mix.set(plan, dec!(100));
        mix
    }

    pub fn get(&self, plan: PlanId) -> Percent {
        match plan {
            PlanId::Base => self.base,
            PlanId::Premium => self.premium,
            PlanId::Corporate => self.corporate,
        }
    }

    fn set(&mut self, plan: PlanId, pct: Percent) {
        match plan {
            PlanId::Base => self.base = pct,
            PlanId::Premium => self.premium = pct,
            PlanId::Corporate => self.corporate = pct,
        }
    }

    pub fn total(&self) -> Percent {
        self.base + self.premium + self.corporate
    }

    pub fn is_balanced(&self) -> bool {
        self.total() == dec!(100)
    }

    /// Every segment must be a percentage in `[0, 100]`. The total is not checked.
    pub fn validate(&self) -> EquityModelResult<()> {
        for plan in PlanId::ALL {
            let pct = self.get(plan);
            if pct < Decimal::ZERO || pct > dec!(100) {
                return Err(EquityModelError::invalid(
                    format!("mix.{plan}"),
                    format!("Mix percentage must be in [0, 100], got {pct}"),
                ));
            }
        }
        Ok(())
    }

    /// Move one plan's slider to `new_pct` and redistribute the rest.
    ///
    /// The other two plans share `100 - new_pct` in proportion to their
    /// current weights, each rounded to a whole percent on its own. If both
    /// are currently at zero the remainder is split evenly, the first of the
    /// two (in plan order) taking the rounded half.
    pub fn rebalance(&self, plan: PlanId, new_pct: Percent) -> EquityModelResult<SubscriptionMix> {
        if new_pct < Decimal::ZERO || new_pct > dec!(100) {
            return Err(EquityModelError::invalid(
                format!("mix.{plan}"),
                format!("Mix percentage must be in [0, 100], got {new_pct}"),
            ));
        }

        let (first, second) = match plan {
            PlanId::Base => (PlanId::Premium, PlanId::Corporate),
            PlanId::Premium => (PlanId::Base, PlanId::Corporate),
            PlanId::Corporate => (PlanId::Base, PlanId::Premium),
        };

        let remaining = dec!(100) - new_pct;
        let current_total = self.get(first) + self.get(second);

        let mut next = *self;
        next.set(plan, new_pct);
        if current_total.is_zero() {
            let half = round_half_up(remaining / dec!(2));
            next.set(first, half);
            next.set(second, remaining - half);
        } else {
            let ratio = self.get(first) / current_total;
            next.set(first, round_half_up(remaining * ratio));
            next.set(second, round_half_up(remaining * (Decimal::ONE - ratio)));
        }
        Ok(next)
    }
}
