//! Leaver provisions: how much of a departing shareholder's stake they keep
//! and what the company pays for the rest.
//!
//! | Event        | Retained | Forfeited shares bought back at |
//! |--------------|----------|---------------------------------|
//! | Good         | 100%     | full market value               |
//! | Intermediate | 60%      | fair value                      |
//! | Bad          | 20%      | nominal value                   |

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EquityModelError;
use crate::types::{checked, with_metadata, ComputationOutput, Money, Percent};
use crate::EquityModelResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaverEvent {
    Good,
    Intermediate,
    Bad,
}

/// Price at which forfeited shares are bought back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationBasis {
    MarketValue,
    FairValue,
    NominalValue,
}

impl LeaverEvent {
    pub const ALL: [LeaverEvent; 3] = [LeaverEvent::Good, LeaverEvent::Intermediate, LeaverEvent::Bad];

    pub fn share_retention(&self) -> Percent {
        match self {
            LeaverEvent::Good => dec!(100),
            LeaverEvent::Intermediate => dec!(60),
            LeaverEvent::Bad => dec!(20),
        }
    }

    pub fn compensation_basis(&self) -> CompensationBasis {
        match self {
            LeaverEvent::Good => CompensationBasis::MarketValue,
            LeaverEvent::Intermediate => CompensationBasis::FairValue,
            LeaverEvent::Bad => CompensationBasis::NominalValue,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaverInput {
    pub event: LeaverEvent,
    pub shares_held: u64,
    pub market_value_per_share: Money,
    /// Independent valuer's price. Market value when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fair_value_per_share: Option<Money>,
    pub nominal_value_per_share: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaverOutcome {
    pub event: LeaverEvent,
    pub share_retention: Percent,
    pub retained_shares: u64,
    pub forfeited_shares: u64,
    pub compensation_basis: CompensationBasis,
    pub compensation_per_share: Money,
    /// Paid to the leaver for the forfeited shares.
    pub total_compensation: Money,
    /// Market value of the shares the leaver keeps.
    pub retained_value: Money,
}

fn validate(input: &LeaverInput) -> EquityModelResult<()> {
    let prices = [
        ("market_value_per_share", Some(input.market_value_per_share)),
        ("fair_value_per_share", input.fair_value_per_share),
        ("nominal_value_per_share", Some(input.nominal_value_per_share)),
    ];
    for (field, value) in prices {
        if let Some(v) = value {
            if v < Decimal::ZERO {
                return Err(EquityModelError::invalid(field, "Share price cannot be negative"));
            }
        }
    }
    Ok(())
}

/// Split a leaver's holding into retained and forfeited shares and price the buy-back.
///
/// Retained shares are rounded down, so a fractional share is always forfeited.
pub fn settle_leaver(input: &LeaverInput) -> EquityModelResult<LeaverOutcome> {
    validate(input)?;

    let retention = input.event.share_retention();
    let held = Decimal::from(input.shares_held);
    let retained_shares = (held * retention / dec!(100))
        .floor()
        .to_u64()
        .unwrap_or(input.shares_held)
        .min(input.shares_held);
    let forfeited_shares = input.shares_held - retained_shares;

    let basis = input.event.compensation_basis();
    let compensation_per_share = match basis {
        CompensationBasis::MarketValue => input.market_value_per_share,
        CompensationBasis::FairValue => input
            .fair_value_per_share
            .unwrap_or(input.market_value_per_share),
        CompensationBasis::NominalValue => input.nominal_value_per_share,
    };

    let total_compensation = checked(
        Decimal::from(forfeited_shares).checked_mul(compensation_per_share),
        "shares_held",
    )?;
    let retained_value = checked(
        Decimal::from(retained_shares).checked_mul(input.market_value_per_share),
        "market_value_per_share",
    )?;

    Ok(LeaverOutcome {
        event: input.event,
        share_retention: retention,
        retained_shares,
        forfeited_shares,
        compensation_basis: basis,
        compensation_per_share,
        total_compensation,
        retained_value,
    })
}

/// Settle a leaver event and wrap it in the standard envelope.
pub fn assess_leaver(input: &LeaverInput) -> EquityModelResult<ComputationOutput<LeaverOutcome>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let outcome = settle_leaver(input)?;
    if input.event == LeaverEvent::Intermediate && input.fair_value_per_share.is_none() {
        warnings.push("No fair value supplied; forfeited shares priced at market value".into());
    }
    if input.nominal_value_per_share > input.market_value_per_share {
        warnings.push("Nominal value exceeds market value".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Leaver share retention with buy-back of forfeited shares",
        &serde_json::json!({
            "event": input.event,
            "share_retention": outcome.share_retention.to_string(),
            "compensation_basis": outcome.compensation_basis,
        }),
        warnings,
        elapsed,
        outcome,
    ))
}
