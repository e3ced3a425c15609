use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use equity_model_core::pricing::{PlanId, PricingCatalog, SubscriptionMix};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn pricing_catalog() -> NapiResult<String> {
    serde_json::to_string(&PricingCatalog::standard()).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct RebalanceInput {
    #[serde(default)]
    mix: SubscriptionMix,
    plan: PlanId,
    percent: Decimal,
}

#[napi]
pub fn rebalance_mix(input_json: String) -> NapiResult<String> {
    let input: RebalanceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = input
        .mix
        .rebalance(input.plan, input.percent)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Revenue & valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_revenue(input_json: String) -> NapiResult<String> {
    let input: equity_model_core::revenue::calculator::RevenueInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = equity_model_core::revenue::calculator::calculate_revenue(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_valuation(input_json: String) -> NapiResult<String> {
    let input: equity_model_core::valuation::growth::ValuationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = equity_model_core::valuation::growth::calculate_valuation(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sweep_valuation(input_json: String) -> NapiResult<String> {
    let input: equity_model_core::scenarios::ValuationSweepInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        equity_model_core::scenarios::sweep_valuation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cashflow
// ---------------------------------------------------------------------------

#[napi]
pub fn project_cashflow(input_json: String) -> NapiResult<String> {
    let input: equity_model_core::cashflow::timeline::CashflowInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = equity_model_core::cashflow::timeline::project_cashflow(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Equity
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_distribution(input_json: String) -> NapiResult<String> {
    let input: equity_model_core::equity::distribution::DistributionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = equity_model_core::equity::distribution::calculate_distribution(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn assess_leaver(input_json: String) -> NapiResult<String> {
    let input: equity_model_core::leaver::LeaverInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = equity_model_core::leaver::assess_leaver(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[napi]
pub fn build_snapshot(input_json: String) -> NapiResult<String> {
    let input: equity_model_core::snapshot::SnapshotInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        equity_model_core::snapshot::build_snapshot(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
