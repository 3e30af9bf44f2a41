//! # Boundary Parser - Strings and JSON to Typed Pool Inputs
//!
//! ## Purpose
//!
//! Turns the string-typed boundary contract into the core's validated types
//! before any math runs. Every malformed input is reported as a
//! `ParseError` carrying the offending text; nothing is coerced, trimmed or
//! defaulted.
//!
//! ## Accepted Formats
//!
//! - **Integers**: base-10 ASCII digits, arbitrarily long (`"1000000000000"`)
//! - **Fees**: decimal fractions in `[0, 1)` with at most six fractional
//!   digits (`"0"`, `"0.003"`, `"0.0004"`), parsed exactly through
//!   `rust_decimal`
//! - **Reserves**: `[{"asset_id": 0, "amount": "<digits>", "decimals": 12}, …]`
//! - **Deposits**: `[{"asset_id": 0, "amount": "<digits>"}, …]`
//!
//! JSON amounts may also be plain unsigned integers that fit in 64 bits.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use stableswap_amm::{
    parse_balance, Amplification, AssetAmount, AssetReserve, Balance, FeeRate, PoolBalances,
    StableSwapError, FEE_DENOMINATOR,
};
use tracing::debug;

type Result<T> = std::result::Result<T, StableSwapError>;

/// Maximum fractional digits a fee string may carry (parts per million)
pub const FEE_SCALE: u32 = 6;

/// Amount field that accepts a digit string or a JSON integer
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Digits(String),
    Integer(u64),
}

impl WireAmount {
    fn into_balance(self) -> Result<Balance> {
        match self {
            WireAmount::Digits(text) => parse_balance(&text),
            WireAmount::Integer(value) => Ok(Balance::from(value)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireReserve {
    asset_id: u32,
    amount: WireAmount,
    decimals: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireDeposit {
    asset_id: u32,
    amount: WireAmount,
}

fn from_json<'a, T: Deserialize<'a>>(input: &'a str) -> Result<T> {
    serde_json::from_str(input).map_err(|e| StableSwapError::parse(input, e.to_string()))
}

/// Parse a non-negative integer amount
pub fn parse_amount(input: &str) -> Result<Balance> {
    parse_balance(input)
}

/// Parse a positive amplification coefficient
pub fn parse_amplification(input: &str) -> Result<Amplification> {
    Amplification::new(parse_balance(input)?)
}

/// Parse a block height
pub fn parse_block(input: &str) -> Result<u64> {
    let value = parse_balance(input)?;
    u64::try_from(&value).map_err(|_| StableSwapError::parse(input, "block number exceeds u64"))
}

/// Parse a decimal fee fraction into parts per million
///
/// Exact decimal parsing, so `"0.003"` is 3000 ppm with no binary rounding.
pub fn parse_fee(input: &str) -> Result<FeeRate> {
    if !input
        .bytes()
        .all(|b| b.is_ascii_digit() || b == b'.' || b == b'-')
    {
        return Err(StableSwapError::parse(input, "not a decimal fraction"));
    }

    let fee = Decimal::from_str_exact(input)
        .map_err(|e| StableSwapError::parse(input, format!("not a decimal fraction: {e}")))?;

    if fee.is_sign_negative() && !fee.is_zero() {
        return Err(StableSwapError::parse(input, "fee is negative"));
    }
    if fee >= Decimal::ONE {
        return Err(StableSwapError::parse(input, "fee must be below 1"));
    }
    if fee.normalize().scale() > FEE_SCALE {
        return Err(StableSwapError::parse(
            input,
            format!("fee has more than {FEE_SCALE} fractional digits"),
        ));
    }

    let ppm = (fee.abs() * Decimal::from(FEE_DENOMINATOR))
        .to_u32()
        .ok_or_else(|| StableSwapError::parse(input, "fee out of range"))?;
    FeeRate::from_ppm(ppm)
}

/// Decode the pool reserves JSON into validated balances, keeping the given order
pub fn parse_reserves(input: &str) -> Result<PoolBalances> {
    let wire: Vec<WireReserve> = from_json(input)?;
    let reserves = wire
        .into_iter()
        .map(|r| Ok(AssetReserve::new(r.asset_id, r.amount.into_balance()?, r.decimals)))
        .collect::<Result<Vec<_>>>()?;

    let balances = PoolBalances::new(reserves)?;
    debug!("Decoded pool with {} assets", balances.len());
    Ok(balances)
}

/// Decode the deposits JSON
///
/// Asset membership and duplicates are checked by the share calculator.
pub fn parse_deposits(input: &str) -> Result<Vec<AssetAmount>> {
    let wire: Vec<WireDeposit> = from_json(input)?;
    wire.into_iter()
        .map(|d| Ok(AssetAmount::new(d.asset_id, d.amount.into_balance()?)))
        .collect()
}
