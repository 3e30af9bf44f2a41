//! Fee model
//!
//! Rates are integers in parts per million (pips), so `3000` is 0.3%. Trade
//! fees come out of the swap output; imbalance fees come out of the balances
//! used to value a deposit or withdrawal that deviates from the pool's
//! current composition.

use crate::arithmetic::{
    abs_diff, checked_div_ceil, checked_sub, mul_div_ceil, mul_div_floor, Balance,
};
use crate::error::{Result, StableSwapError};
use crate::precision::Rounding;

/// Denominator of every fee rate
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Fee rate in parts per million, constrained to `[0, 1_000_000)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FeeRate(u32);

impl FeeRate {
    pub const ZERO: FeeRate = FeeRate(0);

    pub fn from_ppm(ppm: u32) -> Result<Self> {
        if ppm >= FEE_DENOMINATOR {
            return Err(StableSwapError::InvalidFee {
                ppm,
                max: FEE_DENOMINATOR,
            });
        }
        Ok(Self(ppm))
    }

    pub fn ppm(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Trade amount split into what the trader keeps and what the pool keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeFee {
    pub net: Balance,
    pub fee: Balance,
}

/// `fee = floor(amount · rate)`, `net = amount − fee`
pub fn apply_trade_fee(amount: &Balance, rate: FeeRate) -> Result<TradeFee> {
    let fee = mul_div_floor(
        amount,
        &Balance::from(rate.ppm()),
        &Balance::from(FEE_DENOMINATOR),
        "trade fee",
    )?;
    let net = checked_sub(amount, &fee, "trade fee")?;
    Ok(TradeFee { net, fee })
}

/// Gross amount whose trade-fee net still covers `net`
///
/// `gross = ceil(net / (1 − rate))`, the inverse of [`apply_trade_fee`] used
/// by exact-output swaps.
pub fn gross_up(net: &Balance, rate: FeeRate) -> Result<Balance> {
    let keep = Balance::from(FEE_DENOMINATOR - rate.ppm());
    checked_div_ceil(&(net * Balance::from(FEE_DENOMINATOR)), &keep, "fee gross-up")
}

/// Fee charged on the deviation between an actual and an ideal balance
///
/// The effective rate is `rate · n / (4·(n − 1))`, which equals `rate / 2`
/// for a two-asset pool and approaches `rate / 4` as the pool grows.
pub fn imbalance_fee(
    actual: &Balance,
    ideal: &Balance,
    rate: FeeRate,
    n_assets: usize,
    rounding: Rounding,
) -> Result<Balance> {
    if rate.is_zero() {
        return Ok(Balance::default());
    }
    if n_assets < 2 {
        return Err(StableSwapError::InvalidAssetCount { count: n_assets });
    }

    let deviation = abs_diff(actual, ideal);
    let numerator = Balance::from(rate.ppm()) * Balance::from(n_assets);
    let denominator = Balance::from(FEE_DENOMINATOR) * Balance::from(4 * (n_assets - 1));

    match rounding {
        Rounding::Down => mul_div_floor(&deviation, &numerator, &denominator, "imbalance fee"),
        Rounding::Up => mul_div_ceil(&deviation, &numerator, &denominator, "imbalance fee"),
    }
}
