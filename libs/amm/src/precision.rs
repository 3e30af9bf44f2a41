//! Precision normalization between native asset decimals and internal precision
//!
//! Pool assets carry their own decimal counts (6 for USDC-style tokens, 12 or
//! 18 for others). The solver only ever sees amounts rescaled to a single
//! internal precision of [`TARGET_PRECISION`] decimals, and results are scaled
//! back to the asset's native precision on the way out.
//!
//! ## Critical Rules
//!
//! 1. **Strict on the way in**: an asset with more decimals than the internal
//!    precision is rejected with `InvalidDecimals`, never silently truncated
//! 2. **Floor on the way out**: outputs round toward the asset's native
//!    precision in the pool's favor
//! 3. **Lossy round trip**: `normalize(denormalize(x)) <= x`. Denormalizing
//!    drops every digit below the native precision; this is expected
//!
//! ```rust
//! use stableswap_amm::precision::{denormalize, normalize};
//! use stableswap_amm::Balance;
//!
//! // 1.5 units of a 6-decimal asset
//! let internal = normalize(&Balance::from(1_500_000u32), 6).unwrap();
//! assert_eq!(internal, Balance::from(1_500_000_000_000_000_000u128));
//!
//! // Sub-native digits are dropped on the way back
//! let back = denormalize(&(internal + 999u32), 6).unwrap();
//! assert_eq!(back, Balance::from(1_500_000u32));
//! ```

use crate::arithmetic::{checked_div, checked_div_ceil, pow10, Balance};
use crate::error::{Result, StableSwapError};

/// Internal fixed precision shared by every component
pub const TARGET_PRECISION: u8 = 18;

/// Direction used when scaling to a coarser precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// Rescale `amount` from `from` decimals to `to` decimals
///
/// Scaling up is exact. Scaling down divides by the power of ten and rounds
/// in the requested direction.
pub fn rescale(amount: &Balance, from: u8, to: u8, rounding: Rounding) -> Result<Balance> {
    match from.cmp(&to) {
        std::cmp::Ordering::Equal => Ok(amount.clone()),
        std::cmp::Ordering::Less => Ok(amount * pow10(u32::from(to - from))),
        std::cmp::Ordering::Greater => {
            let factor = pow10(u32::from(from - to));
            match rounding {
                Rounding::Down => checked_div(amount, &factor, "rescale"),
                Rounding::Up => checked_div_ceil(amount, &factor, "rescale"),
            }
        }
    }
}

fn check_decimals(decimals: u8) -> Result<()> {
    if decimals > TARGET_PRECISION {
        return Err(StableSwapError::InvalidDecimals {
            decimals,
            max: TARGET_PRECISION,
        });
    }
    Ok(())
}

/// Scale a native amount up to internal precision
pub fn normalize(amount: &Balance, decimals: u8) -> Result<Balance> {
    check_decimals(decimals)?;
    rescale(amount, decimals, TARGET_PRECISION, Rounding::Down)
}

/// Scale an internal amount down to native precision, rounding down
pub fn denormalize(amount: &Balance, decimals: u8) -> Result<Balance> {
    check_decimals(decimals)?;
    rescale(amount, TARGET_PRECISION, decimals, Rounding::Down)
}

/// Scale an internal amount down to native precision, rounding up
///
/// Only for amounts the caller has to pay in (required swap input, single
/// asset deposits), so rounding never works against the pool.
pub fn denormalize_up(amount: &Balance, decimals: u8) -> Result<Balance> {
    check_decimals(decimals)?;
    rescale(amount, TARGET_PRECISION, decimals, Rounding::Up)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(value: u128) -> Balance {
        Balance::from(value)
    }

    #[test]
    fn test_normalize_scales_up() {
        assert_eq!(normalize(&b(1_000_000), 6).unwrap(), b(1_000_000_000_000_000_000));
        assert_eq!(normalize(&b(42), 18).unwrap(), b(42));
        assert_eq!(normalize(&b(1), 0).unwrap(), pow10(18));
    }

    #[test]
    fn test_normalize_rejects_excess_decimals() {
        let err = normalize(&b(1), 24).unwrap_err();
        assert_eq!(
            err,
            StableSwapError::InvalidDecimals {
                decimals: 24,
                max: 18
            }
        );
        assert!(denormalize(&b(1), 19).is_err());
    }

    #[test]
    fn test_denormalize_floors_and_ceils() {
        let internal = b(1_234_567_890_123_456_789);
        assert_eq!(denormalize(&internal, 6).unwrap(), b(1_234_567));
        assert_eq!(denormalize_up(&internal, 6).unwrap(), b(1_234_568));

        // Exact values are not bumped by the ceiling
        let exact = b(5_000_000_000_000);
        assert_eq!(denormalize_up(&exact, 12).unwrap(), b(5_000_000));
        assert_eq!(denormalize_up(&b(5_000_000_000_001), 12).unwrap(), b(5_000_001));
    }

    #[test]
    fn test_round_trip_is_lossy_only_downwards() {
        let native = b(987_654_321);
        let internal = normalize(&native, 12).unwrap();
        assert_eq!(denormalize(&internal, 12).unwrap(), native);

        let noisy = internal + 999_999u32;
        let back = normalize(&denormalize(&noisy, 12).unwrap(), 12).unwrap();
        assert!(back <= noisy);
        assert_eq!(&noisy - &back, b(999_999));
    }

    #[test]
    fn test_rescale_between_arbitrary_precisions() {
        assert_eq!(rescale(&b(1_999), 3, 0, Rounding::Down).unwrap(), b(1));
        assert_eq!(rescale(&b(1_999), 3, 0, Rounding::Up).unwrap(), b(2));
        assert_eq!(rescale(&b(7), 2, 5, Rounding::Down).unwrap(), b(7_000));
    }
}
