//! Arbitrary-precision integer arithmetic
//!
//! Every quantity in the solver is a non-negative integer that can grow well
//! past 128 bits in intermediate products (D^(n+1) for n assets), so the core
//! works on [`BigUint`] throughout. The helpers here add the guards the
//! formulas rely on: subtraction that reports `Underflow` instead of
//! panicking, division that reports `DivisionByZero`, and explicit floor or
//! ceiling variants wherever a formula rounds.
//!
//! ## Rounding Rules
//!
//! 1. **Floor by default**: plain division truncates toward zero
//! 2. **Ceiling only on purpose**: amounts a caller must pay round up
//! 3. **No floating point**: parsing and formatting are pure integer code

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Result, StableSwapError};

/// Token amounts, invariant values and share counts
pub type Balance = BigUint;

/// Parse a strict base-10 integer string into a [`Balance`]
///
/// Accepts ASCII digits only: no sign, decimal point, exponent, separators
/// or surrounding whitespace. A leading `-` in front of otherwise valid
/// digits is reported as a negative amount rather than a syntax error.
pub fn parse_balance(input: &str) -> Result<Balance> {
    if input.is_empty() {
        return Err(StableSwapError::parse(input, "empty string"));
    }

    if let Some(rest) = input.strip_prefix('-') {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StableSwapError::invalid_amount(format!(
                "negative amount {input}"
            )));
        }
    }

    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StableSwapError::parse(input, "not a base-10 integer"));
    }

    BigUint::parse_bytes(input.as_bytes(), 10)
        .ok_or_else(|| StableSwapError::parse(input, "not a base-10 integer"))
}

/// `a - b`, failing with `Underflow` when `b > a`
pub fn checked_sub(a: &Balance, b: &Balance, context: &'static str) -> Result<Balance> {
    if b > a {
        return Err(StableSwapError::Underflow { context });
    }
    Ok(a - b)
}

/// `floor(a / b)`, failing with `DivisionByZero` when `b == 0`
pub fn checked_div(a: &Balance, b: &Balance, context: &'static str) -> Result<Balance> {
    if b.is_zero() {
        return Err(StableSwapError::DivisionByZero { context });
    }
    Ok(a / b)
}

/// `ceil(a / b)`, failing with `DivisionByZero` when `b == 0`
pub fn checked_div_ceil(a: &Balance, b: &Balance, context: &'static str) -> Result<Balance> {
    if b.is_zero() {
        return Err(StableSwapError::DivisionByZero { context });
    }
    let quotient = a / b;
    if (&quotient * b) == *a {
        Ok(quotient)
    } else {
        Ok(quotient + 1u32)
    }
}

/// `floor(a * b / c)` without intermediate truncation
pub fn mul_div_floor(
    a: &Balance,
    b: &Balance,
    c: &Balance,
    context: &'static str,
) -> Result<Balance> {
    checked_div(&(a * b), c, context)
}

/// `ceil(a * b / c)` without intermediate truncation
pub fn mul_div_ceil(
    a: &Balance,
    b: &Balance,
    c: &Balance,
    context: &'static str,
) -> Result<Balance> {
    checked_div_ceil(&(a * b), c, context)
}

/// `|a - b|`
pub fn abs_diff(a: &Balance, b: &Balance) -> Balance {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Floor of the square root
///
/// Exported alongside the other helpers; the curve math itself does not call it.
pub fn isqrt(value: &Balance) -> Balance {
    value.sqrt()
}

/// `base^exponent`
pub fn pow(base: &Balance, exponent: u32) -> Balance {
    base.pow(exponent)
}

/// `10^exponent`, the scale factor between two decimal precisions
pub fn pow10(exponent: u32) -> Balance {
    if exponent == 0 {
        return Balance::one();
    }
    pow(&Balance::from(10u32), exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(value: u128) -> Balance {
        Balance::from(value)
    }

    #[test]
    fn test_parse_balance_accepts_digits() {
        assert_eq!(parse_balance("0").unwrap(), b(0));
        assert_eq!(parse_balance("007").unwrap(), b(7));

        // Beyond u128 range
        let big = parse_balance("1000000000000000000000000000000000000000000").unwrap();
        assert_eq!(big, pow10(42));
    }

    #[test]
    fn test_parse_balance_rejects_malformed() {
        for input in ["", " 1", "1 ", "1.5", "1e18", "+5", "0x10", "1_000", "abc", "-"] {
            let err = parse_balance(input).unwrap_err();
            assert!(
                matches!(err, StableSwapError::ParseError { .. }),
                "{input:?} should be a parse error, got {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_balance_negative_is_invalid_amount() {
        let err = parse_balance("-100").unwrap_err();
        assert!(matches!(err, StableSwapError::InvalidAmount { .. }));
    }

    #[test]
    fn test_checked_sub_underflow() {
        assert_eq!(checked_sub(&b(10), &b(3), "test").unwrap(), b(7));
        assert_eq!(checked_sub(&b(3), &b(3), "test").unwrap(), b(0));
        assert_eq!(
            checked_sub(&b(3), &b(10), "test"),
            Err(StableSwapError::Underflow { context: "test" })
        );
    }

    #[test]
    fn test_division_rounding() {
        assert_eq!(checked_div(&b(7), &b(2), "test").unwrap(), b(3));
        assert_eq!(checked_div_ceil(&b(7), &b(2), "test").unwrap(), b(4));
        assert_eq!(checked_div_ceil(&b(8), &b(2), "test").unwrap(), b(4));
        assert_eq!(checked_div_ceil(&b(0), &b(5), "test").unwrap(), b(0));
        assert_eq!(
            checked_div(&b(1), &b(0), "test"),
            Err(StableSwapError::DivisionByZero { context: "test" })
        );
        assert!(checked_div_ceil(&b(1), &b(0), "test").is_err());
    }

    #[test]
    fn test_mul_div_keeps_full_precision() {
        // (2^127 * 6) / 4 overflows u128 in the intermediate product
        let large = b(1u128 << 127);
        let result = mul_div_floor(&large, &b(6), &b(4), "test").unwrap();
        assert_eq!(result, b(3u128 << 126));
        assert_eq!(mul_div_ceil(&b(10), &b(1), &b(3), "test").unwrap(), b(4));
        assert_eq!(mul_div_floor(&b(10), &b(1), &b(3), "test").unwrap(), b(3));
    }

    #[test]
    fn test_isqrt_and_pow() {
        assert_eq!(isqrt(&b(0)), b(0));
        assert_eq!(isqrt(&b(15)), b(3));
        assert_eq!(isqrt(&b(16)), b(4));
        assert_eq!(isqrt(&pow10(36)), pow10(18));
        assert_eq!(pow(&b(3), 4), b(81));
        assert_eq!(pow10(0), b(1));
        assert_eq!(pow10(6), b(1_000_000));
    }

    #[test]
    fn test_abs_diff_is_symmetric() {
        assert_eq!(abs_diff(&b(5), &b(9)), b(4));
        assert_eq!(abs_diff(&b(9), &b(5)), b(4));
        assert_eq!(abs_diff(&b(9), &b(9)), b(0));
    }
}
