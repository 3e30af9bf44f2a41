//! Error taxonomy for the StableSwap math core
//!
//! Every public operation returns one of these variants instead of panicking
//! or substituting an approximate value. Variants carry enough context to tell
//! which input was rejected and why.

use thiserror::Error;

/// Failures produced by the arithmetic core and the codec boundary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StableSwapError {
    /// Numeric or JSON input could not be parsed
    #[error("Parse error: '{input}' ({reason})")]
    ParseError { input: String, reason: String },

    /// Asset decimal count exceeds the internal precision
    #[error("Invalid decimals: asset uses {decimals} decimals, internal precision is {max}")]
    InvalidDecimals { decimals: u8, max: u8 },

    /// Swap or deposit index is out of range or otherwise unusable
    #[error("Invalid asset index {index}: {reason}")]
    InvalidIndex { index: usize, reason: String },

    /// Asset identifier is not part of the pool
    #[error("Asset {asset_id} not found in pool")]
    AssetNotFound { asset_id: u32 },

    /// Two pool entries share the same asset identifier
    #[error("Duplicate asset {asset_id} in pool balances")]
    DuplicateAsset { asset_id: u32 },

    /// Pool has fewer than two assets
    #[error("Pool needs at least 2 assets, got {count}")]
    InvalidAssetCount { count: usize },

    /// Negative, zero-effect or otherwise unusable amount
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Amplification coefficient must be positive
    #[error("Invalid amplification: {reason}")]
    InvalidAmplification { reason: String },

    /// Fee rate outside [0, 1)
    #[error("Invalid fee rate: {ppm} ppm (must be below {max} ppm)")]
    InvalidFee { ppm: u32, max: u32 },

    /// Solved balance would be zero or the trade drains the pool
    #[error("Insufficient liquidity: {context}")]
    InsufficientLiquidity { context: String },

    /// Newton iteration exceeded its cap
    #[error("Newton iteration for {quantity} did not converge within {iterations} iterations")]
    ConvergenceFailure {
        quantity: &'static str,
        iterations: u8,
    },

    /// Division with a zero divisor
    #[error("Division by zero in {context}")]
    DivisionByZero { context: &'static str },

    /// Subtraction would produce a negative value
    #[error("Underflow in {context}")]
    Underflow { context: &'static str },
}

impl StableSwapError {
    pub(crate) fn insufficient_liquidity(context: impl Into<String>) -> Self {
        Self::InsufficientLiquidity {
            context: context.into(),
        }
    }

    pub(crate) fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_index(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidIndex {
            index,
            reason: reason.into(),
        }
    }

    /// Build a parse error for `input`
    pub fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::ParseError {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StableSwapError>;
