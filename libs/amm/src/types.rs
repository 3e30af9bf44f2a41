//! Pool input types
//!
//! Everything here is built fresh from caller input on each call and dropped
//! on return; nothing is cached between calls.

use std::collections::HashSet;

use num_traits::Zero;

use crate::arithmetic::Balance;
use crate::error::{Result, StableSwapError};
use crate::precision::{normalize, TARGET_PRECISION};

/// One pool asset: identifier, native amount and native decimal count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReserve {
    pub asset_id: u32,
    pub amount: Balance,
    pub decimals: u8,
}

impl AssetReserve {
    pub fn new(asset_id: u32, amount: impl Into<Balance>, decimals: u8) -> Self {
        Self {
            asset_id,
            amount: amount.into(),
            decimals,
        }
    }
}

/// Amount of one asset supplied to a deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetAmount {
    pub asset_id: u32,
    pub amount: Balance,
}

impl AssetAmount {
    pub fn new(asset_id: u32, amount: impl Into<Balance>) -> Self {
        Self {
            asset_id,
            amount: amount.into(),
        }
    }
}

/// Validated, ordered snapshot of every pool reserve
///
/// Order defines the swap and deposit indices. Construction rejects pools
/// with fewer than two assets, repeated asset identifiers and decimal counts
/// above the internal precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolBalances {
    reserves: Vec<AssetReserve>,
}

impl PoolBalances {
    pub fn new(reserves: Vec<AssetReserve>) -> Result<Self> {
        if reserves.len() < 2 {
            return Err(StableSwapError::InvalidAssetCount {
                count: reserves.len(),
            });
        }

        let mut seen = HashSet::with_capacity(reserves.len());
        for reserve in &reserves {
            if !seen.insert(reserve.asset_id) {
                return Err(StableSwapError::DuplicateAsset {
                    asset_id: reserve.asset_id,
                });
            }
            if reserve.decimals > TARGET_PRECISION {
                return Err(StableSwapError::InvalidDecimals {
                    decimals: reserve.decimals,
                    max: TARGET_PRECISION,
                });
            }
        }

        Ok(Self { reserves })
    }

    pub fn len(&self) -> usize {
        self.reserves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserves.is_empty()
    }

    pub fn reserves(&self) -> &[AssetReserve] {
        &self.reserves
    }

    pub fn get(&self, index: usize) -> Result<&AssetReserve> {
        self.reserves.get(index).ok_or_else(|| {
            StableSwapError::invalid_index(
                index,
                format!("pool has {} assets", self.reserves.len()),
            )
        })
    }

    /// Position of `asset_id` in the pool order
    pub fn index_of(&self, asset_id: u32) -> Result<usize> {
        self.reserves
            .iter()
            .position(|r| r.asset_id == asset_id)
            .ok_or(StableSwapError::AssetNotFound { asset_id })
    }

    /// Every reserve scaled to internal precision, in pool order
    pub fn normalized(&self) -> Result<Vec<Balance>> {
        self.reserves
            .iter()
            .map(|r| normalize(&r.amount, r.decimals))
            .collect()
    }
}

/// Amplification coefficient in the pre-multiplied `A·n^(n-1)` convention
///
/// The solver's leverage term is `Ann = amplification · n`, i.e. `A·n^n` in
/// whitepaper notation. Zero is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amplification(Balance);

impl Amplification {
    pub fn new(value: impl Into<Balance>) -> Result<Self> {
        let value = value.into();
        if value.is_zero() {
            return Err(StableSwapError::InvalidAmplification {
                reason: "amplification must be positive".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &Balance {
        &self.0
    }

    /// `Ann = amplification · n`
    pub fn leverage(&self, n_assets: usize) -> Balance {
        &self.0 * Balance::from(n_assets)
    }
}
