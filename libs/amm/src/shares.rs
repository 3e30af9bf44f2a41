//! Liquidity share accounting
//!
//! Shares are priced off the invariant: a deposit that moves `D` from `D0` to
//! `D2` mints `total_shares · (D2 − D0) / D0`. Deposits and withdrawals that
//! shift the pool away from its current composition pay the imbalance fee
//! on every asset's deviation from the proportional ("ideal") balance before
//! `D2` is computed.
//!
//! Share amounts are pool-level units and are never denormalized.

use num_traits::Zero;
use tracing::debug;

use crate::arithmetic::{checked_div, checked_sub, mul_div_ceil, mul_div_floor, Balance};
use crate::error::{Result, StableSwapError};
use crate::fee::{imbalance_fee, FeeRate};
use crate::invariant::InvariantSolver;
use crate::precision::{denormalize, denormalize_up, normalize, Rounding};
use crate::types::{Amplification, AssetAmount, PoolBalances};

/// Native amount a provider deposits for a requested share amount, and the
/// imbalance fee included in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleAssetDeposit {
    pub amount: Balance,
    pub fee: Balance,
}

/// Share issuance and redemption against the invariant
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareCalculator {
    solver: InvariantSolver,
}

impl ShareCalculator {
    pub fn new(solver: InvariantSolver) -> Self {
        Self { solver }
    }

    /// Shares minted for depositing `deposits` into the pool
    ///
    /// Assets missing from `deposits` contribute zero. The first deposit into
    /// an empty pool (`total_shares = 0`) mints exactly the post-deposit
    /// invariant and pays no fee.
    pub fn calculate_shares(
        &self,
        balances: &PoolBalances,
        deposits: &[AssetAmount],
        amplification: &Amplification,
        total_shares: &Balance,
        fee: FeeRate,
    ) -> Result<Balance> {
        let added = deposit_vector(balances, deposits)?;
        let xp = balances.normalized()?;
        let updated: Vec<Balance> = xp.iter().zip(&added).map(|(x, a)| x + a).collect();

        let d0 = self.solver.compute_d(&xp, amplification)?;
        let d1 = self.solver.compute_d(&updated, amplification)?;
        if d1 < d0 {
            return Err(StableSwapError::invalid_amount(
                "deposit decreases the invariant",
            ));
        }

        if total_shares.is_zero() {
            debug!(shares = %d1, "initial deposit");
            return Ok(d1);
        }
        if d1 == d0 {
            return Err(StableSwapError::invalid_amount(
                "deposit does not increase the invariant",
            ));
        }

        let adjusted = charge_imbalance(&xp, &updated, &d0, &d1, fee, Rounding::Down)?;
        let d2 = self.solver.compute_d(&adjusted, amplification)?;
        if d2 <= d0 {
            return Err(StableSwapError::invalid_amount(
                "deposit does not cover the imbalance fee",
            ));
        }

        let shares = mul_div_floor(total_shares, &(&d2 - &d0), &d0, "share issuance")?;
        debug!(
            assets = deposits.len(),
            shares = %shares,
            "shares for deposit"
        );
        Ok(shares)
    }

    /// Shares to burn for withdrawing exactly `amount` of one asset
    pub fn calculate_shares_for_amount(
        &self,
        balances: &PoolBalances,
        asset_index: usize,
        amount: &Balance,
        amplification: &Amplification,
        total_shares: &Balance,
        fee: FeeRate,
    ) -> Result<Balance> {
        let decimals = balances.get(asset_index)?.decimals;
        if amount.is_zero() {
            return Err(StableSwapError::invalid_amount("withdrawal amount is zero"));
        }
        if total_shares.is_zero() {
            return Err(StableSwapError::invalid_amount("pool has no shares issued"));
        }

        let xp = balances.normalized()?;
        let amount = normalize(amount, decimals)?;
        if amount >= xp[asset_index] {
            return Err(StableSwapError::insufficient_liquidity(
                "withdrawal drains the asset",
            ));
        }

        let mut updated = xp.clone();
        updated[asset_index] -= &amount;

        let d0 = self.solver.compute_d(&xp, amplification)?;
        let d1 = self.solver.compute_d(&updated, amplification)?;
        let adjusted = charge_imbalance(&xp, &updated, &d0, &d1, fee, Rounding::Up)?;
        let d2 = self.solver.compute_d(&adjusted, amplification)?;
        if d2 >= d0 {
            return Err(StableSwapError::invalid_amount(
                "withdrawal does not decrease the invariant",
            ));
        }

        let shares = mul_div_ceil(total_shares, &(&d0 - &d2), &d0, "share redemption")?;
        debug!(asset_index, shares = %shares, "shares for withdrawal");
        Ok(shares)
    }

    /// Amount of one asset to deposit in order to mint exactly `shares`
    pub fn calculate_add_one_asset(
        &self,
        balances: &PoolBalances,
        shares: &Balance,
        asset_index: usize,
        amplification: &Amplification,
        total_shares: &Balance,
        fee: FeeRate,
    ) -> Result<SingleAssetDeposit> {
        let decimals = balances.get(asset_index)?.decimals;
        if shares.is_zero() {
            return Err(StableSwapError::invalid_amount("requested shares are zero"));
        }
        if total_shares.is_zero() {
            return Err(StableSwapError::invalid_amount("pool has no shares issued"));
        }

        let xp = balances.normalized()?;
        let n_assets = xp.len();
        let d0 = self.solver.compute_d(&xp, amplification)?;
        let d1 = &d0 + mul_div_ceil(shares, &d0, total_shares, "share target")?;

        let y = self.solver.compute_balance(&xp, asset_index, &d1, amplification)?;
        if y <= xp[asset_index] {
            return Err(StableSwapError::invalid_amount(
                "shares do not require a deposit",
            ));
        }

        let mut reduced = Vec::with_capacity(n_assets);
        for (index, balance) in xp.iter().enumerate() {
            let ideal = mul_div_floor(balance, &d1, &d0, "ideal balance")?;
            let expected = if index == asset_index { &y } else { balance };
            let charge = imbalance_fee(expected, &ideal, fee, n_assets, Rounding::Down)?;
            reduced.push(checked_sub(balance, &charge, "imbalance fee")?);
        }

        let y1 = self
            .solver
            .compute_balance(&reduced, asset_index, &d1, amplification)?;
        let amount = checked_sub(&y1, &reduced[asset_index], "single asset deposit")?;
        let fee_free = &y - &xp[asset_index];
        let fee_amount = if amount > fee_free {
            &amount - &fee_free
        } else {
            Balance::zero()
        };

        let outcome = SingleAssetDeposit {
            amount: denormalize_up(&amount, decimals)?,
            fee: denormalize(&fee_amount, decimals)?,
        };
        debug!(
            asset_index,
            amount = %outcome.amount,
            fee = %outcome.fee,
            "add one asset"
        );
        Ok(outcome)
    }
}

/// Normalized deposit amount per pool index
fn deposit_vector(balances: &PoolBalances, deposits: &[AssetAmount]) -> Result<Vec<Balance>> {
    if deposits.len() > balances.len() {
        return Err(StableSwapError::invalid_amount(format!(
            "{} deposits for a pool of {} assets",
            deposits.len(),
            balances.len()
        )));
    }

    let mut added: Vec<Option<Balance>> = vec![None; balances.len()];
    for deposit in deposits {
        let index = balances.index_of(deposit.asset_id).map_err(|_| {
            StableSwapError::invalid_amount(format!(
                "asset {} is not part of the pool",
                deposit.asset_id
            ))
        })?;
        if added[index].is_some() {
            return Err(StableSwapError::invalid_amount(format!(
                "asset {} deposited twice",
                deposit.asset_id
            )));
        }
        added[index] = Some(normalize(&deposit.amount, balances.get(index)?.decimals)?);
    }

    Ok(added.into_iter().map(Option::unwrap_or_default).collect())
}

/// Subtract the imbalance fee on each balance's deviation from the
/// proportional target `xp · D1 / D0`
fn charge_imbalance(
    xp: &[Balance],
    updated: &[Balance],
    d0: &Balance,
    d1: &Balance,
    fee: FeeRate,
    rounding: Rounding,
) -> Result<Vec<Balance>> {
    let n_assets = xp.len();
    if d0.is_zero() {
        return Err(StableSwapError::DivisionByZero {
            context: "ideal balance",
        });
    }
    xp.iter()
        .zip(updated)
        .map(|(initial, current)| {
            let ideal = checked_div(&(initial * d1), d0, "ideal balance")?;
            let charge = imbalance_fee(current, &ideal, fee, n_assets, rounding)?;
            checked_sub(current, &charge, "imbalance fee")
        })
        .collect()
}
