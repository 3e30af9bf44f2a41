//! Swap calculations holding the invariant fixed
//!
//! Both directions normalize every reserve, compute `D` for the pre-trade
//! pool, move one balance by the trade amount and solve for the other
//! balance that restores `D`. Trade fees are taken from the output side.

use num_traits::Zero;
use tracing::debug;

use crate::arithmetic::{checked_sub, Balance};
use crate::error::{Result, StableSwapError};
use crate::fee::{apply_trade_fee, gross_up, FeeRate};
use crate::invariant::InvariantSolver;
use crate::precision::{denormalize, denormalize_up, normalize};
use crate::types::{Amplification, PoolBalances};

/// Result of a swap quote, both values in native decimals
///
/// For exact-input swaps `amount` is what the trader receives; for
/// exact-output swaps it is what the trader must pay. `fee` is the trade fee
/// retained by the pool, denominated in the output asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount: Balance,
    pub fee: Balance,
}

impl SwapOutcome {
    fn zero() -> Self {
        Self {
            amount: Balance::zero(),
            fee: Balance::zero(),
        }
    }
}

/// Exact-input and exact-output swap quotes
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapCalculator {
    solver: InvariantSolver,
}

impl SwapCalculator {
    pub fn new(solver: InvariantSolver) -> Self {
        Self { solver }
    }

    /// Output amount of `index_out` for exactly `amount_in` of `index_in`
    ///
    /// One native unit of the output is withheld after denormalizing to
    /// absorb the solver's convergence tolerance, so a quote never exceeds
    /// what the curve supports. A zero input short-circuits to a zero output.
    pub fn calculate_out_given_in(
        &self,
        balances: &PoolBalances,
        amplification: &Amplification,
        index_in: usize,
        index_out: usize,
        amount_in: &Balance,
        fee: FeeRate,
    ) -> Result<SwapOutcome> {
        validate_pair(balances, index_in, index_out)?;
        if amount_in.is_zero() {
            return Ok(SwapOutcome::zero());
        }

        let decimals_out = balances.get(index_out)?.decimals;
        let mut xp = balances.normalized()?;
        let amount_in = normalize(amount_in, balances.get(index_in)?.decimals)?;

        let d = self.solver.compute_d(&xp, amplification)?;
        let reserve_out = xp[index_out].clone();
        xp[index_in] += &amount_in;

        let new_reserve_out = self.solver.compute_balance(&xp, index_out, &d, amplification)?;
        if new_reserve_out >= reserve_out {
            return Err(StableSwapError::insufficient_liquidity(
                "swap produces no output",
            ));
        }
        let gross = &reserve_out - &new_reserve_out;

        let split = apply_trade_fee(&gross, fee)?;
        let amount = denormalize(&split.net, decimals_out)?;
        let amount = if amount.is_zero() {
            amount
        } else {
            amount - 1u32
        };
        let fee_amount = denormalize(&split.fee, decimals_out)?;

        debug!(
            index_in,
            index_out,
            amount_out = %amount,
            fee = %fee_amount,
            "out given in"
        );

        Ok(SwapOutcome {
            amount,
            fee: fee_amount,
        })
    }

    /// Input amount of `index_in` required to receive exactly `amount_out`
    ///
    /// The requested output is grossed up by the trade fee before solving, and
    /// the resulting input is rounded up plus one native unit.
    pub fn calculate_in_given_out(
        &self,
        balances: &PoolBalances,
        amplification: &Amplification,
        index_in: usize,
        index_out: usize,
        amount_out: &Balance,
        fee: FeeRate,
    ) -> Result<SwapOutcome> {
        validate_pair(balances, index_in, index_out)?;
        if amount_out.is_zero() {
            return Ok(SwapOutcome::zero());
        }

        let decimals_in = balances.get(index_in)?.decimals;
        let decimals_out = balances.get(index_out)?.decimals;
        let mut xp = balances.normalized()?;

        let net_out = normalize(amount_out, decimals_out)?;
        let gross_out = gross_up(&net_out, fee)?;
        if gross_out >= xp[index_out] {
            return Err(StableSwapError::insufficient_liquidity(
                "requested output drains the pool",
            ));
        }

        let d = self.solver.compute_d(&xp, amplification)?;
        let reserve_in = xp[index_in].clone();
        xp[index_out] = checked_sub(&xp[index_out], &gross_out, "in given out")?;

        let new_reserve_in = self.solver.compute_balance(&xp, index_in, &d, amplification)?;
        if new_reserve_in <= reserve_in {
            return Err(StableSwapError::insufficient_liquidity(
                "solved input is not positive",
            ));
        }

        let amount = denormalize_up(&(&new_reserve_in - &reserve_in), decimals_in)? + 1u32;
        let fee_amount = denormalize_up(&(&gross_out - &net_out), decimals_out)?;

        debug!(
            index_in,
            index_out,
            amount_in = %amount,
            fee = %fee_amount,
            "in given out"
        );

        Ok(SwapOutcome {
            amount,
            fee: fee_amount,
        })
    }
}

fn validate_pair(balances: &PoolBalances, index_in: usize, index_out: usize) -> Result<()> {
    let n_assets = balances.len();
    for index in [index_in, index_out] {
        if index >= n_assets {
            return Err(StableSwapError::invalid_index(
                index,
                format!("pool has {n_assets} assets"),
            ));
        }
    }
    if index_in == index_out {
        return Err(StableSwapError::invalid_index(
            index_in,
            "input and output asset are the same",
        ));
    }
    Ok(())
}
