//! StableSwap invariant solver
//!
//! For `n` assets with sum `S` and product `P`, the invariant `D` satisfies
//!
//! ```text
//! Ann·S + D = Ann·D + D^(n+1) / (n^n · P)        where Ann = A·n^n
//! ```
//!
//! Neither `D` nor a single unknown balance has a closed form for `n > 2`,
//! so both are found by Newton-Raphson iteration in exact integer arithmetic.
//! Iteration stops once two successive estimates differ by at most one unit;
//! running out of iterations is reported as `ConvergenceFailure` and never
//! approximated.
//!
//! All balances passed here must already be normalized to internal precision.

use num_traits::Zero;
use tracing::{trace, warn};

use crate::arithmetic::{abs_diff, checked_div, checked_sub, Balance};
use crate::error::{Result, StableSwapError};
use crate::types::Amplification;

/// Hard cap on Newton iterations for both solvers
pub const MAX_ITERATIONS: u8 = u8::MAX;

/// Iteration caps for the two Newton solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverLimits {
    pub max_d_iterations: u8,
    pub max_y_iterations: u8,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_d_iterations: MAX_ITERATIONS,
            max_y_iterations: MAX_ITERATIONS,
        }
    }
}

fn has_converged(previous: &Balance, current: &Balance) -> bool {
    abs_diff(previous, current) <= Balance::from(1u32)
}

/// Newton-Raphson solver for `D` and for a single balance given `D`
#[derive(Debug, Clone, Copy, Default)]
pub struct InvariantSolver {
    limits: SolverLimits,
}

impl InvariantSolver {
    pub fn new(limits: SolverLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> SolverLimits {
        self.limits
    }

    /// Compute the invariant `D` for `balances`
    ///
    /// Returns zero for an empty pool. A pool where some but not all balances
    /// are zero has no finite invariant and fails with
    /// `InsufficientLiquidity`. Balances are visited in ascending order so the
    /// floor rounding inside `D_P` does not depend on the caller's ordering.
    pub fn compute_d(
        &self,
        balances: &[Balance],
        amplification: &Amplification,
    ) -> Result<Balance> {
        let n_assets = balances.len();
        if n_assets < 2 {
            return Err(StableSwapError::InvalidAssetCount { count: n_assets });
        }

        let sum: Balance = balances.iter().sum();
        if sum.is_zero() {
            return Ok(Balance::zero());
        }
        if balances.iter().any(|balance| balance.is_zero()) {
            return Err(StableSwapError::insufficient_liquidity(
                "pool has a zero balance next to non-zero balances",
            ));
        }

        let mut sorted: Vec<&Balance> = balances.iter().collect();
        sorted.sort();

        let n = Balance::from(n_assets);
        let ann = amplification.leverage(n_assets);
        let ann_minus_one = checked_sub(&ann, &Balance::from(1u32), "D iteration")?;
        let ann_sum = &ann * &sum;
        let n_plus_one = &n + 1u32;

        let mut d = sum.clone();
        for iteration in 0..self.limits.max_d_iterations {
            // D_P = D^(n+1) / (n^n · Π x_i), one floor division per balance
            let mut d_p = d.clone();
            for balance in &sorted {
                d_p = checked_div(&(&d_p * &d), &(*balance * &n), "D_P")?;
            }

            let numerator = (&ann_sum + &d_p * &n) * &d;
            let denominator = &ann_minus_one * &d + &n_plus_one * &d_p;
            let next = checked_div(&numerator, &denominator, "D iteration")?;

            if has_converged(&d, &next) {
                trace!(iterations = iteration + 1, assets = n_assets, "D converged");
                return Ok(next);
            }
            d = next;
        }

        warn!(
            iterations = self.limits.max_d_iterations,
            assets = n_assets,
            "D did not converge"
        );
        Err(StableSwapError::ConvergenceFailure {
            quantity: "D",
            iterations: self.limits.max_d_iterations,
        })
    }

    /// Solve for the balance at `target_index` that keeps the invariant at `d`
    ///
    /// `balances[target_index]` is the unknown and is ignored; every other
    /// entry is held fixed. Iterates
    ///
    /// ```text
    /// y = (y² + c) / (2y + b − D)
    /// c = D^(n+1) / (n^n · P' · Ann)
    /// b = S' + D / Ann
    /// ```
    ///
    /// where `S'` and `P'` range over the fixed balances.
    pub fn compute_balance(
        &self,
        balances: &[Balance],
        target_index: usize,
        d: &Balance,
        amplification: &Amplification,
    ) -> Result<Balance> {
        let n_assets = balances.len();
        if n_assets < 2 {
            return Err(StableSwapError::InvalidAssetCount { count: n_assets });
        }
        if target_index >= n_assets {
            return Err(StableSwapError::invalid_index(
                target_index,
                format!("pool has {n_assets} assets"),
            ));
        }

        let mut others: Vec<&Balance> = balances
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != target_index)
            .map(|(_, balance)| balance)
            .collect();
        if others.iter().any(|balance| balance.is_zero()) {
            return Err(StableSwapError::insufficient_liquidity(
                "fixed balance is zero",
            ));
        }
        others.sort();

        let n = Balance::from(n_assets);
        let ann = amplification.leverage(n_assets);

        let mut c = d.clone();
        for balance in &others {
            c = checked_div(&(&c * d), &(*balance * &n), "y coefficient c")?;
        }
        c = checked_div(&(&c * d), &(&ann * &n), "y coefficient c")?;

        let sum_others: Balance = others.iter().copied().sum();
        let b = sum_others + checked_div(d, &ann, "y coefficient b")?;

        let mut y = d.clone();
        for iteration in 0..self.limits.max_y_iterations {
            let numerator = &y * &y + &c;
            let denominator = checked_sub(&(&y * 2u32 + &b), d, "y iteration")?;
            let next = checked_div(&numerator, &denominator, "y iteration")?;

            if has_converged(&y, &next) {
                trace!(iterations = iteration + 1, target_index, "y converged");
                if next.is_zero() {
                    return Err(StableSwapError::insufficient_liquidity(
                        "solved balance is zero",
                    ));
                }
                return Ok(next);
            }
            y = next;
        }

        warn!(
            iterations = self.limits.max_y_iterations,
            target_index, "y did not converge"
        );
        Err(StableSwapError::ConvergenceFailure {
            quantity: "y",
            iterations: self.limits.max_y_iterations,
        })
    }
}
