//! # StableSwap AMM Library - Exact Curve Mathematics
//!
//! ## Purpose
//!
//! Pricing core for multi-asset StableSwap pools. Computes swap quotes in both
//! directions, liquidity shares minted or burned by deposits and withdrawals,
//! and the amplification in effect during a ramp. Every result is an exact
//! integer; the invariant is solved by bounded Newton-Raphson iteration and
//! never approximated.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool snapshots as [`PoolBalances`], typically decoded
//!   by the codec crate from JSON and digit strings
//! - **Output Destinations**: Quote APIs, the `stableswap` CLI, settlement
//!   logic that needs the amount a trader pays or receives
//! - **Precision**: Native decimals per asset (6, 12 or 18), normalized to 18
//!   internally and scaled back with pool-favorable rounding
//! - **Validation**: Typed [`StableSwapError`] for every rejected input or
//!   numerical failure, no panics
//!
//! ## Architecture Role
//!
//! ```text
//! PoolBalances ──► precision::normalize ──► InvariantSolver (D, y)
//!                                              │
//!                     fee::{trade, imbalance} ◄┤
//!                                              ▼
//!                           SwapCalculator / ShareCalculator
//!                                              │
//!                     precision::denormalize ◄─┘──► native amounts
//! ```
//!
//! ## Performance Profile
//!
//! - **Memory**: one normalized copy of the balances per call, nothing cached
//! - **Latency bound**: at most [`MAX_ITERATIONS`] Newton steps per solve
//! - **Thread safety**: calculators hold only `Copy` limits and are `Send + Sync`
//! - **Determinism**: pure integer arithmetic, bit-identical on every target
//!
//! ## Examples
//!
//! ```rust
//! use stableswap_amm::{
//!     AssetReserve, Amplification, Balance, FeeRate, PoolBalances, SwapCalculator,
//! };
//!
//! let pool = PoolBalances::new(vec![
//!     AssetReserve::new(0, 1_000_000_000_000u64, 12),
//!     AssetReserve::new(1, 1_000_000_000_000u64, 12),
//! ])?;
//! let amp = Amplification::new(1u32)?;
//!
//! let quote = SwapCalculator::default().calculate_out_given_in(
//!     &pool,
//!     &amp,
//!     0,
//!     1,
//!     &Balance::from(1_000_000_000u64),
//!     FeeRate::ZERO,
//! )?;
//! assert_eq!(quote.amount, Balance::from(999_500_248u64));
//! # Ok::<(), stableswap_amm::StableSwapError>(())
//! ```

pub mod amplification;
pub mod arithmetic;
pub mod error;
pub mod fee;
pub mod invariant;
pub mod precision;
pub mod shares;
pub mod swap;
pub mod types;

pub use amplification::calculate_amplification;
pub use arithmetic::{parse_balance, Balance};
pub use error::{Result, StableSwapError};
pub use fee::{FeeRate, FEE_DENOMINATOR};
pub use invariant::{InvariantSolver, SolverLimits, MAX_ITERATIONS};
pub use precision::TARGET_PRECISION;
pub use shares::{ShareCalculator, SingleAssetDeposit};
pub use swap::{SwapCalculator, SwapOutcome};
pub use types::{Amplification, AssetAmount, AssetReserve, PoolBalances};
