//! # StableSwap Codec - String Boundary for the Curve Math
//!
//! ## Purpose
//!
//! This crate is the "Rules" layer between string-typed callers and the
//! arithmetic core:
//! - JSON decoding of pool reserves and deposits
//! - Strict parsing of digit strings and decimal fee fractions
//! - Asset identifier to pool index resolution
//! - Result formatting as base-10 digit strings
//!
//! ## Integration Points
//!
//! - **Upstream**: the `stableswap` CLI and any host that speaks strings
//! - **Downstream**: `stableswap-amm` calculators, which never see raw text
//! - **Legacy hosts**: [`to_wire`] flattens a typed result into the single
//!   string contract where [`ERROR_SENTINEL`] stands for every failure
//!
//! ## Architecture Role
//!
//! ```text
//! JSON / digit strings → [codec] → stableswap-amm → [codec] → digit string
//!        ↑                  ↓             ↓                       ↓
//!     Callers         parse_* fns     Exact math          to_string / to_wire
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Any curve mathematics (belongs in `stableswap-amm`)
//! - Configuration loading or logging setup (belongs in the binaries)

pub mod operations;
pub mod parser;

pub use operations::{calculate_amplification, StableSwapCodec};
pub use parser::{
    parse_amount, parse_amplification, parse_block, parse_deposits, parse_fee, parse_reserves,
    FEE_SCALE,
};
pub use stableswap_amm::StableSwapError;

use tracing::warn;

/// Single-string stand-in for any failure in the legacy contract
pub const ERROR_SENTINEL: &str = "-1";

/// Flatten a typed result for hosts that can only carry one string
pub fn to_wire(result: Result<String, StableSwapError>) -> String {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("Operation failed, returning sentinel: {}", e);
            ERROR_SENTINEL.to_string()
        }
    }
}
