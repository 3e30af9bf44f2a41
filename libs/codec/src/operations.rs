//! String-in, string-out pool operations
//!
//! Each operation parses every argument first, resolves asset identifiers to
//! pool indices in the order the reserves were given, runs the calculation
//! and formats the result as a base-10 digit string.

use stableswap_amm::{
    amplification, InvariantSolver, ShareCalculator, SolverLimits, StableSwapError,
    SwapCalculator,
};
use tracing::debug;

use crate::parser::{
    parse_amount, parse_amplification, parse_block, parse_deposits, parse_fee, parse_reserves,
};

type Result<T> = std::result::Result<T, StableSwapError>;

/// Boundary entry point holding the solver limits used for every call
#[derive(Debug, Clone, Copy, Default)]
pub struct StableSwapCodec {
    swaps: SwapCalculator,
    shares: ShareCalculator,
}

impl StableSwapCodec {
    pub fn new(limits: SolverLimits) -> Self {
        let solver = InvariantSolver::new(limits);
        Self {
            swaps: SwapCalculator::new(solver),
            shares: ShareCalculator::new(solver),
        }
    }

    /// Amount of `asset_out` received for exactly `amount_in` of `asset_in`
    pub fn calculate_out_given_in(
        &self,
        reserves: &str,
        asset_in: u32,
        asset_out: u32,
        amount_in: &str,
        amplification: &str,
        fee: &str,
    ) -> Result<String> {
        let pool = parse_reserves(reserves)?;
        let amount_in = parse_amount(amount_in)?;
        let amplification = parse_amplification(amplification)?;
        let fee = parse_fee(fee)?;
        let index_in = pool.index_of(asset_in)?;
        let index_out = pool.index_of(asset_out)?;

        debug!("out_given_in: asset {} -> {}, amount {}", asset_in, asset_out, amount_in);
        let outcome = self.swaps.calculate_out_given_in(
            &pool,
            &amplification,
            index_in,
            index_out,
            &amount_in,
            fee,
        )?;
        Ok(outcome.amount.to_string())
    }

    /// Amount of `asset_in` required to receive exactly `amount_out` of `asset_out`
    pub fn calculate_in_given_out(
        &self,
        reserves: &str,
        asset_in: u32,
        asset_out: u32,
        amount_out: &str,
        amplification: &str,
        fee: &str,
    ) -> Result<String> {
        let pool = parse_reserves(reserves)?;
        let amount_out = parse_amount(amount_out)?;
        let amplification = parse_amplification(amplification)?;
        let fee = parse_fee(fee)?;
        let index_in = pool.index_of(asset_in)?;
        let index_out = pool.index_of(asset_out)?;

        debug!("in_given_out: asset {} -> {}, amount {}", asset_in, asset_out, amount_out);
        let outcome = self.swaps.calculate_in_given_out(
            &pool,
            &amplification,
            index_in,
            index_out,
            &amount_out,
            fee,
        )?;
        Ok(outcome.amount.to_string())
    }

    /// Shares minted for the deposits in `assets`
    pub fn calculate_shares(
        &self,
        reserves: &str,
        assets: &str,
        amplification: &str,
        share_issuance: &str,
        fee: &str,
    ) -> Result<String> {
        let pool = parse_reserves(reserves)?;
        let deposits = parse_deposits(assets)?;
        let amplification = parse_amplification(amplification)?;
        let issuance = parse_amount(share_issuance)?;
        let fee = parse_fee(fee)?;

        let shares = self
            .shares
            .calculate_shares(&pool, &deposits, &amplification, &issuance, fee)?;
        Ok(shares.to_string())
    }

    /// Shares burned to withdraw exactly `amount` of `asset_id`
    pub fn calculate_shares_for_amount(
        &self,
        reserves: &str,
        asset_id: u32,
        amount: &str,
        amplification: &str,
        share_issuance: &str,
        fee: &str,
    ) -> Result<String> {
        let pool = parse_reserves(reserves)?;
        let amount = parse_amount(amount)?;
        let amplification = parse_amplification(amplification)?;
        let issuance = parse_amount(share_issuance)?;
        let fee = parse_fee(fee)?;
        let index = pool.index_of(asset_id)?;

        let shares = self.shares.calculate_shares_for_amount(
            &pool,
            index,
            &amount,
            &amplification,
            &issuance,
            fee,
        )?;
        Ok(shares.to_string())
    }

    /// Amount of `asset_id` to deposit for exactly `shares`
    pub fn calculate_add_one_asset(
        &self,
        reserves: &str,
        shares: &str,
        asset_id: u32,
        amplification: &str,
        share_issuance: &str,
        fee: &str,
    ) -> Result<String> {
        let pool = parse_reserves(reserves)?;
        let shares = parse_amount(shares)?;
        let amplification = parse_amplification(amplification)?;
        let issuance = parse_amount(share_issuance)?;
        let fee = parse_fee(fee)?;
        let index = pool.index_of(asset_id)?;

        let deposit = self.shares.calculate_add_one_asset(
            &pool,
            &shares,
            index,
            &amplification,
            &issuance,
            fee,
        )?;
        Ok(deposit.amount.to_string())
    }
}

/// Amplification in effect at `current_block` of a linear ramp
pub fn calculate_amplification(
    initial: &str,
    final_amp: &str,
    initial_block: &str,
    final_block: &str,
    current_block: &str,
) -> Result<String> {
    let initial = parse_amount(initial)?;
    let final_amp = parse_amount(final_amp)?;
    let initial_block = parse_block(initial_block)?;
    let final_block = parse_block(final_block)?;
    let current_block = parse_block(current_block)?;

    let current = amplification::calculate_amplification(
        &initial,
        &final_amp,
        initial_block,
        final_block,
        current_block,
    );
    Ok(current.to_string())
}
