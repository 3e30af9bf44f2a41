//! Subcommands, one per codec operation

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use stableswap_codec::{calculate_amplification, StableSwapCodec};
use tracing::debug;

/// Pool snapshot and curve parameters shared by every pool operation
#[derive(Args, Debug, Clone)]
pub struct PoolArgs {
    /// Reserves JSON: [{"asset_id": 0, "amount": "<digits>", "decimals": 12}, ...]
    #[arg(short, long)]
    pub reserves: String,

    /// Amplification coefficient
    #[arg(short = 'A', long)]
    pub amplification: String,

    /// Fee as a decimal fraction, e.g. 0.003
    #[arg(short, long, default_value = "0")]
    pub fee: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Output received for an exact input amount
    OutGivenIn {
        #[command(flatten)]
        pool: PoolArgs,
        #[arg(long)]
        asset_in: u32,
        #[arg(long)]
        asset_out: u32,
        /// Input amount in native decimals
        #[arg(long)]
        amount: String,
    },

    /// Input required for an exact output amount
    InGivenOut {
        #[command(flatten)]
        pool: PoolArgs,
        #[arg(long)]
        asset_in: u32,
        #[arg(long)]
        asset_out: u32,
        /// Output amount in native decimals
        #[arg(long)]
        amount: String,
    },

    /// Shares minted for a deposit
    Shares {
        #[command(flatten)]
        pool: PoolArgs,
        /// Deposits JSON: [{"asset_id": 0, "amount": "<digits>"}, ...]
        #[arg(long)]
        assets: String,
        /// Current share supply
        #[arg(long)]
        share_issuance: String,
    },

    /// Shares burned to withdraw an exact amount of one asset
    SharesForAmount {
        #[command(flatten)]
        pool: PoolArgs,
        #[arg(long)]
        asset_id: u32,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        share_issuance: String,
    },

    /// Amount of one asset to deposit for an exact number of shares
    AddOneAsset {
        #[command(flatten)]
        pool: PoolArgs,
        #[arg(long)]
        asset_id: u32,
        #[arg(long)]
        shares: String,
        #[arg(long)]
        share_issuance: String,
    },

    /// Amplification at a block height during a linear ramp
    Amplification {
        #[arg(long)]
        initial: String,
        #[arg(long = "final")]
        final_amp: String,
        #[arg(long)]
        initial_block: String,
        #[arg(long)]
        final_block: String,
        #[arg(long)]
        current_block: String,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::OutGivenIn { .. } => "out-given-in",
            Command::InGivenOut { .. } => "in-given-out",
            Command::Shares { .. } => "shares",
            Command::SharesForAmount { .. } => "shares-for-amount",
            Command::AddOneAsset { .. } => "add-one-asset",
            Command::Amplification { .. } => "amplification",
        }
    }

    /// Run the operation and return its digit-string result
    pub fn run(&self, codec: &StableSwapCodec) -> Result<String> {
        debug!("Running {}", self.name());
        let result = match self {
            Command::OutGivenIn {
                pool,
                asset_in,
                asset_out,
                amount,
            } => codec.calculate_out_given_in(
                &pool.reserves,
                *asset_in,
                *asset_out,
                amount,
                &pool.amplification,
                &pool.fee,
            ),
            Command::InGivenOut {
                pool,
                asset_in,
                asset_out,
                amount,
            } => codec.calculate_in_given_out(
                &pool.reserves,
                *asset_in,
                *asset_out,
                amount,
                &pool.amplification,
                &pool.fee,
            ),
            Command::Shares {
                pool,
                assets,
                share_issuance,
            } => codec.calculate_shares(
                &pool.reserves,
                assets,
                &pool.amplification,
                share_issuance,
                &pool.fee,
            ),
            Command::SharesForAmount {
                pool,
                asset_id,
                amount,
                share_issuance,
            } => codec.calculate_shares_for_amount(
                &pool.reserves,
                *asset_id,
                amount,
                &pool.amplification,
                share_issuance,
                &pool.fee,
            ),
            Command::AddOneAsset {
                pool,
                asset_id,
                shares,
                share_issuance,
            } => codec.calculate_add_one_asset(
                &pool.reserves,
                shares,
                *asset_id,
                &pool.amplification,
                share_issuance,
                &pool.fee,
            ),
            Command::Amplification {
                initial,
                final_amp,
                initial_block,
                final_block,
                current_block,
            } => calculate_amplification(
                initial,
                final_amp,
                initial_block,
                final_block,
                current_block,
            ),
        };

        result.with_context(|| format!("{} failed", self.name()))
    }
}
