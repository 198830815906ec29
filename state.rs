//! Stable-swap pool state as stored in the pool account.
//!
//! Layout: is_initialized, is_paused, nonce, initial/target amp factors, ramp
//! timestamps, future admin deadline, future admin and admin keys, token A/B
//! reserves, pool token mint, token A/B mints, token A/B admin fee accounts,
//! fees. All integers are little-endian; booleans are single bytes.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::types::SwapError;

/// Size of the packed pool state
pub const POOL_STATE_LEN: usize = 395;

/// Fee ratios charged by the pool
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fees {
    pub admin_trade_fee_numerator: u64,
    pub admin_trade_fee_denominator: u64,
    pub admin_withdraw_fee_numerator: u64,
    pub admin_withdraw_fee_denominator: u64,
    pub trade_fee_numerator: u64,
    pub trade_fee_denominator: u64,
    pub withdraw_fee_numerator: u64,
    pub withdraw_fee_denominator: u64,
}

/// One side of the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapTokenInfo {
    pub mint: Pubkey,
    /// Pool-owned token account holding this side's reserves
    pub reserve: Pubkey,
    /// Token account receiving admin fees in this side's mint
    pub admin_fee_account: Pubkey,
}

/// Point-in-time snapshot of a pool account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub is_initialized: bool,
    pub is_paused: bool,
    pub nonce: u8,
    pub initial_amp_factor: u64,
    pub target_amp_factor: u64,
    pub start_ramp_ts: i64,
    pub stop_ramp_ts: i64,
    pub future_admin_deadline: i64,
    pub future_admin_key: Pubkey,
    pub admin_key: Pubkey,
    pub pool_token_mint: Pubkey,
    pub token_a: SwapTokenInfo,
    pub token_b: SwapTokenInfo,
    pub fees: Fees,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct PoolStateLayout {
    is_initialized: bool,
    is_paused: bool,
    nonce: u8,
    initial_amp_factor: u64,
    target_amp_factor: u64,
    start_ramp_ts: i64,
    stop_ramp_ts: i64,
    future_admin_deadline: i64,
    future_admin_key: [u8; 32],
    admin_key: [u8; 32],
    token_a_reserve: [u8; 32],
    token_b_reserve: [u8; 32],
    pool_token_mint: [u8; 32],
    token_a_mint: [u8; 32],
    token_b_mint: [u8; 32],
    token_a_admin_fee: [u8; 32],
    token_b_admin_fee: [u8; 32],
    fees: Fees,
}

impl PoolState {
    /// Decode a pool account's data.
    ///
    /// Trailing bytes past [`POOL_STATE_LEN`] are ignored.
    pub fn unpack(data: &[u8]) -> Result<Self, SwapError> {
        if data.len() < POOL_STATE_LEN {
            return Err(SwapError::Decode(format!(
                "Pool data too short: expected at least {} bytes, got {}",
                POOL_STATE_LEN,
                data.len()
            )));
        }

        let layout = PoolStateLayout::deserialize(&mut &data[..POOL_STATE_LEN])
            .map_err(|e| SwapError::Decode(e.to_string()))?;

        Ok(layout.into())
    }

    /// Encode the snapshot back into the on-chain layout
    pub fn pack(&self) -> Result<Vec<u8>, SwapError> {
        borsh::to_vec(&PoolStateLayout::from(self)).map_err(|e| SwapError::Encode(e.to_string()))
    }

    /// Find the side of the pool trading `mint`
    pub fn side_for(&self, mint: &Pubkey) -> Result<SwapTokenInfo, SwapError> {
        if *mint == self.token_a.mint {
            return Ok(self.token_a);
        }
        if *mint == self.token_b.mint {
            return Ok(self.token_b);
        }
        Err(SwapError::TokenNotInPool(*mint))
    }
}

impl From<PoolStateLayout> for PoolState {
    fn from(raw: PoolStateLayout) -> Self {
        Self {
            is_initialized: raw.is_initialized,
            is_paused: raw.is_paused,
            nonce: raw.nonce,
            initial_amp_factor: raw.initial_amp_factor,
            target_amp_factor: raw.target_amp_factor,
            start_ramp_ts: raw.start_ramp_ts,
            stop_ramp_ts: raw.stop_ramp_ts,
            future_admin_deadline: raw.future_admin_deadline,
            future_admin_key: Pubkey::new_from_array(raw.future_admin_key),
            admin_key: Pubkey::new_from_array(raw.admin_key),
            pool_token_mint: Pubkey::new_from_array(raw.pool_token_mint),
            token_a: SwapTokenInfo {
                mint: Pubkey::new_from_array(raw.token_a_mint),
                reserve: Pubkey::new_from_array(raw.token_a_reserve),
                admin_fee_account: Pubkey::new_from_array(raw.token_a_admin_fee),
            },
            token_b: SwapTokenInfo {
                mint: Pubkey::new_from_array(raw.token_b_mint),
                reserve: Pubkey::new_from_array(raw.token_b_reserve),
                admin_fee_account: Pubkey::new_from_array(raw.token_b_admin_fee),
            },
            fees: raw.fees,
        }
    }
}

impl From<&PoolState> for PoolStateLayout {
    fn from(state: &PoolState) -> Self {
        Self {
            is_initialized: state.is_initialized,
            is_paused: state.is_paused,
            nonce: state.nonce,
            initial_amp_factor: state.initial_amp_factor,
            target_amp_factor: state.target_amp_factor,
            start_ramp_ts: state.start_ramp_ts,
            stop_ramp_ts: state.stop_ramp_ts,
            future_admin_deadline: state.future_admin_deadline,
            future_admin_key: state.future_admin_key.to_bytes(),
            admin_key: state.admin_key.to_bytes(),
            token_a_reserve: state.token_a.reserve.to_bytes(),
            token_b_reserve: state.token_b.reserve.to_bytes(),
            pool_token_mint: state.pool_token_mint.to_bytes(),
            token_a_mint: state.token_a.mint.to_bytes(),
            token_b_mint: state.token_b.mint.to_bytes(),
            token_a_admin_fee: state.token_a.admin_fee_account.to_bytes(),
            token_b_admin_fee: state.token_b.admin_fee_account.to_bytes(),
            fees: state.fees,
        }
    }
}
