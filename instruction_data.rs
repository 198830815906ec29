//! Instruction data records for the stable-swap program.
//!
//! Each record is a one-byte instruction tag followed by its u64 arguments,
//! little-endian, in declaration order. There is no padding and no length
//! prefix, which is exactly what borsh produces for these structs.

use borsh::BorshSerialize;

use crate::types::SwapError;

/// Serialize an instruction record into the bytes the program consumes
pub trait InstructionData: BorshSerialize {
    fn pack(&self) -> Result<Vec<u8>, SwapError> {
        borsh::to_vec(self).map_err(|e| SwapError::Encode(e.to_string()))
    }
}

/// `swap` arguments
#[derive(BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapData {
    pub tag: u8,
    pub amount_in: u64,
    pub minimum_amount_out: u64,
}

impl SwapData {
    pub const TAG: u8 = 1;
    pub const LEN: usize = 17;

    pub fn new(amount_in: u64, minimum_amount_out: u64) -> Self {
        Self {
            tag: Self::TAG,
            amount_in,
            minimum_amount_out,
        }
    }
}

impl InstructionData for SwapData {}

/// `withdraw` arguments (both sides)
#[derive(BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawData {
    pub tag: u8,
    pub pool_token_amount: u64,
    pub minimum_token_a_amount: u64,
    pub minimum_token_b_amount: u64,
}

impl WithdrawData {
    pub const TAG: u8 = 3;
    pub const LEN: usize = 25;

    pub fn new(
        pool_token_amount: u64,
        minimum_token_a_amount: u64,
        minimum_token_b_amount: u64,
    ) -> Self {
        Self {
            tag: Self::TAG,
            pool_token_amount,
            minimum_token_a_amount,
            minimum_token_b_amount,
        }
    }
}

impl InstructionData for WithdrawData {}

/// `withdraw_one` arguments (single side)
#[derive(BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawOneData {
    pub tag: u8,
    pub pool_token_amount: u64,
    pub minimum_token_amount: u64,
}

impl WithdrawOneData {
    pub const TAG: u8 = 4;
    pub const LEN: usize = 17;

    pub fn new(pool_token_amount: u64, minimum_token_amount: u64) -> Self {
        Self {
            tag: Self::TAG,
            pool_token_amount,
            minimum_token_amount,
        }
    }
}

impl InstructionData for WithdrawOneData {}
