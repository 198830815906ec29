//! Error and request types for the stable-swap client.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Signature};
use std::time::Duration;
use thiserror::Error;

/// Errors reported by the chain RPC boundary.
///
/// `AccountNotFound` is its own variant so callers can branch on a missing
/// account without looking at message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("Account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("RPC request failed: {0}")]
    Request(String),

    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: Signature, reason: String },

    #[error("Transaction {signature} was not finalized within {timeout:?}")]
    ConfirmationTimeout {
        signature: Signature,
        timeout: Duration,
    },

    #[error("Request cancelled")]
    Cancelled,
}

/// Error types for the swap pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Network error: {0}")]
    Network(RpcError),

    #[error("Failed to decode pool state: {0}")]
    Decode(String),

    #[error("Token mint {0} is not part of the pool")]
    TokenNotInPool(Pubkey),

    #[error("Source and destination mint are both {0}")]
    SameMint(Pubkey),

    #[error("Swap instruction has no data bytes")]
    MissingData,

    #[error("Swap instruction is missing accounts: {}", .0.join(", "))]
    MissingAccount(Vec<&'static str>),

    #[error("Failed to derive pool authority: {0}")]
    Derivation(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("Failed to sign transaction: {0}")]
    Signing(String),

    #[error("Failed to encode instruction data: {0}")]
    Encode(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<RpcError> for SwapError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Cancelled => SwapError::Cancelled,
            other => SwapError::Network(other),
        }
    }
}

/// A swap requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    /// The pool (swap info) account
    pub pool: Pubkey,
    /// Mint of the token the caller sends
    pub source_mint: Pubkey,
    /// Mint of the token the caller receives
    pub destination_mint: Pubkey,
    /// Amount of source tokens to swap (base units)
    pub amount_in: u64,
    /// Minimum amount of destination tokens to accept (base units)
    pub minimum_amount_out: u64,
}

/// A caller's token account for one mint, plus the instruction that creates
/// it when it does not exist yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTokenAccount {
    pub address: Pubkey,
    pub create_instruction: Option<Instruction>,
}
