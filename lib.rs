//! # Stable Swap Client
//!
//! A Rust library for trading against a Saber-style stable-swap pool on Solana.
//!
//! ## What it does
//!
//! Given a pool account and the two mints to trade, the client:
//! 1. **Reads** the pool state and finds the source and destination sides
//! 2. **Derives** the pool authority from the pool address and its nonce
//! 3. **Resolves** the caller's associated token accounts, adding a create
//!    instruction for any that do not exist yet
//! 4. **Builds** the swap instruction with the program's exact account order
//! 5. **Signs**, submits and waits for finalized confirmation
//!
//! A dry run stops after step 4 and logs the accounts instead.
//!
//! ## Usage
//!
//! ```ignore
//! use stable_swap_client::{
//!     CancelToken, ClientConfig, RpcChain, StableSwapClient, SwapRequest,
//! };
//!
//! let config = ClientConfig::default();
//! let client = StableSwapClient::new(
//!     RpcChain::new(&config),
//!     config.get_program_id()?,
//!     CancelToken::new(),
//! );
//!
//! let request = SwapRequest {
//!     pool,
//!     source_mint: usdc,
//!     destination_mint: usdt,
//!     amount_in: 1_000_000,
//!     minimum_amount_out: 990_000,
//! };
//!
//! // Check the accounts first
//! client.show_swap(&request, &wallet.pubkey()).await?;
//!
//! // Then send it
//! let signature = client.swap(&request, &wallet).await?;
//! ```
//!
//! ## Swap Account Layout
//!
//! | # | account | writable | signer |
//! |---|---|---|---|
//! | 0 | pool | | |
//! | 1 | pool authority | | |
//! | 2 | user authority | | yes |
//! | 3 | user source | yes | |
//! | 4 | pool source reserve | yes | |
//! | 5 | pool destination reserve | yes | |
//! | 6 | user destination | yes | |
//! | 7 | destination admin fee | yes | |
//! | 8 | token program | | |
//!
//! ## Important Notes
//!
//! - Swap data is `[1u8, amount_in: u64 LE, minimum_amount_out: u64 LE]`
//! - Token accounts are SPL Token (not Token-2022) associated token accounts
//! - Nothing is retried; a failed or cancelled swap must be re-run by the caller

pub mod cancel;
pub mod client;
pub mod config;
pub mod constants;
pub mod instruction_data;
pub mod logger;
pub mod registry;
pub mod rpc;
pub mod state;
pub mod swap_instruction;
pub mod token_account;
pub mod types;

// Re-export main public API
pub use cancel::CancelToken;
pub use client::{PreparedSwap, StableSwapClient};
pub use config::{parse_keypair, ClientConfig, Cluster};
pub use constants::{stable_swap_program_id, token_program_id, STABLE_SWAP_PROGRAM_ID};
pub use instruction_data::{InstructionData, SwapData, WithdrawData, WithdrawOneData};
pub use registry::{PoolRegistry, RegistryError};
pub use rpc::{ChainRpc, RpcChain};
pub use state::{Fees, PoolState, SwapTokenInfo, POOL_STATE_LEN};
pub use swap_instruction::{
    swap_instruction, SwapAccounts, SwapInstructionBuilder, SwapSlot, SWAP_ACCOUNTS_LEN,
};
pub use token_account::{associated_token_address, resolve_token_account};
pub use types::{ResolvedTokenAccount, RpcError, SwapError, SwapRequest};
