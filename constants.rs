//! Hardcoded constants for the stable-swap client.
//!
//! Contains the default program ID, pool registry locations and the timing
//! defaults used while waiting for confirmation.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

/// Saber stable-swap program ID (mainnet and devnet)
pub const STABLE_SWAP_PROGRAM_ID: &str = "SSwpkEEcbUqx4vtoEByFjSkhKdCT862DNVb52nZg1UZ";

/// Pool registry published for mainnet-beta
pub const MAINNET_REGISTRY_URL: &str = "https://registry.saber.so/data/pools-info.mainnet.json";

/// Pool registry published for devnet
pub const DEVNET_REGISTRY_URL: &str = "https://registry.saber.so/data/pools-info.devnet.json";

/// How long to wait for a submitted transaction to reach finalized commitment
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between two signature status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Get the stable-swap program ID
pub fn stable_swap_program_id() -> Pubkey {
    Pubkey::from_str(STABLE_SWAP_PROGRAM_ID).expect("Invalid stable-swap program ID")
}

/// Get the SPL Token program ID that owns pool and user token accounts
pub fn token_program_id() -> Pubkey {
    spl_token::id()
}
