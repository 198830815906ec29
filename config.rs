use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use std::{fmt, str::FromStr, time::Duration};

use crate::{
    constants::{
        DEFAULT_CONFIRM_TIMEOUT, DEFAULT_POLL_INTERVAL, DEVNET_REGISTRY_URL, MAINNET_REGISTRY_URL,
        STABLE_SWAP_PROGRAM_ID,
    },
    types::SwapError,
};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[clap(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Main,
    Dev,
    Test,
    Local,
}

impl Cluster {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Cluster::Main => "https://api.mainnet-beta.solana.com",
            Cluster::Dev => "https://api.devnet.solana.com",
            Cluster::Test => "https://api.testnet.solana.com",
            Cluster::Local => "http://127.0.0.1:8899",
        }
    }

    /// Pool registry for the cluster; only mainnet and devnet publish one
    pub fn registry_url(&self) -> Option<&'static str> {
        match self {
            Cluster::Main => Some(MAINNET_REGISTRY_URL),
            Cluster::Dev => Some(DEVNET_REGISTRY_URL),
            Cluster::Test | Cluster::Local => None,
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cluster::Main => "main",
            Cluster::Dev => "dev",
            Cluster::Test => "test",
            Cluster::Local => "local",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub program_id: String,
    pub confirm_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_cluster(Cluster::Dev)
    }
}

impl ClientConfig {
    pub fn for_cluster(cluster: Cluster) -> Self {
        Self {
            rpc_url: cluster.rpc_url().to_string(),
            program_id: STABLE_SWAP_PROGRAM_ID.to_string(),
            confirm_timeout_secs: DEFAULT_CONFIRM_TIMEOUT.as_secs(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }

    pub fn get_program_id(&self) -> Result<Pubkey, SwapError> {
        Pubkey::from_str(&self.program_id)
            .map_err(|e| SwapError::InvalidKey(format!("program id {}: {}", self.program_id, e)))
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Parse a base58-encoded 64-byte keypair
pub fn parse_keypair(private_key: &str) -> Result<Keypair, SwapError> {
    let bytes = bs58::decode(private_key.trim())
        .into_vec()
        .map_err(|e| SwapError::InvalidKey(e.to_string()))?;

    Keypair::try_from(bytes.as_slice()).map_err(|e| SwapError::InvalidKey(e.to_string()))
}
