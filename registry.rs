//! Read-only pool registry published as JSON.
//!
//! Only the fields needed to list pools are modelled; everything else in the
//! document is ignored.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::Cluster;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("No pool registry is published for cluster {0}")]
    UnsupportedCluster(Cluster),

    #[error("Failed to fetch pool registry: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse pool registry: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolRegistry {
    #[serde(default)]
    pub pools: Vec<RegistryPool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryPool {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tokens: Vec<RegistryToken>,
    pub lp_token: RegistryToken,
    pub swap: RegistrySwap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryToken {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySwap {
    pub config: RegistrySwapConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySwapConfig {
    pub swap_account: String,
    #[serde(rename = "swapProgramID")]
    pub swap_program_id: String,
    pub authority: String,
}

impl PoolRegistry {
    pub fn from_json(body: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Download the registry for `cluster`
    pub async fn fetch(cluster: Cluster) -> Result<Self, RegistryError> {
        let url = cluster
            .registry_url()
            .ok_or(RegistryError::UnsupportedCluster(cluster))?;
        info!("Fetching pool registry from {}", url);

        let body = reqwest::get(url).await?.error_for_status()?.text().await?;
        Self::from_json(&body)
    }

    pub fn list_pools(&self) {
        for pool in &self.pools {
            info!("----------");
            info!("Pool id: {} ({})", pool.id, pool.name);
            info!("Tokens:");
            for token in &pool.tokens {
                info!(
                    "\tToken {} (symbol {}) address: {}",
                    token.name, token.symbol, token.address
                );
            }
            info!(
                "LP token {} (symbol {}) address: {}",
                pool.lp_token.name, pool.lp_token.symbol, pool.lp_token.address
            );
            info!("Swap account: {}", pool.swap.config.swap_account);
        }
    }
}
