//! Chain RPC boundary.
//!
//! The pipeline only talks to the network through [`ChainRpc`], so tests can
//! swap in an in-memory chain. [`RpcChain`] is the real implementation on top
//! of the nonblocking `solana-client` RPC client.

use async_trait::async_trait;
use solana_client::{client_error::ClientError, nonblocking::rpc_client::RpcClient};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::{config::ClientConfig, types::RpcError};

#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Raw data of an account, or [`RpcError::AccountNotFound`]
    async fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, RpcError>;

    /// A recent blockhash bounding the transaction's validity window
    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;

    /// Balance in lamports
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, RpcError>;

    async fn request_airdrop(&self, address: &Pubkey, lamports: u64)
        -> Result<Signature, RpcError>;

    /// Submit a signed transaction and wait until it is finalized or fails
    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, RpcError>;
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        RpcError::Request(err.to_string())
    }
}

pub struct RpcChain {
    client: RpcClient,
    commitment: CommitmentConfig,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl RpcChain {
    pub fn new(config: &ClientConfig) -> Self {
        let client =
            RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::finalized());
        Self::with_client(client, config)
    }

    /// Wrap an existing client; `config` supplies the confirmation timing
    pub fn with_client(client: RpcClient, config: &ClientConfig) -> Self {
        Self {
            client,
            commitment: CommitmentConfig::finalized(),
            confirm_timeout: config.confirm_timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl ChainRpc for RpcChain {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, RpcError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await?;

        response
            .value
            .map(|account| account.data)
            .ok_or(RpcError::AccountNotFound(*address))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let (blockhash, _last_valid_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?;
        Ok(blockhash)
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, RpcError> {
        let response = self
            .client
            .get_balance_with_commitment(address, self.commitment)
            .await?;
        Ok(response.value)
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, RpcError> {
        Ok(self.client.request_airdrop(address, lamports).await?)
    }

    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, RpcError> {
        let signature = self.client.send_transaction(transaction).await?;
        debug!("Submitted transaction {}, waiting for finalization", signature);

        let deadline = Instant::now() + self.confirm_timeout;
        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(&signature, self.commitment)
                .await?;

            match status {
                Some(Ok(())) => return Ok(signature),
                Some(Err(err)) => {
                    return Err(RpcError::TransactionFailed {
                        signature,
                        reason: err.to_string(),
                    })
                }
                None if Instant::now() >= deadline => {
                    return Err(RpcError::ConfirmationTimeout {
                        signature,
                        timeout: self.confirm_timeout,
                    })
                }
                None => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}
