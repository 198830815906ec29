//! Swap pipeline: fetch pool state, resolve accounts, build, sign, submit.
//!
//! Every network call goes through the client's [`CancelToken`]; a cancelled
//! token aborts the call in flight and the pipeline returns
//! [`SwapError::Cancelled`].

use base64::{engine::general_purpose, Engine as _};
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::future::Future;
use tracing::{debug, info, warn};

use crate::{
    cancel::CancelToken,
    instruction_data::SwapData,
    rpc::ChainRpc,
    state::PoolState,
    swap_instruction::{swap_instruction, SwapAccounts},
    token_account::resolve_token_account,
    types::{RpcError, SwapError, SwapRequest},
};

/// Output of the assembly steps, ready to be signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSwap {
    pub accounts: SwapAccounts,
    /// Token account creations (source side first), then the swap
    pub instructions: Vec<Instruction>,
}

impl PreparedSwap {
    pub fn swap_instruction(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Base64 of the unsigned message, for pasting into a transaction inspector
    pub fn unsigned_message_base64(&self, payer: &Pubkey) -> Result<String, SwapError> {
        let message = Message::new(&self.instructions, Some(payer));
        let bytes = bincode::serialize(&message).map_err(|e| SwapError::Encode(e.to_string()))?;
        Ok(general_purpose::STANDARD.encode(bytes))
    }

    pub fn show(&self, payer: &Pubkey) -> Result<(), SwapError> {
        self.accounts.show();
        info!(
            "{} instruction(s), {} token account(s) to create",
            self.instructions.len(),
            self.instructions.len().saturating_sub(1)
        );
        info!("Unsigned message: {}", self.unsigned_message_base64(payer)?);
        Ok(())
    }
}

pub struct StableSwapClient<R> {
    rpc: R,
    program_id: Pubkey,
    cancel: CancelToken,
}

impl<R: ChainRpc> StableSwapClient<R> {
    pub fn new(rpc: R, program_id: Pubkey, cancel: CancelToken) -> Self {
        Self {
            rpc,
            program_id,
            cancel,
        }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    async fn call<T, F>(&self, call: F) -> Result<T, SwapError>
    where
        F: Future<Output = Result<T, RpcError>>,
    {
        self.cancel.run(call).await.map_err(SwapError::from)
    }

    /// Fetch and decode the pool account
    pub async fn pool_state(&self, pool: &Pubkey) -> Result<PoolState, SwapError> {
        let data = self.call(self.rpc.get_account_data(pool)).await?;
        PoolState::unpack(&data)
    }

    /// Pool authority PDA, seeded by the pool address and the stored nonce
    pub fn pool_authority(&self, pool: &Pubkey, nonce: u8) -> Result<Pubkey, SwapError> {
        Pubkey::create_program_address(&[pool.as_ref(), &[nonce]], &self.program_id)
            .map_err(|e| SwapError::Derivation(e.to_string()))
    }

    /// Resolve everything a swap needs and assemble its instructions.
    /// Nothing is signed or sent.
    pub async fn prepare_swap(
        &self,
        request: &SwapRequest,
        user: &Pubkey,
    ) -> Result<PreparedSwap, SwapError> {
        if request.source_mint == request.destination_mint {
            return Err(SwapError::SameMint(request.source_mint));
        }

        let pool = self.pool_state(&request.pool).await?;
        if !pool.is_initialized || pool.is_paused {
            warn!(
                "Pool {} is initialized={} paused={}, the program may reject the swap",
                request.pool, pool.is_initialized, pool.is_paused
            );
        }

        let source = pool.side_for(&request.source_mint)?;
        let destination = pool.side_for(&request.destination_mint)?;

        let authority = self.pool_authority(&request.pool, pool.nonce)?;
        debug!("Pool authority {} (nonce {})", authority, pool.nonce);

        let user_source = resolve_token_account(&self.rpc, &self.cancel, user, &source.mint).await?;
        let user_destination =
            resolve_token_account(&self.rpc, &self.cancel, user, &destination.mint).await?;

        let accounts = SwapAccounts {
            swap: request.pool,
            authority,
            user_authority: *user,
            user_source: user_source.address,
            pool_source: source.reserve,
            pool_destination: destination.reserve,
            user_destination: user_destination.address,
            admin_destination: destination.admin_fee_account,
        };
        let data = SwapData::new(request.amount_in, request.minimum_amount_out);
        let swap = swap_instruction(&self.program_id, &accounts, &data)?;

        let mut instructions: Vec<Instruction> = [user_source, user_destination]
            .into_iter()
            .filter_map(|resolved| resolved.create_instruction)
            .collect();
        instructions.push(swap);

        Ok(PreparedSwap {
            accounts,
            instructions,
        })
    }

    /// Sign `instructions` with `payer` over a fresh blockhash, submit, and
    /// wait for finalization
    pub async fn send_instructions(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
    ) -> Result<Signature, SwapError> {
        let blockhash = self.call(self.rpc.get_latest_blockhash()).await?;

        let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
        transaction
            .try_sign(&[payer], blockhash)
            .map_err(|e| SwapError::Signing(e.to_string()))?;

        match self
            .cancel
            .run(self.rpc.send_and_confirm_transaction(&transaction))
            .await
        {
            Ok(signature) => Ok(signature),
            Err(RpcError::Cancelled) => Err(SwapError::Cancelled),
            Err(err) => Err(SwapError::Submission(err.to_string())),
        }
    }

    /// Run the full swap and return the finalized transaction signature
    pub async fn swap(&self, request: &SwapRequest, wallet: &Keypair) -> Result<Signature, SwapError> {
        info!(
            "Swapping {} of {} for at least {} of {} in pool {}",
            request.amount_in,
            request.source_mint,
            request.minimum_amount_out,
            request.destination_mint,
            request.pool
        );

        let prepared = self.prepare_swap(request, &wallet.pubkey()).await?;
        let signature = self.send_instructions(&prepared.instructions, wallet).await?;

        info!("Swap finalized: {}", signature);
        Ok(signature)
    }

    /// Assemble the swap and log its accounts instead of sending it
    pub async fn show_swap(
        &self,
        request: &SwapRequest,
        user: &Pubkey,
    ) -> Result<PreparedSwap, SwapError> {
        let prepared = self.prepare_swap(request, user).await?;
        prepared.show(user)?;
        Ok(prepared)
    }

    /// Balance in lamports
    pub async fn balance(&self, address: &Pubkey) -> Result<u64, SwapError> {
        self.call(self.rpc.get_balance(address)).await
    }

    /// Request `sol` whole SOL from the cluster faucet
    pub async fn airdrop(&self, address: &Pubkey, sol: u64) -> Result<Signature, SwapError> {
        let lamports = sol.saturating_mul(LAMPORTS_PER_SOL);
        self.call(self.rpc.request_airdrop(address, lamports)).await
    }
}
