//! Swap pipeline tests against an in-memory chain.
//!
//! `MockChain` serves raw account data from a map, records every submitted
//! transaction, and can be told to fail specific lookups or the submission.

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use stable_swap_client::{
    associated_token_address, resolve_token_account, token_program_id, CancelToken, ChainRpc,
    Fees, PoolState, RpcError, StableSwapClient, SwapError, SwapRequest, SwapTokenInfo,
    SWAP_ACCOUNTS_LEN,
};
use std::{collections::HashMap, sync::Mutex};

#[derive(Default)]
struct MockChain {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    lookup_failures: HashMap<Pubkey, RpcError>,
    submit_failure: Option<RpcError>,
    balance: u64,
    submitted: Mutex<Vec<Transaction>>,
    airdrops: Mutex<Vec<(Pubkey, u64)>>,
}

impl MockChain {
    fn insert_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    fn submitted(&self) -> Vec<Transaction> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, RpcError> {
        if let Some(err) = self.lookup_failures.get(address) {
            return Err(err.clone());
        }
        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or(RpcError::AccountNotFound(*address))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        Ok(Hash::new_unique())
    }

    async fn get_balance(&self, _address: &Pubkey) -> Result<u64, RpcError> {
        Ok(self.balance)
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, RpcError> {
        self.airdrops.lock().unwrap().push((*address, lamports));
        Ok(Signature::new_unique())
    }

    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, RpcError> {
        if let Some(err) = &self.submit_failure {
            return Err(err.clone());
        }
        self.submitted.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

struct Fixture {
    program_id: Pubkey,
    pool: Pubkey,
    state: PoolState,
    wallet: Keypair,
}

impl Fixture {
    /// A pool whose address admits a valid authority for `nonce`
    fn new(nonce: u8) -> Self {
        let program_id = Pubkey::new_unique();
        let pool = loop {
            let candidate = Pubkey::new_unique();
            if Pubkey::create_program_address(&[candidate.as_ref(), &[nonce]], &program_id).is_ok()
            {
                break candidate;
            }
        };
        Self::with_pool(program_id, pool, nonce)
    }

    fn with_pool(program_id: Pubkey, pool: Pubkey, nonce: u8) -> Self {
        let side = || SwapTokenInfo {
            mint: Pubkey::new_unique(),
            reserve: Pubkey::new_unique(),
            admin_fee_account: Pubkey::new_unique(),
        };
        let state = PoolState {
            is_initialized: true,
            is_paused: false,
            nonce,
            initial_amp_factor: 100,
            target_amp_factor: 100,
            start_ramp_ts: 0,
            stop_ramp_ts: 0,
            future_admin_deadline: 0,
            future_admin_key: Pubkey::default(),
            admin_key: Pubkey::new_unique(),
            pool_token_mint: Pubkey::new_unique(),
            token_a: side(),
            token_b: side(),
            fees: Fees {
                trade_fee_numerator: 4,
                trade_fee_denominator: 10_000,
                ..Fees::default()
            },
        };
        Self {
            program_id,
            pool,
            state,
            wallet: Keypair::new(),
        }
    }

    fn a_to_b(&self) -> SwapRequest {
        SwapRequest {
            pool: self.pool,
            source_mint: self.state.token_a.mint,
            destination_mint: self.state.token_b.mint,
            amount_in: 1_000_000,
            minimum_amount_out: 900_000,
        }
    }

    fn user_ata(&self, mint: &Pubkey) -> Pubkey {
        associated_token_address(&self.wallet.pubkey(), mint)
    }

    /// Chain holding the pool and, when `with_atas`, both user token accounts
    fn chain(&self, with_atas: bool) -> MockChain {
        let chain = MockChain::default();
        chain.insert_account(self.pool, self.state.pack().unwrap());
        if with_atas {
            chain.insert_account(self.user_ata(&self.state.token_a.mint), vec![0; 165]);
            chain.insert_account(self.user_ata(&self.state.token_b.mint), vec![0; 165]);
        }
        chain
    }

    fn client(&self, chain: MockChain) -> StableSwapClient<MockChain> {
        StableSwapClient::new(chain, self.program_id, CancelToken::new())
    }
}

#[tokio::test]
async fn test_swap_with_existing_token_accounts() {
    let fixture = Fixture::new(5);
    let client = fixture.client(fixture.chain(true));
    let user = fixture.wallet.pubkey();

    let signature = client.swap(&fixture.a_to_b(), &fixture.wallet).await.unwrap();

    let submitted = client.rpc().submitted();
    assert_eq!(submitted.len(), 1);
    let transaction = &submitted[0];
    assert_eq!(transaction.signatures[0], signature);
    assert_eq!(transaction.message.account_keys[0], user);
    assert_eq!(transaction.message.instructions.len(), 1);

    let compiled = &transaction.message.instructions[0];
    assert_eq!(
        transaction.message.account_keys[compiled.program_id_index as usize],
        fixture.program_id
    );
    assert_eq!(
        compiled.data,
        vec![
            0x01, 0x40, 0x42, 0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0xA0, 0xBB, 0x0D, 0x00, 0x00,
            0x00, 0x00, 0x00
        ]
    );
    assert_eq!(compiled.accounts.len(), SWAP_ACCOUNTS_LEN);

    let keys: Vec<Pubkey> = compiled
        .accounts
        .iter()
        .map(|index| transaction.message.account_keys[*index as usize])
        .collect();
    let authority =
        Pubkey::create_program_address(&[fixture.pool.as_ref(), &[5]], &fixture.program_id)
            .unwrap();
    assert_eq!(
        keys,
        vec![
            fixture.pool,
            authority,
            user,
            fixture.user_ata(&fixture.state.token_a.mint),
            fixture.state.token_a.reserve,
            fixture.state.token_b.reserve,
            fixture.user_ata(&fixture.state.token_b.mint),
            fixture.state.token_b.admin_fee_account,
            token_program_id(),
        ]
    );
}

#[tokio::test]
async fn test_prepare_swap_account_flags() {
    let fixture = Fixture::new(5);
    let client = fixture.client(fixture.chain(true));

    let prepared = client
        .prepare_swap(&fixture.a_to_b(), &fixture.wallet.pubkey())
        .await
        .unwrap();
    assert_eq!(prepared.instructions.len(), 1);

    let swap = prepared.swap_instruction().unwrap();
    let writable: Vec<bool> = swap.accounts.iter().map(|meta| meta.is_writable).collect();
    let signer: Vec<bool> = swap.accounts.iter().map(|meta| meta.is_signer).collect();
    assert_eq!(
        writable,
        vec![false, false, false, true, true, true, true, true, false]
    );
    assert_eq!(
        signer,
        vec![false, false, true, false, false, false, false, false, false]
    );
}

#[tokio::test]
async fn test_swap_b_to_a_uses_side_a_admin_fee_account() {
    let fixture = Fixture::new(5);
    let client = fixture.client(fixture.chain(true));
    let request = SwapRequest {
        source_mint: fixture.state.token_b.mint,
        destination_mint: fixture.state.token_a.mint,
        ..fixture.a_to_b()
    };

    let prepared = client
        .prepare_swap(&request, &fixture.wallet.pubkey())
        .await
        .unwrap();

    let accounts = prepared.accounts;
    assert_eq!(accounts.pool_source, fixture.state.token_b.reserve);
    assert_eq!(accounts.pool_destination, fixture.state.token_a.reserve);
    assert_eq!(
        accounts.admin_destination,
        fixture.state.token_a.admin_fee_account
    );
}

#[tokio::test]
async fn test_swap_unknown_mint_submits_nothing() {
    let fixture = Fixture::new(5);
    let client = fixture.client(fixture.chain(true));
    let stranger = Pubkey::new_unique();
    let request = SwapRequest {
        destination_mint: stranger,
        ..fixture.a_to_b()
    };

    let err = client.swap(&request, &fixture.wallet).await.unwrap_err();

    assert_eq!(err, SwapError::TokenNotInPool(stranger));
    assert!(client.rpc().submitted().is_empty());
}

#[tokio::test]
async fn test_swap_same_mint_rejected_before_lookups() {
    let fixture = Fixture::new(5);
    // no pool account: any lookup would fail with AccountNotFound
    let client = fixture.client(MockChain::default());
    let mint = fixture.state.token_a.mint;
    let request = SwapRequest {
        destination_mint: mint,
        ..fixture.a_to_b()
    };

    let err = client.swap(&request, &fixture.wallet).await.unwrap_err();
    assert_eq!(err, SwapError::SameMint(mint));

    let err = client
        .show_swap(&request, &fixture.wallet.pubkey())
        .await
        .unwrap_err();
    assert_eq!(err, SwapError::SameMint(mint));
    assert!(client.rpc().submitted().is_empty());
}

#[tokio::test]
async fn test_missing_destination_account_is_created_first() {
    let fixture = Fixture::new(5);
    let chain = fixture.chain(false);
    chain.insert_account(fixture.user_ata(&fixture.state.token_a.mint), vec![0; 165]);
    let client = fixture.client(chain);

    client.swap(&fixture.a_to_b(), &fixture.wallet).await.unwrap();

    let submitted = client.rpc().submitted();
    assert_eq!(submitted.len(), 1);
    let message = &submitted[0].message;
    assert_eq!(message.instructions.len(), 2);

    let program_of = |index: usize| {
        message.account_keys[message.instructions[index].program_id_index as usize]
    };
    assert_eq!(program_of(0), spl_associated_token_account::id());
    assert_eq!(program_of(1), fixture.program_id);
}

#[tokio::test]
async fn test_both_missing_accounts_created_in_order() {
    let fixture = Fixture::new(5);
    let client = fixture.client(fixture.chain(false));
    let user = fixture.wallet.pubkey();

    let prepared = client.prepare_swap(&fixture.a_to_b(), &user).await.unwrap();

    assert_eq!(prepared.instructions.len(), 3);
    let source_ata = fixture.user_ata(&fixture.state.token_a.mint);
    let destination_ata = fixture.user_ata(&fixture.state.token_b.mint);
    assert_ne!(source_ata, destination_ata);

    // account 1 of the create instruction is the new token account
    assert_eq!(prepared.instructions[0].program_id, spl_associated_token_account::id());
    assert_eq!(prepared.instructions[0].accounts[1].pubkey, source_ata);
    assert_eq!(prepared.instructions[1].program_id, spl_associated_token_account::id());
    assert_eq!(prepared.instructions[1].accounts[1].pubkey, destination_ata);
    assert_eq!(prepared.instructions[2].program_id, fixture.program_id);

    assert_eq!(prepared.accounts.user_source, source_ata);
    assert_eq!(prepared.accounts.user_destination, destination_ata);
}

#[tokio::test]
async fn test_resolve_token_account_is_deterministic() {
    let chain = MockChain::default();
    let cancel = CancelToken::new();
    let owner = Pubkey::new_unique();
    let mint = Pubkey::new_unique();

    let first = resolve_token_account(&chain, &cancel, &owner, &mint)
        .await
        .unwrap();
    let second = resolve_token_account(&chain, &cancel, &owner, &mint)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert!(first.create_instruction.is_some());

    chain.insert_account(first.address, vec![0; 165]);
    let existing = resolve_token_account(&chain, &cancel, &owner, &mint)
        .await
        .unwrap();
    assert_eq!(existing.address, first.address);
    assert!(existing.create_instruction.is_none());
}

#[tokio::test]
async fn test_token_account_lookup_failure_aborts() {
    let fixture = Fixture::new(5);
    let source_ata = fixture.user_ata(&fixture.state.token_a.mint);
    let mut chain = fixture.chain(false);
    chain
        .lookup_failures
        .insert(source_ata, RpcError::Request("connection reset".into()));
    let client = fixture.client(chain);

    let err = client.swap(&fixture.a_to_b(), &fixture.wallet).await.unwrap_err();

    assert_eq!(
        err,
        SwapError::Network(RpcError::Request("connection reset".into()))
    );
    assert!(client.rpc().submitted().is_empty());
}

#[tokio::test]
async fn test_missing_pool_account() {
    let fixture = Fixture::new(5);
    let client = fixture.client(MockChain::default());

    let err = client.swap(&fixture.a_to_b(), &fixture.wallet).await.unwrap_err();

    assert_eq!(
        err,
        SwapError::Network(RpcError::AccountNotFound(fixture.pool))
    );
}

#[tokio::test]
async fn test_truncated_pool_data() {
    let fixture = Fixture::new(5);
    let chain = fixture.chain(true);
    chain.insert_account(fixture.pool, vec![1; 100]);
    let client = fixture.client(chain);

    let err = client.swap(&fixture.a_to_b(), &fixture.wallet).await.unwrap_err();

    assert!(matches!(err, SwapError::Decode(_)));
    assert!(client.rpc().submitted().is_empty());
}

#[tokio::test]
async fn test_authority_derivation_failure() {
    let program_id = Pubkey::new_unique();
    let pool = loop {
        let candidate = Pubkey::new_unique();
        if Pubkey::create_program_address(&[candidate.as_ref(), &[5]], &program_id).is_err() {
            break candidate;
        }
    };
    let fixture = Fixture::with_pool(program_id, pool, 5);
    let client = fixture.client(fixture.chain(true));

    let err = client.swap(&fixture.a_to_b(), &fixture.wallet).await.unwrap_err();

    assert!(matches!(err, SwapError::Derivation(_)));
    assert!(client.rpc().submitted().is_empty());
}

#[tokio::test]
async fn test_cancelled_swap() {
    let fixture = Fixture::new(5);
    let cancel = CancelToken::new();
    let client = StableSwapClient::new(fixture.chain(true), fixture.program_id, cancel.clone());

    cancel.cancel();
    let err = client.swap(&fixture.a_to_b(), &fixture.wallet).await.unwrap_err();

    assert_eq!(err, SwapError::Cancelled);
    assert!(client.rpc().submitted().is_empty());
}

#[tokio::test]
async fn test_rejected_transaction_is_submission_error() {
    let fixture = Fixture::new(5);
    let mut chain = fixture.chain(true);
    chain.submit_failure = Some(RpcError::TransactionFailed {
        signature: Signature::default(),
        reason: "custom program error: 0x4".into(),
    });
    let client = fixture.client(chain);

    let err = client.swap(&fixture.a_to_b(), &fixture.wallet).await.unwrap_err();

    match err {
        SwapError::Submission(message) => assert!(message.contains("0x4")),
        other => panic!("expected a submission error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_show_swap_sends_nothing() {
    let fixture = Fixture::new(5);
    let client = fixture.client(fixture.chain(false));
    let user = fixture.wallet.pubkey();

    let prepared = client.show_swap(&fixture.a_to_b(), &user).await.unwrap();

    assert_eq!(prepared.instructions.len(), 3);
    assert!(!prepared.unsigned_message_base64(&user).unwrap().is_empty());
    assert!(client.rpc().submitted().is_empty());
}

#[tokio::test]
async fn test_balance_and_airdrop() {
    let chain = MockChain {
        balance: 2_500_000_000,
        ..MockChain::default()
    };
    let client = StableSwapClient::new(chain, Pubkey::new_unique(), CancelToken::new());
    let address = Pubkey::new_unique();

    assert_eq!(client.balance(&address).await.unwrap(), 2_500_000_000);

    client.airdrop(&address, 2).await.unwrap();
    assert_eq!(
        *client.rpc().airdrops.lock().unwrap(),
        vec![(address, 2 * LAMPORTS_PER_SOL)]
    );
}
