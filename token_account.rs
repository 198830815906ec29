//! Associated token account resolution.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::{
    get_associated_token_address_with_program_id, instruction::create_associated_token_account,
};
use tracing::{debug, info};

use crate::{
    cancel::CancelToken,
    constants::token_program_id,
    rpc::ChainRpc,
    types::{ResolvedTokenAccount, RpcError, SwapError},
};

/// Derive `owner`'s associated token account for `mint`. Pure; no network.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &token_program_id())
}

/// Derive `owner`'s token account for `mint` and check that it exists.
///
/// When the account is missing the result carries an instruction creating it,
/// with `owner` paying for and owning the new account.
pub async fn resolve_token_account<R>(
    rpc: &R,
    cancel: &CancelToken,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<ResolvedTokenAccount, SwapError>
where
    R: ChainRpc + ?Sized,
{
    let address = associated_token_address(owner, mint);

    match cancel.run(rpc.get_account_data(&address)).await {
        Ok(_) => {
            debug!("Token account {} for mint {} exists", address, mint);
            Ok(ResolvedTokenAccount {
                address,
                create_instruction: None,
            })
        }
        Err(RpcError::AccountNotFound(_)) => {
            info!(
                "Token account {} for mint {} not found, it will be created",
                address, mint
            );
            Ok(ResolvedTokenAccount {
                address,
                create_instruction: Some(create_associated_token_account(
                    owner,
                    owner,
                    mint,
                    &token_program_id(),
                )),
            })
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_associated_token_address_is_deterministic() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let first = associated_token_address(&owner, &mint);
        let second = associated_token_address(&owner, &mint);

        assert_eq!(first, second);
        assert_ne!(first, owner);
        assert_ne!(first, mint);
        assert_ne!(first, associated_token_address(&owner, &Pubkey::new_unique()));
    }

    #[test]
    fn test_matches_spl_derivation() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        assert_eq!(
            associated_token_address(&owner, &mint),
            spl_associated_token_account::get_associated_token_address(&owner, &mint)
        );
    }
}
