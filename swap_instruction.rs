//! Build stable-swap `swap` instructions.
//!
//! # Account Structure
//!
//! The swap instruction requires these accounts in order:
//! 0. swap (pool) account
//! 1. pool authority (PDA of the pool account and its nonce)
//! 2. user authority (signer)
//! 3. user source token account (writable)
//! 4. pool reserve of the source mint (writable)
//! 5. pool reserve of the destination mint (writable)
//! 6. user destination token account (writable)
//! 7. admin fee account of the destination mint (writable)
//! 8. token program

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use tracing::info;

use crate::{
    constants::token_program_id,
    instruction_data::{InstructionData, SwapData},
    types::SwapError,
};

/// Number of accounts in a built swap instruction
pub const SWAP_ACCOUNTS_LEN: usize = 9;

/// A caller-provided account position of the swap instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapSlot {
    Swap,
    Authority,
    UserAuthority,
    UserSource,
    PoolSource,
    PoolDestination,
    UserDestination,
    AdminDestination,
}

impl SwapSlot {
    pub const ALL: [SwapSlot; 8] = [
        SwapSlot::Swap,
        SwapSlot::Authority,
        SwapSlot::UserAuthority,
        SwapSlot::UserSource,
        SwapSlot::PoolSource,
        SwapSlot::PoolDestination,
        SwapSlot::UserDestination,
        SwapSlot::AdminDestination,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            SwapSlot::Swap => "swap account",
            SwapSlot::Authority => "authority",
            SwapSlot::UserAuthority => "user authority",
            SwapSlot::UserSource => "user source",
            SwapSlot::PoolSource => "pool source",
            SwapSlot::PoolDestination => "pool destination",
            SwapSlot::UserDestination => "user destination",
            SwapSlot::AdminDestination => "admin destination",
        }
    }

    pub fn is_writable(self) -> bool {
        matches!(
            self,
            SwapSlot::UserSource
                | SwapSlot::PoolSource
                | SwapSlot::PoolDestination
                | SwapSlot::UserDestination
                | SwapSlot::AdminDestination
        )
    }

    pub fn is_signer(self) -> bool {
        self == SwapSlot::UserAuthority
    }

    fn meta(self, address: Pubkey) -> AccountMeta {
        if self.is_writable() {
            AccountMeta::new(address, self.is_signer())
        } else {
            AccountMeta::new_readonly(address, self.is_signer())
        }
    }
}

/// Every account a swap needs; all positions are required
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapAccounts {
    pub swap: Pubkey,
    pub authority: Pubkey,
    pub user_authority: Pubkey,
    pub user_source: Pubkey,
    pub pool_source: Pubkey,
    pub pool_destination: Pubkey,
    pub user_destination: Pubkey,
    pub admin_destination: Pubkey,
}

impl SwapAccounts {
    pub fn get(&self, slot: SwapSlot) -> Pubkey {
        match slot {
            SwapSlot::Swap => self.swap,
            SwapSlot::Authority => self.authority,
            SwapSlot::UserAuthority => self.user_authority,
            SwapSlot::UserSource => self.user_source,
            SwapSlot::PoolSource => self.pool_source,
            SwapSlot::PoolDestination => self.pool_destination,
            SwapSlot::UserDestination => self.user_destination,
            SwapSlot::AdminDestination => self.admin_destination,
        }
    }

    /// Account metas in program order, token program last
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        let mut accounts: Vec<AccountMeta> = SwapSlot::ALL
            .iter()
            .map(|slot| slot.meta(self.get(*slot)))
            .collect();
        accounts.push(AccountMeta::new_readonly(token_program_id(), false));
        accounts
    }

    /// Log every account, for checking a swap before it is sent
    pub fn show(&self) {
        for slot in SwapSlot::ALL {
            info!("{:<18} {}", format!("{}:", slot.label()), self.get(slot));
        }
        info!("{:<18} {}", "token program:", token_program_id());
    }
}

/// Build the swap instruction for `program_id`
pub fn swap_instruction(
    program_id: &Pubkey,
    accounts: &SwapAccounts,
    data: &SwapData,
) -> Result<Instruction, SwapError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: data.pack()?,
    })
}

/// Incremental construction of a swap instruction.
///
/// Each `with_*` call fills one fixed slot and hands the builder back.
#[derive(Debug, Clone)]
pub struct SwapInstructionBuilder {
    program_id: Pubkey,
    slots: [Option<Pubkey>; 8],
    data: Vec<u8>,
}

impl SwapInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            slots: [None; 8],
            data: Vec::new(),
        }
    }

    pub fn with_account(mut self, slot: SwapSlot, address: Pubkey) -> Self {
        self.slots[slot.index()] = Some(address);
        self
    }

    pub fn with_swap_account(self, address: Pubkey) -> Self {
        self.with_account(SwapSlot::Swap, address)
    }

    pub fn with_authority(self, address: Pubkey) -> Self {
        self.with_account(SwapSlot::Authority, address)
    }

    pub fn with_user_authority(self, address: Pubkey) -> Self {
        self.with_account(SwapSlot::UserAuthority, address)
    }

    pub fn with_user_source(self, address: Pubkey) -> Self {
        self.with_account(SwapSlot::UserSource, address)
    }

    pub fn with_pool_source(self, address: Pubkey) -> Self {
        self.with_account(SwapSlot::PoolSource, address)
    }

    pub fn with_pool_destination(self, address: Pubkey) -> Self {
        self.with_account(SwapSlot::PoolDestination, address)
    }

    pub fn with_user_destination(self, address: Pubkey) -> Self {
        self.with_account(SwapSlot::UserDestination, address)
    }

    pub fn with_admin_destination(self, address: Pubkey) -> Self {
        self.with_account(SwapSlot::AdminDestination, address)
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// The filled accounts, or `MissingAccount` naming every empty slot
    pub fn accounts(&self) -> Result<SwapAccounts, SwapError> {
        let missing: Vec<&'static str> = SwapSlot::ALL
            .iter()
            .filter(|slot| self.slots[slot.index()].is_none())
            .map(|slot| slot.label())
            .collect();
        if !missing.is_empty() {
            return Err(SwapError::MissingAccount(missing));
        }

        let at = |slot: SwapSlot| self.slots[slot.index()].unwrap_or_default();
        Ok(SwapAccounts {
            swap: at(SwapSlot::Swap),
            authority: at(SwapSlot::Authority),
            user_authority: at(SwapSlot::UserAuthority),
            user_source: at(SwapSlot::UserSource),
            pool_source: at(SwapSlot::PoolSource),
            pool_destination: at(SwapSlot::PoolDestination),
            user_destination: at(SwapSlot::UserDestination),
            admin_destination: at(SwapSlot::AdminDestination),
        })
    }

    /// Log the accounts without building. Refuses to print a partial list.
    pub fn show_accounts(&self) -> Result<(), SwapError> {
        self.accounts()?.show();
        Ok(())
    }

    pub fn build(self) -> Result<Instruction, SwapError> {
        if self.data.is_empty() {
            return Err(SwapError::MissingData);
        }
        let accounts = self.accounts()?;

        Ok(Instruction {
            program_id: self.program_id,
            accounts: accounts.to_account_metas(),
            data: self.data,
        })
    }
}
