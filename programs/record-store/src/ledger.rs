//! Host-side ledger boundary.
//!
//! `Ledger` is what the store needs from account storage: allocation,
//! raw reads/writes, owner scans with memcmp predicates, and a clock.
//! On-chain the Solana runtime fills this role; `InMemoryLedger` backs tests
//! and local embedding.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anchor_lang::prelude::*;

use crate::filter::Memcmp;
use crate::state::ErrorCode;

pub trait Ledger: Send + Sync {
    /// Creates a zeroed account of `size` bytes owned by `owner`.
    fn allocate_account(&self, owner: &Pubkey, size: usize, handle: &Pubkey) -> Result<()>;

    /// Allocates exactly `data.len()` bytes and stores `data` in one step.
    /// Readers see either no account or the complete data; on error nothing
    /// is left allocated.
    fn create_account(&self, owner: &Pubkey, handle: &Pubkey, data: &[u8]) -> Result<()>;

    /// Replaces the data of an allocated account; `data` must fill it exactly.
    fn write_account_data(&self, handle: &Pubkey, data: &[u8]) -> Result<()>;

    fn read_account_data(&self, handle: &Pubkey) -> Result<Vec<u8>>;

    /// Returns every account owned by `owner` whose data satisfies all predicates.
    fn scan_accounts_by_owner(
        &self,
        owner: &Pubkey,
        predicates: &[Memcmp],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    /// Unix seconds as observed by the ledger.
    fn current_timestamp(&self) -> i64;
}

struct StoredAccount {
    owner: Pubkey,
    data : Vec<u8>,
}

#[derive(Default)]
struct LedgerState {
    accounts  : BTreeMap<Pubkey, StoredAccount>,
    used_bytes: usize,
}

/// In-memory ledger for tests, local demos, and embedding.
pub struct InMemoryLedger {
    inner : RwLock<LedgerState>,
    clock : AtomicI64,
    budget: Option<usize>,
}

impl InMemoryLedger {
    pub fn new(timestamp: i64) -> Self {
        Self {
            inner : RwLock::new(LedgerState::default()),
            clock : AtomicI64::new(timestamp),
            budget: None,
        }
    }

    /// Caps the total bytes this ledger will allocate; allocations past the
    /// cap fail with `InsufficientFunds`.
    pub fn with_storage_budget(mut self, bytes: usize) -> Self {
        self.budget = Some(bytes);
        self
    }

    pub fn set_timestamp(&self, timestamp: i64) {
        self.clock.store(timestamp, Ordering::SeqCst);
    }

    /// Stores an account as-is, bypassing allocation. Seeds foreign or
    /// malformed accounts for scans.
    pub fn insert_raw(&self, handle: Pubkey, owner: Pubkey, data: Vec<u8>) -> Result<()> {
        let mut state = self.write_state()?;
        state.used_bytes += data.len();
        if let Some(old) = state.accounts.insert(handle, StoredAccount { owner, data }) {
            state.used_bytes -= old.data.len();
        }
        Ok(())
    }

    pub fn account_count(&self) -> Result<usize> {
        Ok(self.read_state()?.accounts.len())
    }

    pub fn used_bytes(&self) -> Result<usize> {
        Ok(self.read_state()?.used_bytes)
    }

    /// Reserves `size` bytes for `handle` and inserts `data` under one write lock.
    fn insert_new(&self, owner: &Pubkey, handle: &Pubkey, size: usize, data: Vec<u8>) -> Result<()> {
        let mut state = self.write_state()?;
        require!(!state.accounts.contains_key(handle), ErrorCode::AccountInUse);

        let used = state.used_bytes.saturating_add(size);
        if let Some(budget) = self.budget {
            require!(used <= budget, ErrorCode::InsufficientFunds);
        }

        state.accounts.insert(*handle, StoredAccount { owner: *owner, data });
        state.used_bytes = used;
        Ok(())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>> {
        self.inner.read().map_err(|_| error!(ErrorCode::LedgerUnavailable))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>> {
        self.inner.write().map_err(|_| error!(ErrorCode::LedgerUnavailable))
    }
}

impl Ledger for InMemoryLedger {
    fn allocate_account(&self, owner: &Pubkey, size: usize, handle: &Pubkey) -> Result<()> {
        self.insert_new(owner, handle, size, vec![0; size])
    }

    fn create_account(&self, owner: &Pubkey, handle: &Pubkey, data: &[u8]) -> Result<()> {
        self.insert_new(owner, handle, data.len(), data.to_vec())
    }

    fn write_account_data(&self, handle: &Pubkey, data: &[u8]) -> Result<()> {
        let mut state = self.write_state()?;
        let account = state
            .accounts
            .get_mut(handle)
            .ok_or_else(|| error!(ErrorCode::AccountNotFound))?;
        require!(account.data.len() == data.len(), ErrorCode::AccountSizeMismatch);
        account.data.copy_from_slice(data);
        Ok(())
    }

    fn read_account_data(&self, handle: &Pubkey) -> Result<Vec<u8>> {
        let state = self.read_state()?;
        state
            .accounts
            .get(handle)
            .map(|account| account.data.clone())
            .ok_or_else(|| error!(ErrorCode::AccountNotFound))
    }

    fn scan_accounts_by_owner(
        &self,
        owner: &Pubkey,
        predicates: &[Memcmp],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let state = self.read_state()?;
        Ok(state
            .accounts
            .iter()
            .filter(|(_, account)| account.owner == *owner)
            .filter(|(_, account)| predicates.iter().all(|p| p.matches(&account.data)))
            .map(|(handle, account)| (*handle, account.data.clone()))
            .collect())
    }

    fn current_timestamp(&self) -> i64 {
        self.clock.load(Ordering::SeqCst)
    }
}
