use crate::domain::account::{Account, AccountNumber};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory account store.
///
/// Records live in a `BTreeMap` so listings come out ordered by account number.
/// Nothing survives the process; used for tests and `--backend memory`.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<BTreeMap<AccountNumber, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.entry(account.number) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateAccount(account.number)),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    async fn get(&self, number: AccountNumber) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&number).cloned())
    }

    async fn update(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get_mut(&account.number)
            .ok_or(LedgerError::AccountNotFound(account.number))?;
        stored.balance = account.balance;
        stored.cibil_score = account.cibil_score;
        Ok(())
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }
}
