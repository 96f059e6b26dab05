use super::account::{Account, AccountNumber};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence port for ledger records.
///
/// Adapters own their connection for as long as they live; the ledger never
/// composes several calls into a transaction.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new record. Fails with `DuplicateAccount` if the number is taken.
    async fn insert(&self, account: Account) -> Result<()>;
    async fn get(&self, number: AccountNumber) -> Result<Option<Account>>;
    /// Overwrites balance and score of an existing record. Fails with `AccountNotFound`.
    async fn update(&self, account: &Account) -> Result<()>;
    /// Every record, ordered by account number.
    async fn all_accounts(&self) -> Result<Vec<Account>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type AccountStoreFactory = Box<dyn Fn() -> AccountStoreBox + Send + Sync>;
