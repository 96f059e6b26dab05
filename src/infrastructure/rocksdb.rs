use crate::domain::account::{Account, AccountNumber};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing account records.
pub const CF_ACCOUNTS: &str = "accounts";

/// A persistent account store using RocksDB.
///
/// Keys are big-endian account numbers, so iterating the column family yields
/// accounts in ascending order. Values are JSON-encoded `Account`s.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts]).map_err(LedgerError::startup)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn accounts(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_ACCOUNTS)
            .ok_or_else(|| LedgerError::query("accounts column family not found"))
    }

    fn put(&self, account: &Account) -> Result<()> {
        let cf = self.accounts()?;
        let value = serde_json::to_vec(account).map_err(LedgerError::query)?;
        self.db
            .put_cf(cf, account.number.value().to_be_bytes(), value)
            .map_err(LedgerError::query)
    }
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn insert(&self, account: Account) -> Result<()> {
        let cf = self.accounts()?;
        let key = account.number.value().to_be_bytes();
        if self.db.get_pinned_cf(cf, key).map_err(LedgerError::query)?.is_some() {
            return Err(LedgerError::DuplicateAccount(account.number));
        }
        self.put(&account)
    }

    async fn get(&self, number: AccountNumber) -> Result<Option<Account>> {
        let cf = self.accounts()?;
        let result = self
            .db
            .get_cf(cf, number.value().to_be_bytes())
            .map_err(LedgerError::query)?;

        result
            .map(|bytes| serde_json::from_slice(&bytes).map_err(LedgerError::query))
            .transpose()
    }

    async fn update(&self, account: &Account) -> Result<()> {
        let cf = self.accounts()?;
        let key = account.number.value().to_be_bytes();
        if self.db.get_pinned_cf(cf, key).map_err(LedgerError::query)?.is_none() {
            return Err(LedgerError::AccountNotFound(account.number));
        }
        self.put(account)
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let cf = self.accounts()?;

        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item.map_err(LedgerError::query)?;
            let account: Account = serde_json::from_slice(&value).map_err(LedgerError::query)?;
            accounts.push(account);
        }

        Ok(accounts)
    }
}
