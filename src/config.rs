use crate::domain::ports::AccountStoreBox;
use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryAccountStore;
use crate::infrastructure::sqlite::SqliteAccountStore;
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = "bank_management.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Single SQLite table (default).
    Sqlite,
    /// Nothing persisted; gone when the process exits.
    Memory,
    /// RocksDB directory; needs the `storage-rocksdb` feature.
    Rocksdb,
}

/// Where the ledger keeps its records.
#[derive(Debug, Clone, Args)]
pub struct LedgerConfig {
    /// Storage backend.
    #[arg(long, env = "LEDGER_BACKEND", value_enum, default_value_t = Backend::Sqlite, global = true)]
    pub backend: Backend,

    /// Database file (sqlite) or directory (rocksdb).
    #[arg(long, env = "LEDGER_DB_PATH", default_value = DEFAULT_DB_PATH, global = true)]
    pub db_path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl LedgerConfig {
    /// Acquires the backing store. Failures here are startup failures.
    pub async fn open_store(&self) -> Result<AccountStoreBox> {
        tracing::debug!(backend = ?self.backend, path = %self.db_path.display(), "opening account store");
        match self.backend {
            Backend::Sqlite => Ok(Box::new(SqliteAccountStore::open(&self.db_path).await?)),
            Backend::Memory => Ok(Box::new(InMemoryAccountStore::new())),
            Backend::Rocksdb => open_rocksdb(&self.db_path),
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_rocksdb(path: &Path) -> Result<AccountStoreBox> {
    use crate::infrastructure::rocksdb::RocksDBStore;
    Ok(Box::new(RocksDBStore::open(path)?))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_rocksdb(_path: &Path) -> Result<AccountStoreBox> {
    Err(crate::error::LedgerError::startup(
        "rocksdb backend requires the `storage-rocksdb` feature",
    ))
}
