use crate::domain::account::{AccountNumber, Amount, Balance};
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Boxed storage-layer cause, kept opaque so adapters don't leak their driver types.
pub type StorageCause = Box<dyn std::error::Error + Send + Sync>;

/// Where a storage failure happened.
///
/// Startup failures (opening the database, creating the table) mean the ledger
/// never became usable; query failures only affect the operation that hit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePhase {
    Startup,
    Query,
}

impl fmt::Display for StoragePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoragePhase::Startup => f.write_str("startup"),
            StoragePhase::Query => f.write_str("query"),
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum LedgerError {
    #[error("account {0} already exists")]
    #[diagnostic(code(ledger::duplicate_account))]
    DuplicateAccount(AccountNumber),

    #[error("account {0} not found")]
    #[diagnostic(code(ledger::account_not_found))]
    AccountNotFound(AccountNumber),

    #[error("insufficient balance: requested {requested}, available {available}")]
    #[diagnostic(code(ledger::insufficient_balance))]
    InsufficientBalance { requested: Amount, available: Balance },

    #[error("invalid input: {0}")]
    #[diagnostic(
        code(ledger::invalid_input),
        help("account numbers are whole numbers, amounts are decimal numbers")
    )]
    InvalidInput(String),

    #[error("storage unavailable during {phase}: {source}")]
    #[diagnostic(code(ledger::storage_unavailable))]
    StorageUnavailable {
        phase: StoragePhase,
        #[source]
        source: StorageCause,
    },
}

impl LedgerError {
    pub fn startup(source: impl Into<StorageCause>) -> Self {
        Self::StorageUnavailable {
            phase: StoragePhase::Startup,
            source: source.into(),
        }
    }

    pub fn query(source: impl Into<StorageCause>) -> Self {
        Self::StorageUnavailable {
            phase: StoragePhase::Query,
            source: source.into(),
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidInput(detail.into())
    }
}
