//! Application layer containing the ledger operations.
//!
//! [`ledger::LedgerService`] owns the storage backend and runs each operation
//! to completion before returning a typed result.

pub mod ledger;
