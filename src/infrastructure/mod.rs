//! Storage adapters implementing [`crate::domain::ports::AccountStore`].

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod sqlite;
