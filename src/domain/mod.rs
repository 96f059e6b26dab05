//! Domain layer: the account record, its value objects and the storage port.

pub mod account;
pub mod ports;
