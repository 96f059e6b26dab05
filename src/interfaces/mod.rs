//! Interaction surfaces that drive the ledger.

pub mod csv;
pub mod form;
