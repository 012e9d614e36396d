//! Transaction handles for Cairn
//!
//! This crate wraps native datastore sessions for the DAO layer:
//! - StoreHandle: a session plus a fixed `transactional` flag; commit and
//!   rollback are rejected on plain handles and are no-ops once the native
//!   transaction has finished
//! - DaoTransaction: a transactional StoreHandle handed to DAO callers
//! - Transaction: the tagged handle DAO methods accept, checked at the
//!   boundary by `TransactionBackend::expect_transaction`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod handle;
pub mod transaction;

pub use handle::StoreHandle;
pub use transaction::{DaoTransaction, ExternalTransaction, Transaction, TransactionBackend};
