//! Transaction Integration Tests
//!
//! Store handles and DAO transactions over the memory datastore: gating of
//! commit/rollback, the DAO boundary check, isolation and conflicts.

#[path = "../common/mod.rs"]
mod common;

mod handles;
mod isolation;
