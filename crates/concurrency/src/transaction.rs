//! DAO-level transactions
//!
//! `DaoTransaction` is what a DAO hands to its callers: one transactional
//! `StoreHandle`, with commit and rollback forwarded to it. Callers pass it
//! back into DAO methods wrapped in the [`Transaction`] enum, one variant per
//! backend. DAO methods never trust the variant they receive:
//! [`TransactionBackend::expect_transaction`] rejects a missing handle with
//! `NullTransaction` and a handle for another backend with
//! `TransactionTypeMismatch`, naming the type that was actually received.
//!
//! Dropping a `DaoTransaction` whose native transaction is still open rolls
//! it back.

use cairn_core::{Error, Result, Session};
use cairn_storage::MemorySession;
use tracing::{debug, warn};

use crate::handle::StoreHandle;

/// A transactional store handle owned by a DAO caller
#[derive(Debug)]
pub struct DaoTransaction<S: Session> {
    handle: StoreHandle<S>,
}

impl<S: Session> DaoTransaction<S> {
    /// Wrap a transactional handle
    ///
    /// # Errors
    /// `TransactionState` if `handle` is not transactional.
    pub fn new(handle: StoreHandle<S>) -> Result<Self> {
        if !handle.is_transactional() {
            return Err(Error::transaction_state(
                "DAO transactions require a transactional store handle",
            ));
        }
        Ok(DaoTransaction { handle })
    }

    /// Commit the underlying handle
    pub fn commit(&mut self) -> Result<()> {
        self.handle.commit()?;
        debug!("DAO transaction committed");
        Ok(())
    }

    /// Roll back the underlying handle
    pub fn rollback(&mut self) -> Result<()> {
        self.handle.rollback()?;
        debug!("DAO transaction rolled back");
        Ok(())
    }

    /// Whether the native transaction is still open
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    /// Underlying handle
    pub fn handle(&self) -> &StoreHandle<S> {
        &self.handle
    }

    /// Session for reads and writes inside the transaction
    pub fn session_mut(&mut self) -> &mut S {
        self.handle.session_mut()
    }
}

impl<S: Session> Drop for DaoTransaction<S> {
    fn drop(&mut self) {
        if self.handle.is_active() {
            warn!("DAO transaction dropped while active, rolling back");
            if let Err(e) = self.handle.rollback() {
                warn!(error = %e, "Rollback on drop failed");
            }
        }
    }
}

/// A transaction opened by a persistence layer this crate does not drive
///
/// Carried so that handles crossing the DAO boundary from elsewhere can be
/// reported precisely when they are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTransaction {
    type_name: String,
}

impl ExternalTransaction {
    /// Describe a foreign transaction by its type name
    pub fn new(type_name: impl Into<String>) -> Self {
        ExternalTransaction {
            type_name: type_name.into(),
        }
    }

    /// Describe a foreign transaction of Rust type `T`
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Type name of the foreign transaction
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// Transaction handle accepted at the DAO boundary
#[derive(Debug)]
pub enum Transaction {
    /// Transaction on the in-process memory datastore
    Memory(DaoTransaction<MemorySession>),
    /// Transaction owned by another persistence layer
    External(ExternalTransaction),
}

impl Transaction {
    /// Type name of the handle this variant carries
    pub fn type_name(&self) -> &str {
        match self {
            Transaction::Memory(_) => MemorySession::TRANSACTION_TYPE,
            Transaction::External(external) => external.type_name(),
        }
    }

    /// Commit through the backend
    ///
    /// # Errors
    /// `TransactionState` for external transactions, which are committed by
    /// the layer that opened them.
    pub fn commit(&mut self) -> Result<()> {
        match self {
            Transaction::Memory(txn) => txn.commit(),
            Transaction::External(external) => Err(Error::transaction_state(format!(
                "{} is committed by its own persistence layer",
                external.type_name()
            ))),
        }
    }

    /// Roll back through the backend
    pub fn rollback(&mut self) -> Result<()> {
        match self {
            Transaction::Memory(txn) => txn.rollback(),
            Transaction::External(external) => Err(Error::transaction_state(format!(
                "{} is rolled back by its own persistence layer",
                external.type_name()
            ))),
        }
    }

    /// Whether the underlying transaction is still open
    pub fn is_active(&self) -> bool {
        match self {
            Transaction::Memory(txn) => txn.is_active(),
            Transaction::External(_) => false,
        }
    }
}

impl From<DaoTransaction<MemorySession>> for Transaction {
    fn from(txn: DaoTransaction<MemorySession>) -> Self {
        Transaction::Memory(txn)
    }
}

impl From<ExternalTransaction> for Transaction {
    fn from(external: ExternalTransaction) -> Self {
        Transaction::External(external)
    }
}

/// Session types that have a [`Transaction`] variant
pub trait TransactionBackend: Session + Sized {
    /// Type name reported in type-mismatch errors
    const TRANSACTION_TYPE: &'static str;

    /// Wrap a DAO transaction for this backend
    fn wrap(txn: DaoTransaction<Self>) -> Transaction;

    /// This backend's DAO transaction, if `txn` is this backend's variant
    fn downcast(txn: &mut Transaction) -> Option<&mut DaoTransaction<Self>>;

    /// Check a caller-supplied handle at the DAO boundary
    ///
    /// # Errors
    /// - `NullTransaction` if no handle was supplied
    /// - `TransactionTypeMismatch` if the handle belongs to another backend
    fn expect_transaction(txn: Option<&mut Transaction>) -> Result<&mut DaoTransaction<Self>> {
        let txn = txn.ok_or(Error::NullTransaction)?;
        let actual = txn.type_name().to_string();
        Self::downcast(txn).ok_or_else(|| Error::TransactionTypeMismatch {
            expected: Self::TRANSACTION_TYPE.to_string(),
            actual,
        })
    }
}

impl TransactionBackend for MemorySession {
    const TRANSACTION_TYPE: &'static str = "cairn_concurrency::DaoTransaction<cairn_storage::MemorySession>";

    fn wrap(txn: DaoTransaction<Self>) -> Transaction {
        Transaction::Memory(txn)
    }

    fn downcast(txn: &mut Transaction) -> Option<&mut DaoTransaction<Self>> {
        match txn {
            Transaction::Memory(txn) => Some(txn),
            _ => None,
        }
    }
}
