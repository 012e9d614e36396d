//! Store handle with transaction gating
//!
//! State rules:
//! - `transactional == false`: `commit()`/`rollback()` fail with
//!   `TransactionState` and never reach the session
//! - `transactional == true`, native transaction active: delegate
//! - `transactional == true`, native transaction finished: no-op, so a
//!   rollback after a successful commit (the usual cleanup path) is safe
//!
//! A handle is driven by one request at a time and is not shared.

use cairn_core::{Error, Result, Session};
use tracing::debug;

/// Native session plus a transactional flag fixed at construction
#[derive(Debug)]
pub struct StoreHandle<S> {
    session: S,
    transactional: bool,
}

impl<S: Session> StoreHandle<S> {
    /// Wrap `session`
    pub fn new(session: S, transactional: bool) -> Self {
        StoreHandle {
            session,
            transactional,
        }
    }

    /// Wrap a session that does not take part in a transaction
    pub fn plain(session: S) -> Self {
        Self::new(session, false)
    }

    /// Whether this handle was created for a transaction
    pub fn is_transactional(&self) -> bool {
        self.transactional
    }

    /// Whether the native transaction is still open
    pub fn is_active(&self) -> bool {
        self.transactional && self.session.is_transaction_active()
    }

    /// Session for reads and writes
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Mutable session for reads and writes
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Unwrap the session
    pub fn into_session(self) -> S {
        self.session
    }

    /// Commit the native transaction if it is still active
    ///
    /// # Errors
    /// `TransactionState` on a non-transactional handle; otherwise whatever
    /// the session's commit returns (e.g. `TransactionConflict`).
    pub fn commit(&mut self) -> Result<()> {
        self.ensure_transactional("commit")?;
        if !self.session.is_transaction_active() {
            debug!("Commit ignored, transaction no longer active");
            return Ok(());
        }
        self.session.commit_transaction()
    }

    /// Roll back the native transaction if it is still active
    ///
    /// # Errors
    /// `TransactionState` on a non-transactional handle.
    pub fn rollback(&mut self) -> Result<()> {
        self.ensure_transactional("rollback")?;
        if !self.session.is_transaction_active() {
            debug!("Rollback ignored, transaction no longer active");
            return Ok(());
        }
        self.session.rollback_transaction()
    }

    fn ensure_transactional(&self, operation: &str) -> Result<()> {
        if self.transactional {
            Ok(())
        } else {
            Err(Error::transaction_state(format!(
                "cannot {} on a non-transactional store handle",
                operation
            )))
        }
    }
}
