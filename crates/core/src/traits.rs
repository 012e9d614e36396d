//! Core traits for the datastore abstraction
//!
//! These traits are the seams between the query/pagination layer and a
//! concrete datastore. The in-process store in `cairn-storage` implements
//! them; other backends slot in without touching the engine.

use crate::cursor::Cursor;
use crate::entity::{Entity, EntityKind, Stored};
use crate::error::Result;

/// Forward-only raw query results that can report a resumable position
///
/// `cursor()` is the position of the next raw item `next()` would yield:
/// opening a new query at that cursor yields that same item first.
pub trait QueryResultIterator: Iterator {
    /// Current position
    fn cursor(&self) -> Cursor;
}

/// Raw query item that wraps the value callers want
pub trait Container {
    /// Wrapped value type
    type Entity;

    /// Unwrap the value
    fn into_entity(self) -> Self::Entity;
}

/// Side-effecting kind registration against a backing store
///
/// Stores treat a second registration of the same kind as an error; callers
/// go through `EntityRegistry` to keep registration idempotent.
pub trait KindRegistrar: Send + Sync {
    /// Register `kind` with the store
    fn register_kind(&self, kind: EntityKind) -> Result<()>;
}

/// A native datastore session
///
/// A session may own one native transaction. Reads and writes go through
/// the transaction while it is active.
pub trait Session: Send {
    /// Query results yielded for entity type `T`
    type Query<T: Entity>: QueryResultIterator<Item = Stored<T>>;

    /// Whether a native transaction is open and not yet finished
    fn is_transaction_active(&self) -> bool;

    /// Commit the active native transaction
    ///
    /// # Errors
    /// Returns `TransactionNotActive` when there is none, or
    /// `TransactionConflict` if commit-time validation fails.
    fn commit_transaction(&mut self) -> Result<()>;

    /// Roll back the active native transaction
    fn rollback_transaction(&mut self) -> Result<()>;

    /// Load one entity by id
    fn load<T: Entity>(&mut self, id: &str) -> Result<Option<Stored<T>>>;

    /// Insert or replace an entity
    fn save<T: Entity>(&mut self, entity: &T) -> Result<()>;

    /// Delete by id, returning whether the entity existed
    fn delete<T: Entity>(&mut self, id: &str) -> Result<bool>;

    /// Open a query over all entities of kind `T`, ordered by id,
    /// optionally resuming at `start`
    ///
    /// # Errors
    /// Returns `InvalidCursor` if `start` was not minted for this kind.
    fn query<T: Entity>(&mut self, start: Option<&Cursor>) -> Result<Self::Query<T>>;
}

/// A datastore that hands out sessions
pub trait Datastore: KindRegistrar {
    /// Session type
    type Session: Session;

    /// Session without a native transaction
    fn open_session(&self) -> Self::Session;

    /// Session with a freshly begun native transaction
    fn open_transaction(&self) -> Self::Session;
}
