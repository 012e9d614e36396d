//! Cairn - cursor-paginated, predicate-filtered entity queries
//!
//! Cairn sits between request handlers and an entity datastore. It pages
//! through query results with opaque, resumable cursors, filters them with
//! arbitrary predicates, and wraps datastore sessions in transaction
//! handles that are checked at the DAO boundary.
//!
//! # Quick Start
//!
//! ```ignore
//! use cairn::{EntityDao, MemoryDatastore, Pagination, SessionFactory};
//! use std::sync::Arc;
//!
//! let factory = Arc::new(SessionFactory::new(MemoryDatastore::new())?);
//! let notes: EntityDao<Note, _> = EntityDao::new(factory)?;
//!
//! notes.put(&Note::new("n1", "hello"))?;
//!
//! // First page of unarchived notes
//! let page = notes.find(Some(&Pagination::new(20)), |n| !n.archived)?;
//!
//! // The next page resumes exactly where this one stopped
//! if let Some(request) = page.pagination().and_then(|p| p.next_page()) {
//!     let more = notes.find(Some(&request), |n| !n.archived)?;
//! }
//! ```
//!
//! # Architecture
//!
//! The facade re-exports the engine API plus the types callers name
//! directly. Crate layering, bottom up: `cairn-core` (types, errors,
//! store traits), `cairn-storage` (memory datastore, cursor codec, kind
//! registry), `cairn-concurrency` (store handles, DAO transactions),
//! `cairn-engine` (iterator, page assembly, factory, DAO, config).

pub use cairn_concurrency::{
    DaoTransaction, ExternalTransaction, StoreHandle, Transaction, TransactionBackend,
};
pub use cairn_core::{
    Container, Cursor, Datastore, Entity, EntityKind, Error, KindCatalog, KindLookupError,
    KindRegistrar, PaginatedResults, Pagination, QueryResultIterator, Result, Session, Stored,
};
pub use cairn_engine::{
    assemble, drain_all, CairnConfig, EntityDao, ResultIterator, SessionFactory,
    SessionFactoryBuilder, CONFIG_FILE_NAME,
};
pub use cairn_storage::{
    parse_kind_list, CursorPosition, EntityRegistry, MemoryDatastore, MemoryQuery, MemorySession,
    TransactionStatus,
};
