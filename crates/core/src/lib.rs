//! Core types and traits for Cairn
//!
//! This crate defines the foundational types used throughout the system:
//! - Cursor: Opaque, client-safe resume token for query positions
//! - Pagination / PaginatedResults: Page request and page response values
//! - Entity / EntityKind / KindCatalog: Stored type identity and name lookup
//! - Stored: Container yielded by datastore queries
//! - Error: Error type hierarchy
//! - Traits: Store seams (QueryResultIterator, Container, Session, Datastore)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod entity;
pub mod error;
pub mod pagination;
pub mod traits;

pub use cursor::Cursor;
pub use entity::{Entity, EntityKind, KindCatalog, KindLookupError, Stored};
pub use error::{Error, Result};
pub use pagination::{PaginatedResults, Pagination};
pub use traits::{Container, Datastore, KindRegistrar, QueryResultIterator, Session};
