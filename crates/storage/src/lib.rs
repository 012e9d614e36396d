//! Storage layer for Cairn
//!
//! This crate implements the in-process reference datastore with:
//! - MemoryDatastore: kind-registered, versioned records behind an RwLock
//! - MemorySession: plain and transactional sessions (read-your-writes,
//!   first-committer-wins validation at commit)
//! - MemoryQuery: ordered query snapshots with resumable cursors
//! - CursorPosition: the client-safe cursor codec
//! - EntityRegistry: idempotent kind registration, per factory or process-wide

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod memory;
pub mod query;
pub mod registry;
pub mod session;

pub use cursor::CursorPosition;
pub use memory::MemoryDatastore;
pub use query::MemoryQuery;
pub use registry::{parse_kind_list, EntityRegistry};
pub use session::{MemorySession, TransactionStatus};
