//! MemoryDatastore: in-process datastore with kind registration and
//! versioned records
//!
//! This module implements the `Datastore` and `KindRegistrar` traits using:
//! - `HashMap<kind, BTreeMap<id, Record>>` so queries iterate in id order
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for monotonically increasing record versions
//!
//! # Design Notes
//!
//! - **Kinds must be registered**: any read or write against an unknown kind
//!   fails with `KindNotRegistered`; registering a kind twice fails with
//!   `DuplicateKind`. `EntityRegistry` is what keeps callers from tripping
//!   the second rule.
//! - **Bodies are JSON**: entities are stored as `serde_json::Value` and
//!   decoded on read.
//! - **One version per commit**: all writes applied by one transaction share
//!   a commit version.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use cairn_core::{Datastore, EntityKind, Error, KindRegistrar, Result};

use crate::session::MemorySession;

/// Stored record body and version
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Record {
    pub(crate) version: u64,
    pub(crate) body: serde_json::Value,
}

/// Address of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct RecordKey {
    pub(crate) kind: &'static str,
    pub(crate) id: String,
}

impl RecordKey {
    pub(crate) fn new(kind: &'static str, id: &str) -> Self {
        RecordKey {
            kind,
            id: id.to_string(),
        }
    }
}

/// Buffered transaction writes; `None` is a delete
pub(crate) type WriteSet = BTreeMap<RecordKey, Option<serde_json::Value>>;

/// Versions observed by a transaction; 0 means "absent when read"
pub(crate) type ReadSet = HashMap<RecordKey, u64>;

#[derive(Debug, Default)]
struct Tables {
    kinds: HashMap<&'static str, EntityKind>,
    records: HashMap<&'static str, BTreeMap<String, Record>>,
}

impl Tables {
    fn table(&self, kind: &str) -> Result<&BTreeMap<String, Record>> {
        self.records.get(kind).ok_or_else(|| Error::KindNotRegistered {
            kind: kind.to_string(),
        })
    }

    fn table_mut(&mut self, kind: &str) -> Result<&mut BTreeMap<String, Record>> {
        self.records
            .get_mut(kind)
            .ok_or_else(|| Error::KindNotRegistered {
                kind: kind.to_string(),
            })
    }
}

#[derive(Debug, Default)]
struct Inner {
    tables: RwLock<Tables>,
    version: AtomicU64,
    txn_ids: AtomicU64,
}

/// In-process datastore
///
/// Cloning is cheap and yields a handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatastore {
    inner: Arc<Inner>,
}

impl MemoryDatastore {
    /// Create an empty datastore with no registered kinds
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a kind with this name is registered
    pub fn is_registered(&self, kind: &str) -> bool {
        self.inner.tables.read().kinds.contains_key(kind)
    }

    /// Registered kinds, ordered by name
    pub fn registered_kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<EntityKind> = self.inner.tables.read().kinds.values().copied().collect();
        kinds.sort();
        kinds
    }

    /// Number of records stored for `kind`
    pub fn len(&self, kind: &str) -> Result<usize> {
        Ok(self.inner.tables.read().table(kind)?.len())
    }

    /// Latest commit version
    pub fn current_version(&self) -> u64 {
        self.inner.version.load(Ordering::SeqCst)
    }

    fn next_version(&self) -> u64 {
        self.inner.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn next_txn_id(&self) -> u64 {
        self.inner.txn_ids.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn ensure_registered(&self, kind: &str) -> Result<()> {
        self.inner.tables.read().table(kind).map(|_| ())
    }

    pub(crate) fn read(&self, kind: &str, id: &str) -> Result<Option<Record>> {
        Ok(self.inner.tables.read().table(kind)?.get(id).cloned())
    }

    /// Records of `kind` with id >= `from`, in id order
    pub(crate) fn scan_from(&self, kind: &str, from: Option<&str>) -> Result<Vec<(String, Record)>> {
        let tables = self.inner.tables.read();
        let table = tables.table(kind)?;
        let rows = match from {
            Some(start) => table
                .range(start.to_string()..)
                .map(|(id, record)| (id.clone(), record.clone()))
                .collect(),
            None => table
                .iter()
                .map(|(id, record)| (id.clone(), record.clone()))
                .collect(),
        };
        Ok(rows)
    }

    /// Write through without a transaction, returning whether a record
    /// existed before
    pub(crate) fn write(&self, key: &RecordKey, body: Option<serde_json::Value>) -> Result<bool> {
        let mut tables = self.inner.tables.write();
        let table = tables.table_mut(key.kind)?;
        let existed = match body {
            Some(body) => {
                let version = self.next_version();
                table.insert(key.id.clone(), Record { version, body }).is_some()
            }
            None => table.remove(&key.id).is_some(),
        };
        Ok(existed)
    }

    /// Validate `reads` against current versions and apply `writes`
    /// atomically under one commit version
    ///
    /// # Errors
    /// Returns `TransactionConflict` if any record read by the transaction
    /// changed since it was read; nothing is applied in that case.
    pub(crate) fn apply(&self, txn_id: u64, reads: &ReadSet, writes: &WriteSet) -> Result<u64> {
        let mut tables = self.inner.tables.write();

        for (key, seen) in reads {
            let current = tables
                .table(key.kind)?
                .get(&key.id)
                .map_or(0, |record| record.version);
            if current != *seen {
                return Err(Error::TransactionConflict {
                    reason: format!(
                        "{}:{} changed since read (read version {}, now {})",
                        key.kind, key.id, seen, current
                    ),
                });
            }
        }

        if writes.is_empty() {
            return Ok(self.current_version());
        }

        let version = self.next_version();
        for (key, body) in writes {
            let table = tables.table_mut(key.kind)?;
            match body {
                Some(body) => {
                    table.insert(
                        key.id.clone(),
                        Record {
                            version,
                            body: body.clone(),
                        },
                    );
                }
                None => {
                    table.remove(&key.id);
                }
            }
        }
        debug!(txn_id, version, writes = writes.len(), "Applied transaction writes");
        Ok(version)
    }
}

impl KindRegistrar for MemoryDatastore {
    fn register_kind(&self, kind: EntityKind) -> Result<()> {
        let mut tables = self.inner.tables.write();
        if tables.kinds.contains_key(kind.name()) {
            return Err(Error::DuplicateKind {
                kind: kind.name().to_string(),
            });
        }
        tables.kinds.insert(kind.name(), kind);
        tables.records.insert(kind.name(), BTreeMap::new());
        debug!(kind = kind.name(), type_name = kind.type_name(), "Registered kind with datastore");
        Ok(())
    }
}

impl Datastore for MemoryDatastore {
    type Session = MemorySession;

    fn open_session(&self) -> MemorySession {
        MemorySession::new(self.clone())
    }

    fn open_transaction(&self) -> MemorySession {
        MemorySession::begin(self.clone())
    }
}
