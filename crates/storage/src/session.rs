//! Sessions over the memory datastore
//!
//! A `MemorySession` either writes straight through to the datastore or owns
//! one native transaction. Transactional sessions:
//!
//! 1. **Read your writes**: buffered puts/deletes are visible to the session
//! 2. **Track reads**: the version of every record read is remembered
//! 3. **Validate at commit**: if any read record changed, commit fails with
//!    `TransactionConflict` (first committer wins)
//! 4. **Apply atomically**: all buffered writes land under one version
//!
//! Once a transaction has committed or rolled back, data operations on the
//! session fail with `TransactionNotActive`.

use std::collections::BTreeMap;

use cairn_core::{Cursor, Entity, Error, Result, Session, Stored};
use tracing::debug;

use crate::cursor::CursorPosition;
use crate::memory::{MemoryDatastore, ReadSet, RecordKey, WriteSet};
use crate::query::MemoryQuery;

/// Lifecycle of a native transaction
///
/// `Active` → `Committed` or `Active` → `RolledBack`; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Open for reads and writes
    Active,
    /// Writes applied
    Committed,
    /// Writes discarded (explicitly, or after a failed commit)
    RolledBack,
}

#[derive(Debug)]
struct MemoryTransaction {
    id: u64,
    status: TransactionStatus,
    reads: ReadSet,
    writes: WriteSet,
}

impl MemoryTransaction {
    fn finish(&mut self, status: TransactionStatus) {
        self.status = status;
        self.reads.clear();
        self.writes.clear();
    }
}

/// Session on a [`MemoryDatastore`]
#[derive(Debug)]
pub struct MemorySession {
    store: MemoryDatastore,
    txn: Option<MemoryTransaction>,
}

fn active(txn: &mut Option<MemoryTransaction>) -> Result<Option<&mut MemoryTransaction>> {
    match txn {
        None => Ok(None),
        Some(txn) if txn.status == TransactionStatus::Active => Ok(Some(txn)),
        Some(_) => Err(Error::TransactionNotActive),
    }
}

fn decode<T: Entity>(id: &str, version: u64, body: &serde_json::Value) -> Result<Stored<T>> {
    Ok(Stored {
        id: id.to_string(),
        version,
        entity: T::deserialize(body)?,
    })
}

impl MemorySession {
    /// Session without a transaction
    pub fn new(store: MemoryDatastore) -> Self {
        MemorySession { store, txn: None }
    }

    /// Session with a freshly begun transaction
    pub fn begin(store: MemoryDatastore) -> Self {
        let id = store.next_txn_id();
        debug!(txn_id = id, "Began transaction");
        MemorySession {
            store,
            txn: Some(MemoryTransaction {
                id,
                status: TransactionStatus::Active,
                reads: ReadSet::new(),
                writes: WriteSet::new(),
            }),
        }
    }

    /// Datastore this session reads and writes
    pub fn datastore(&self) -> &MemoryDatastore {
        &self.store
    }

    /// Id of the session's transaction, if it has one
    pub fn transaction_id(&self) -> Option<u64> {
        self.txn.as_ref().map(|txn| txn.id)
    }

    /// Status of the session's transaction, if it has one
    pub fn transaction_status(&self) -> Option<TransactionStatus> {
        self.txn.as_ref().map(|txn| txn.status)
    }

    /// Number of buffered writes awaiting commit
    pub fn pending_writes(&self) -> usize {
        self.txn.as_ref().map_or(0, |txn| txn.writes.len())
    }
}

impl Session for MemorySession {
    type Query<T: Entity> = MemoryQuery<T>;

    fn is_transaction_active(&self) -> bool {
        matches!(&self.txn, Some(txn) if txn.status == TransactionStatus::Active)
    }

    fn commit_transaction(&mut self) -> Result<()> {
        let txn = active(&mut self.txn)?.ok_or(Error::TransactionNotActive)?;
        match self.store.apply(txn.id, &txn.reads, &txn.writes) {
            Ok(version) => {
                debug!(txn_id = txn.id, version, "Committed transaction");
                txn.finish(TransactionStatus::Committed);
                Ok(())
            }
            Err(e) => {
                debug!(txn_id = txn.id, error = %e, "Commit failed, transaction rolled back");
                txn.finish(TransactionStatus::RolledBack);
                Err(e)
            }
        }
    }

    fn rollback_transaction(&mut self) -> Result<()> {
        let txn = active(&mut self.txn)?.ok_or(Error::TransactionNotActive)?;
        debug!(txn_id = txn.id, discarded = txn.writes.len(), "Rolled back transaction");
        txn.finish(TransactionStatus::RolledBack);
        Ok(())
    }

    fn load<T: Entity>(&mut self, id: &str) -> Result<Option<Stored<T>>> {
        let record = match active(&mut self.txn)? {
            Some(txn) => {
                let key = RecordKey::new(T::KIND, id);
                if let Some(pending) = txn.writes.get(&key) {
                    return pending
                        .as_ref()
                        .map(|body| decode(id, 0, body))
                        .transpose();
                }
                let record = self.store.read(T::KIND, id)?;
                let seen = record.as_ref().map_or(0, |r| r.version);
                txn.reads.entry(key).or_insert(seen);
                record
            }
            None => self.store.read(T::KIND, id)?,
        };
        record
            .map(|record| decode(id, record.version, &record.body))
            .transpose()
    }

    fn save<T: Entity>(&mut self, entity: &T) -> Result<()> {
        let key = RecordKey::new(T::KIND, entity.id());
        let body = serde_json::to_value(entity)?;
        match active(&mut self.txn)? {
            Some(txn) => {
                self.store.ensure_registered(T::KIND)?;
                txn.writes.insert(key, Some(body));
            }
            None => {
                self.store.write(&key, Some(body))?;
            }
        }
        Ok(())
    }

    fn delete<T: Entity>(&mut self, id: &str) -> Result<bool> {
        let key = RecordKey::new(T::KIND, id);
        match active(&mut self.txn)? {
            Some(txn) => {
                let existed = match txn.writes.get(&key) {
                    Some(pending) => pending.is_some(),
                    None => {
                        let record = self.store.read(T::KIND, id)?;
                        let seen = record.as_ref().map_or(0, |r| r.version);
                        txn.reads.entry(key.clone()).or_insert(seen);
                        record.is_some()
                    }
                };
                txn.writes.insert(key, None);
                Ok(existed)
            }
            None => self.store.write(&key, None),
        }
    }

    fn query<T: Entity>(&mut self, start: Option<&Cursor>) -> Result<MemoryQuery<T>> {
        let from = match start {
            Some(cursor) => Some(CursorPosition::decode_for(cursor, T::KIND)?),
            None => None,
        };
        let start_id = match &from {
            // A cursor minted past the last record resumes an exhausted query.
            Some(CursorPosition { at: None, .. }) => {
                self.store.ensure_registered(T::KIND)?;
                return Ok(MemoryQuery::new(T::KIND, Vec::new()));
            }
            Some(CursorPosition { at: Some(id), .. }) => Some(id.as_str()),
            None => None,
        };

        let mut rows: BTreeMap<String, (u64, serde_json::Value)> = self
            .store
            .scan_from(T::KIND, start_id)?
            .into_iter()
            .map(|(id, record)| (id, (record.version, record.body)))
            .collect();

        if let Some(txn) = active(&mut self.txn)? {
            let pending = txn
                .writes
                .iter()
                .filter(|(key, _)| key.kind == T::KIND)
                .filter(|(key, _)| start_id.map_or(true, |start| key.id.as_str() >= start));
            for (key, body) in pending {
                match body {
                    Some(body) => {
                        rows.insert(key.id.clone(), (0, body.clone()));
                    }
                    None => {
                        rows.remove(&key.id);
                    }
                }
            }
        }

        let items = rows
            .iter()
            .map(|(id, (version, body))| decode(id, *version, body))
            .collect::<Result<Vec<Stored<T>>>>()?;
        Ok(MemoryQuery::new(T::KIND, items))
    }
}
