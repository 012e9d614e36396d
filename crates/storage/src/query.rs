//! Query snapshots over the memory datastore
//!
//! A `MemoryQuery` holds the decoded rows of one kind, in id order, taken
//! when the query was opened. Its cursor always names the next row it
//! would yield, so reopening a query at that cursor yields the same row
//! first. Past the last row the cursor encodes an end position.

use std::collections::VecDeque;

use cairn_core::{Cursor, QueryResultIterator, Stored};

use crate::cursor::CursorPosition;

/// Forward-only query results for one kind
#[derive(Debug)]
pub struct MemoryQuery<T> {
    kind: &'static str,
    rows: VecDeque<Stored<T>>,
}

impl<T> MemoryQuery<T> {
    pub(crate) fn new(kind: &'static str, rows: Vec<Stored<T>>) -> Self {
        MemoryQuery {
            kind,
            rows: rows.into(),
        }
    }

    /// Kind this query reads
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Rows not yet yielded
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl<T> Iterator for MemoryQuery<T> {
    type Item = Stored<T>;

    fn next(&mut self) -> Option<Stored<T>> {
        self.rows.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

impl<T> ExactSizeIterator for MemoryQuery<T> {}

impl<T> QueryResultIterator for MemoryQuery<T> {
    fn cursor(&self) -> Cursor {
        match self.rows.front() {
            Some(row) => CursorPosition::at(self.kind, &row.id),
            None => CursorPosition::end(self.kind),
        }
        .encode()
    }
}
