//! Pagination Integration Tests
//!
//! Paged, predicate-filtered queries through EntityDao over the memory
//! datastore: cursor resumption, page boundaries, unbounded drains and
//! malformed cursors.

#[path = "../common/mod.rs"]
mod common;

mod letters;
