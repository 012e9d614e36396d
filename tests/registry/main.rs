//! Registry Integration Tests
//!
//! Idempotent kind registration: sequential and concurrent callers, DAO and
//! factory registration against one store, and bulk registration from kind
//! list files and `cairn.toml`.

#[path = "../common/mod.rs"]
mod common;

mod bulk;
mod idempotence;
