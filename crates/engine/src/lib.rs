//! Query and DAO engine for Cairn
//!
//! This crate drives the lower layers on behalf of request handlers:
//! - ResultIterator: predicate filtering with a one-item look-ahead and a
//!   resumable cursor captured before every raw advance
//! - paginate: bounded or unbounded page assembly into PaginatedResults
//! - SessionFactory: datastore, kind registry and configuration in one place
//! - EntityDao: typed get/put/delete/find, plain or inside a Transaction
//! - CairnConfig: `cairn.toml` settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dao;
pub mod factory;
pub mod iterator;
pub mod paginate;

pub use config::{CairnConfig, CONFIG_FILE_NAME};
pub use dao::EntityDao;
pub use factory::{SessionFactory, SessionFactoryBuilder};
pub use iterator::ResultIterator;
pub use paginate::{assemble, drain_all};
