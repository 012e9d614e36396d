//! Entity identity
//!
//! Every stored type implements [`Entity`], which names its kind. An
//! [`EntityKind`] is the runtime identity the registry and the datastore
//! track. [`KindCatalog`] resolves configured names back to kinds, so a
//! plain-text resource can list which kinds to register at startup.

use crate::traits::Container;
use serde::{de::DeserializeOwned, Serialize};
use std::any::type_name;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A type that can be stored in a datastore
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Kind name (table / collection / entity group name in the datastore)
    const KIND: &'static str;

    /// Unique identifier within the kind
    fn id(&self) -> &str;
}

/// Runtime identity of an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKind {
    name: &'static str,
    type_name: &'static str,
}

impl EntityKind {
    /// Kind of `T`
    pub fn of<T: Entity>() -> Self {
        EntityKind {
            name: T::KIND,
            type_name: type_name::<T>(),
        }
    }

    /// Kind name as the datastore knows it
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fully qualified Rust type path
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.type_name)
    }
}

/// A configured name has no matching kind in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no entity kind named '{name}' in catalog")]
pub struct KindLookupError {
    /// Name that failed to resolve
    pub name: String,
}

/// Name → kind lookup table
///
/// Kinds are found by their fully qualified type path
/// (`std::any::type_name`) or by their kind name.
#[derive(Debug, Clone, Default)]
pub struct KindCatalog {
    by_name: BTreeMap<&'static str, EntityKind>,
}

impl KindCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`KindCatalog::add`]
    pub fn with<T: Entity>(mut self) -> Self {
        self.add::<T>();
        self
    }

    /// Make `T` resolvable
    pub fn add<T: Entity>(&mut self) {
        self.add_kind(EntityKind::of::<T>());
    }

    /// Make `kind` resolvable
    pub fn add_kind(&mut self, kind: EntityKind) {
        self.by_name.insert(kind.type_name(), kind);
        self.by_name.entry(kind.name()).or_insert(kind);
    }

    /// Resolve a configured name
    pub fn resolve(&self, name: &str) -> Result<EntityKind, KindLookupError> {
        self.by_name.get(name).copied().ok_or_else(|| KindLookupError {
            name: name.to_string(),
        })
    }

    /// Number of names known
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Entity as returned by a datastore query: identifier, record version and
/// the decoded entity
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    /// Entity identifier
    pub id: String,
    /// Record version; 0 for writes still pending in a transaction
    pub version: u64,
    /// Decoded entity
    pub entity: T,
}

impl<T> Container for Stored<T> {
    type Entity = T;

    fn into_entity(self) -> T {
        self.entity
    }
}
