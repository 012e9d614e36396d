//! Entity kind registry
//!
//! Datastores reject a second registration of the same kind, but kinds are
//! registered from many places at startup (each DAO, each factory, a
//! configured kind list). The registry makes registration idempotent: the
//! first caller performs the underlying `KindRegistrar::register_kind` call,
//! every later caller is a no-op.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = EntityRegistry::new();
//!
//! registry.register_entity::<Note>(&store)?;   // registers with the store
//! registry.register_entity::<Note>(&store)?;   // no-op
//!
//! // Bulk registration from a kind list resource
//! let catalog = KindCatalog::new().with::<Note>().with::<Account>();
//! registry.register_from_file(Path::new("entities.txt"), &catalog, &store)?;
//! ```
//!
//! The membership check and the underlying call run under one lock, so
//! concurrent callers for the same kind trigger exactly one store call.
//!
//! Uses parking_lot::Mutex instead of std::sync::Mutex to avoid cascading
//! panics from mutex poisoning.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use cairn_core::{Entity, EntityKind, Error, KindCatalog, KindRegistrar, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, info};

/// Process-wide registry, created on first use
static GLOBAL_REGISTRY: Lazy<Arc<EntityRegistry>> = Lazy::new(|| Arc::new(EntityRegistry::new()));

/// Set of kinds already registered with the backing store
#[derive(Debug, Default)]
pub struct EntityRegistry {
    registered: Mutex<HashSet<EntityKind>>,
}

impl EntityRegistry {
    /// Create an empty registry
    ///
    /// Use this for isolated stores (tests, multi-store processes); use
    /// [`EntityRegistry::global`] when the process has one store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> Arc<EntityRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Register `kind` with `registrar` unless already registered
    ///
    /// Returns `true` if this call performed the registration.
    ///
    /// # Errors
    ///
    /// Propagates the registrar's error; the kind is not recorded as
    /// registered in that case, so a later call retries.
    pub fn register(&self, kind: EntityKind, registrar: &dyn KindRegistrar) -> Result<bool> {
        let mut registered = self.registered.lock();
        if registered.contains(&kind) {
            return Ok(false);
        }
        registrar.register_kind(kind)?;
        registered.insert(kind);
        info!(kind = kind.name(), type_name = kind.type_name(), "Registered entity kind");
        Ok(true)
    }

    /// Register entity type `T`
    pub fn register_entity<T: Entity>(&self, registrar: &dyn KindRegistrar) -> Result<bool> {
        self.register(EntityKind::of::<T>(), registrar)
    }

    /// Whether `kind` has been registered through this registry
    pub fn is_registered(&self, kind: &EntityKind) -> bool {
        self.registered.lock().contains(kind)
    }

    /// Registered kinds, ordered by name
    pub fn kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<EntityKind> = self.registered.lock().iter().copied().collect();
        kinds.sort();
        kinds
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.registered.lock().len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.registered.lock().is_empty()
    }

    /// Register every kind named in a line-oriented resource
    ///
    /// Names are resolved through `catalog` before anything is registered.
    /// Returns the resolved kinds in resource order.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the resource names no kinds
    /// - `UnresolvableKind` if a name is not in the catalog
    /// - `Io` if the resource cannot be read
    pub fn register_from_reader<R: BufRead>(
        &self,
        reader: R,
        catalog: &KindCatalog,
        registrar: &dyn KindRegistrar,
    ) -> Result<Vec<EntityKind>> {
        let names = parse_kind_list(reader)?;
        if names.is_empty() {
            return Err(Error::configuration(
                "entity kind resource does not name any kinds",
            ));
        }

        let kinds = names
            .into_iter()
            .map(|name| {
                catalog
                    .resolve(&name)
                    .map_err(|source| Error::UnresolvableKind { name, source })
            })
            .collect::<Result<Vec<EntityKind>>>()?;

        let mut newly = 0usize;
        for kind in &kinds {
            if self.register(*kind, registrar)? {
                newly += 1;
            } else {
                debug!(kind = kind.name(), "Kind already registered, skipping");
            }
        }
        info!(listed = kinds.len(), newly, "Registered entity kinds from resource");
        Ok(kinds)
    }

    /// Register every kind named in the file at `path`
    ///
    /// # Errors
    ///
    /// A missing or unreadable file is a `Configuration` error; otherwise as
    /// [`EntityRegistry::register_from_reader`].
    pub fn register_from_file(
        &self,
        path: &Path,
        catalog: &KindCatalog,
        registrar: &dyn KindRegistrar,
    ) -> Result<Vec<EntityKind>> {
        let file = File::open(path).map_err(|e| {
            Error::configuration(format!(
                "cannot open entity kind resource '{}': {}",
                path.display(),
                e
            ))
        })?;
        self.register_from_reader(BufReader::new(file), catalog, registrar)
    }
}

/// Parse a kind list: one name per line, trimmed; blank lines and lines
/// starting with `#` are skipped
pub fn parse_kind_list<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}
