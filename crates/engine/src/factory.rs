//! Session factory
//!
//! Owns the datastore, the kind registry and the configuration, and hands
//! out store handles: plain ones for reads and single writes, transactional
//! ones wrapped in a [`DaoTransaction`].
//!
//! ```ignore
//! let factory = SessionFactory::builder()
//!     .datastore(MemoryDatastore::new())
//!     .entity::<Note>()
//!     .config(CairnConfig::from_file(Path::new("cairn.toml"))?)
//!     .build()?;
//!
//! let mut txn = factory.begin_transaction()?;
//! txn.session_mut().save(&note)?;
//! txn.commit()?;
//! ```

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use cairn_concurrency::{DaoTransaction, StoreHandle, Transaction, TransactionBackend};
use cairn_core::{Datastore, Entity, EntityKind, Error, KindCatalog, Result};
use cairn_storage::EntityRegistry;
use tracing::{debug, info};

use crate::config::CairnConfig;

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SessionFactory`]
///
/// The datastore is required. The registry defaults to a fresh one owned by
/// this factory, since registrations are only meaningful for the store they
/// were made against; share a registry (or opt into
/// [`EntityRegistry::global`]) only between factories over the same store.
/// The configuration defaults to [`CairnConfig::default`].
pub struct SessionFactoryBuilder<D> {
    datastore: Option<D>,
    registry: Option<Arc<EntityRegistry>>,
    catalog: KindCatalog,
    config: CairnConfig,
}

impl<D: Datastore> SessionFactoryBuilder<D> {
    /// Create a builder with defaults
    pub fn new() -> Self {
        Self {
            datastore: None,
            registry: None,
            catalog: KindCatalog::new(),
            config: CairnConfig::default(),
        }
    }

    /// Set the backing datastore
    pub fn datastore(mut self, datastore: D) -> Self {
        self.datastore = Some(datastore);
        self
    }

    /// Use `registry` instead of a factory-private one
    pub fn registry(mut self, registry: Arc<EntityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use the process-wide registry; for processes with a single store
    pub fn global_registry(self) -> Self {
        self.registry(EntityRegistry::global())
    }

    /// Make `T` resolvable by name for bulk registration
    pub fn entity<T: Entity>(mut self) -> Self {
        self.catalog.add::<T>();
        self
    }

    /// Replace the kind catalog
    pub fn catalog(mut self, catalog: KindCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the configuration
    pub fn config(mut self, config: CairnConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the factory
    ///
    /// Registers the kinds listed in `config.entities`, if set.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no datastore was set
    /// - `InvalidInput` if the configuration fails validation
    /// - any bulk registration error
    pub fn build(self) -> Result<SessionFactory<D>> {
        let datastore = self.datastore.ok_or_else(|| {
            Error::configuration("SessionFactory requires a datastore")
        })?;
        self.config.validate()?;

        let factory = SessionFactory {
            datastore,
            registry: self.registry
                .unwrap_or_else(|| Arc::new(EntityRegistry::new())),
            catalog: self.catalog,
            config: self.config,
        };

        if let Some(path) = factory.config.entities.clone() {
            factory.register_from_file(&path)?;
        }

        info!(
            catalog = factory.catalog.len(),
            registered = factory.registry.len(),
            "Session factory ready"
        );
        Ok(factory)
    }
}

impl<D: Datastore> Default for SessionFactoryBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Source of store handles over one datastore
pub struct SessionFactory<D> {
    datastore: D,
    registry: Arc<EntityRegistry>,
    catalog: KindCatalog,
    config: CairnConfig,
}

impl<D: Datastore> SessionFactory<D> {
    /// Start building a factory
    pub fn builder() -> SessionFactoryBuilder<D> {
        SessionFactoryBuilder::new()
    }

    /// Factory over `datastore` with defaults and its own registry
    pub fn new(datastore: D) -> Result<Self> {
        Self::builder().datastore(datastore).build()
    }

    /// Backing datastore
    pub fn datastore(&self) -> &D {
        &self.datastore
    }

    /// Registry used for kind registration
    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    /// Names resolvable by bulk registration
    pub fn catalog(&self) -> &KindCatalog {
        &self.catalog
    }

    /// Active configuration
    pub fn config(&self) -> &CairnConfig {
        &self.config
    }

    /// Register entity type `T`; returns `true` if this call registered it
    pub fn register<T: Entity>(&self) -> Result<bool> {
        self.registry.register_entity::<T>(&self.datastore)
    }

    /// Register `kind`; returns `true` if this call registered it
    pub fn register_kind(&self, kind: EntityKind) -> Result<bool> {
        self.registry.register(kind, &self.datastore)
    }

    /// Register every kind named in a line-oriented resource
    pub fn register_from_resource<R: BufRead>(&self, reader: R) -> Result<Vec<EntityKind>> {
        self.registry
            .register_from_reader(reader, &self.catalog, &self.datastore)
    }

    /// Register every kind named in the file at `path`
    pub fn register_from_file(&self, path: &Path) -> Result<Vec<EntityKind>> {
        self.registry
            .register_from_file(path, &self.catalog, &self.datastore)
    }

    /// Non-transactional handle
    pub fn begin(&self) -> StoreHandle<D::Session> {
        StoreHandle::plain(self.datastore.open_session())
    }

    /// Transactional handle wrapped for DAO callers
    pub fn begin_transaction(&self) -> Result<DaoTransaction<D::Session>> {
        debug!("Opening DAO transaction");
        DaoTransaction::new(StoreHandle::new(self.datastore.open_transaction(), true))
    }

    /// Transactional handle in the form DAO `*_in` methods accept
    pub fn transaction(&self) -> Result<Transaction>
    where
        D::Session: TransactionBackend,
    {
        self.begin_transaction().map(<D::Session as TransactionBackend>::wrap)
    }
}
