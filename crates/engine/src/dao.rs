//! Entity data access
//!
//! `EntityDao<T, D>` is the request-facing surface: it opens a handle from
//! its [`SessionFactory`], runs a query, wraps the raw results in a
//! [`ResultIterator`] with the caller's predicate and assembles one page.
//!
//! Every operation has two forms. The plain form uses a fresh
//! non-transactional handle. The `*_in` form runs inside a caller-owned
//! transaction, which is checked at the boundary: `None` is rejected with
//! `NullTransaction`, a handle for another backend with
//! `TransactionTypeMismatch`.

use std::marker::PhantomData;
use std::sync::Arc;

use cairn_concurrency::{Transaction, TransactionBackend};
use cairn_core::{
    Container, Datastore, Entity, Error, PaginatedResults, Pagination, Result, Session,
};

use crate::factory::SessionFactory;
use crate::iterator::ResultIterator;
use crate::paginate::assemble;

/// Typed access to one entity kind
pub struct EntityDao<T, D> {
    factory: Arc<SessionFactory<D>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, D> Clone for EntityDao<T, D> {
    fn clone(&self) -> Self {
        EntityDao {
            factory: Arc::clone(&self.factory),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity, D: Datastore> EntityDao<T, D> {
    /// DAO over `factory`; registers `T` if it is not registered yet
    pub fn new(factory: Arc<SessionFactory<D>>) -> Result<Self> {
        factory.register::<T>()?;
        Ok(EntityDao {
            factory,
            _entity: PhantomData,
        })
    }

    /// Factory this DAO draws handles from
    pub fn factory(&self) -> &Arc<SessionFactory<D>> {
        &self.factory
    }

    /// First-page request using the configured default page size
    pub fn first_page(&self) -> Pagination {
        Pagination::new(self.factory.config().default_page_size)
    }

    /// Load by id
    pub fn get(&self, id: &str) -> Result<Option<T>> {
        let mut handle = self.factory.begin();
        load(handle.session_mut(), id)
    }

    /// Insert or replace
    pub fn put(&self, entity: &T) -> Result<()> {
        self.factory.begin().session_mut().save(entity)
    }

    /// Delete by id; returns whether the entity existed
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.factory.begin().session_mut().delete::<T>(id)
    }

    /// One page of entities matching `predicate`, or all of them when
    /// `pagination` is `None`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the page size exceeds `max_page_size`
    /// - `InvalidCursor` if the request's cursor is malformed or belongs to
    ///   another kind
    pub fn find(
        &self,
        pagination: Option<&Pagination>,
        predicate: impl Fn(&T) -> bool,
    ) -> Result<PaginatedResults<T>> {
        self.check_page_size(pagination)?;
        let mut handle = self.factory.begin();
        find(handle.session_mut(), pagination, predicate)
    }

    /// Every entity of this kind, in id order
    pub fn find_all(&self) -> Result<Vec<T>> {
        self.find(None, |_| true).map(PaginatedResults::into_items)
    }

    fn check_page_size(&self, pagination: Option<&Pagination>) -> Result<()> {
        let max = self.factory.config().max_page_size;
        match pagination {
            Some(p) if p.page_size() > max => Err(Error::invalid_input(format!(
                "page size {} exceeds maximum {}",
                p.page_size(),
                max
            ))),
            _ => Ok(()),
        }
    }
}

impl<T, D> EntityDao<T, D>
where
    T: Entity,
    D: Datastore,
    D::Session: TransactionBackend,
{
    /// Load by id inside `txn`
    pub fn get_in(&self, txn: Option<&mut Transaction>, id: &str) -> Result<Option<T>> {
        let txn = <D::Session as TransactionBackend>::expect_transaction(txn)?;
        load(txn.session_mut(), id)
    }

    /// Insert or replace inside `txn`
    pub fn put_in(&self, txn: Option<&mut Transaction>, entity: &T) -> Result<()> {
        <D::Session as TransactionBackend>::expect_transaction(txn)?
            .session_mut()
            .save(entity)
    }

    /// Delete by id inside `txn`
    pub fn delete_in(&self, txn: Option<&mut Transaction>, id: &str) -> Result<bool> {
        <D::Session as TransactionBackend>::expect_transaction(txn)?
            .session_mut()
            .delete::<T>(id)
    }

    /// [`EntityDao::find`] inside `txn`; sees the transaction's own writes
    pub fn find_in(
        &self,
        txn: Option<&mut Transaction>,
        pagination: Option<&Pagination>,
        predicate: impl Fn(&T) -> bool,
    ) -> Result<PaginatedResults<T>> {
        let txn = <D::Session as TransactionBackend>::expect_transaction(txn)?;
        self.check_page_size(pagination)?;
        find(txn.session_mut(), pagination, predicate)
    }
}

fn load<T: Entity, S: Session>(session: &mut S, id: &str) -> Result<Option<T>> {
    Ok(session.load::<T>(id)?.map(Container::into_entity))
}

fn find<T: Entity, S: Session>(
    session: &mut S,
    pagination: Option<&Pagination>,
    predicate: impl Fn(&T) -> bool,
) -> Result<PaginatedResults<T>> {
    let query = session.query::<T>(pagination.and_then(Pagination::current))?;
    let mut iter = ResultIterator::over_containers(query, predicate);
    Ok(assemble(pagination, &mut iter))
}
