//! Repository port and its SeaORM implementation.
//!
//! [`Repository`] is what services consume. [`SeaOrmRepository`] implements it
//! once for every [`Aggregate`]; the aggregate supplies the entity-specific
//! mapping, writes and relation loading.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
};
use tracing::{debug, instrument};

use crate::query::Query;
use crate::session::Session;
use crate::{Nid, Result};

pub type ModelOf<A> = <<A as Aggregate>::Entity as EntityTrait>::Model;
type RelationOf<A> = <<A as Aggregate>::Entity as EntityTrait>::Relation;

/// Read/write primitives over one entity type.
///
/// `create`, `update` and `delete` are staged; `save` commits them and
/// `discard` rolls them back.
#[async_trait]
pub trait Repository<E: EntityTrait>: Send + Sync {
    type Item: Send + Sync;

    /// Run a query; included relations are loaded on the returned items.
    async fn read_query(&self, query: Query<E>) -> Result<Vec<Self::Item>>;

    /// Number of rows matching the query's filters, ignoring skip/take.
    async fn count(&self, query: Query<E>) -> Result<u64>;

    async fn find_by(&self, predicate: Condition) -> Result<Option<Self::Item>>;

    async fn find_by_nid(&self, nid: Nid) -> Result<Option<Self::Item>>;

    /// Stage an insert; returns the item with its assigned nid.
    async fn create(&self, item: &Self::Item) -> Result<Self::Item>;

    async fn update(&self, item: &Self::Item) -> Result<()>;

    async fn delete(&self, item: &Self::Item) -> Result<()>;

    async fn save(&self) -> Result<()>;

    /// Drop staged changes.
    async fn discard(&self) -> Result<()>;

    /// Materialise one relation on an item.
    async fn load(&self, item: &mut Self::Item, relation: E::Relation) -> Result<()>;
}

/// Storage mapping for one domain type.
#[async_trait]
pub trait Aggregate: Sized + Send + Sync + 'static {
    type Entity: EntityTrait;

    /// Entity name used in logs.
    const NAME: &'static str;

    fn from_model(model: ModelOf<Self>) -> Self;

    fn nid(&self) -> Nid;

    fn nid_column() -> <Self::Entity as EntityTrait>::Column;

    async fn insert<C: ConnectionTrait>(&self, conn: &C) -> std::result::Result<Self, DbErr>;

    async fn update<C: ConnectionTrait>(&self, conn: &C) -> std::result::Result<(), DbErr>;

    async fn delete<C: ConnectionTrait>(&self, conn: &C) -> std::result::Result<(), DbErr>;

    /// Load `relation` for all `items` with as few queries as possible.
    async fn include<C: ConnectionTrait>(
        items: &mut [Self],
        relation: &RelationOf<Self>,
        conn: &C,
    ) -> std::result::Result<(), DbErr>;
}

/// Evaluates `$body` with `$conn` bound to the staged transaction when the
/// session has one, otherwise to the pool.
macro_rules! with_conn {
    ($session:expr, |$conn:ident| $body:expr) => {{
        let staged = $session.staged().await;
        match staged.as_ref() {
            Some($conn) => $body,
            None => {
                let $conn = $session.pool();
                $body
            }
        }
    }};
}

pub struct SeaOrmRepository<A> {
    session: Arc<Session>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A: Aggregate> SeaOrmRepository<A> {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            _aggregate: PhantomData,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

impl<A> Clone for SeaOrmRepository<A> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            _aggregate: PhantomData,
        }
    }
}

#[async_trait]
impl<A> Repository<A::Entity> for SeaOrmRepository<A>
where
    A: Aggregate,
    ModelOf<A>: Send + Sync,
    RelationOf<A>: Send + Sync,
{
    type Item = A;

    #[instrument(name = "store_db.repo.read_query", skip_all, fields(entity = A::NAME))]
    async fn read_query(&self, query: Query<A::Entity>) -> Result<Vec<A>> {
        let select = query.apply_to(A::Entity::find())?;
        let models = with_conn!(self.session, |conn| select.all(conn).await)?;
        let mut items: Vec<A> = models.into_iter().map(A::from_model).collect();

        for relation in query.includes() {
            with_conn!(self.session, |conn| A::include(&mut items, relation, conn)
                .await)?;
        }

        debug!(rows = items.len(), "query read");
        Ok(items)
    }

    #[instrument(name = "store_db.repo.count", skip_all, fields(entity = A::NAME))]
    async fn count(&self, query: Query<A::Entity>) -> Result<u64> {
        let select = query.unpaged().apply_to(A::Entity::find())?;
        let total = with_conn!(self.session, |conn| select.count(conn).await)?;
        Ok(total)
    }

    async fn find_by(&self, predicate: Condition) -> Result<Option<A>> {
        let select = A::Entity::find().filter(predicate);
        let found = with_conn!(self.session, |conn| select.one(conn).await)?;
        Ok(found.map(A::from_model))
    }

    async fn find_by_nid(&self, nid: Nid) -> Result<Option<A>> {
        let select = A::Entity::find().filter(A::nid_column().eq(nid));
        let found = with_conn!(self.session, |conn| select.one(conn).await)?;
        Ok(found.map(A::from_model))
    }

    #[instrument(name = "store_db.repo.create", skip_all, fields(entity = A::NAME))]
    async fn create(&self, item: &A) -> Result<A> {
        let tx = self.session.stage().await?;
        let created = item.insert(&*tx).await?;
        debug!(nid = created.nid(), "insert staged");
        Ok(created)
    }

    #[instrument(name = "store_db.repo.update", skip_all, fields(entity = A::NAME, nid = item.nid()))]
    async fn update(&self, item: &A) -> Result<()> {
        let tx = self.session.stage().await?;
        item.update(&*tx).await?;
        Ok(())
    }

    #[instrument(name = "store_db.repo.delete", skip_all, fields(entity = A::NAME, nid = item.nid()))]
    async fn delete(&self, item: &A) -> Result<()> {
        let tx = self.session.stage().await?;
        item.delete(&*tx).await?;
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        self.session.save().await?;
        Ok(())
    }

    async fn discard(&self) -> Result<()> {
        self.session.discard().await?;
        Ok(())
    }

    async fn load(&self, item: &mut A, relation: RelationOf<A>) -> Result<()> {
        with_conn!(self.session, |conn| A::include(
            std::slice::from_mut(item),
            &relation,
            conn
        )
        .await)?;
        Ok(())
    }
}
