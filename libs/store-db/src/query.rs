//! Declarative query specification over one SeaORM entity.
//!
//! A [`Query`] records filter, include and sort directives plus paging, and
//! replays them onto a `Select<E>` in a fixed order:
//! no-tracking hint → includes → filters → sorts → offset → limit.

use std::fmt;
use std::mem::{discriminant, Discriminant};

use query_core::{Error, PageRequest, SortDir};
use sea_orm::sea_query::IntoCondition;
use sea_orm::{
    Condition, EntityTrait, JoinType, Order, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    RelationType, Select,
};
use tracing::trace;

/// Largest offset or limit the SQL drivers bind; they take signed 64-bit values.
pub const MAX_ROWS: u64 = i64::MAX as u64;

/// One recorded step of a query.
pub enum Directive<E: EntityTrait> {
    Filter(Condition),
    Include(E::Relation),
    Sort(E::Column, SortDir),
}

pub struct Query<E: EntityTrait> {
    skip: u64,
    take: u64,
    no_tracking: bool,
    directives: Vec<Directive<E>>,
}

impl<E: EntityTrait> Default for Query<E> {
    fn default() -> Self {
        Self {
            skip: 0,
            take: 0,
            no_tracking: false,
            directives: Vec::new(),
        }
    }
}

impl<E: EntityTrait> Query<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query positioned on the given page.
    pub fn from_page(page: Option<PageRequest>) -> Result<Self, Error> {
        page.map(Self::from).ok_or(Error::MissingArgument("page"))
    }

    /// Absolute offset; the last call wins.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Absolute limit; the last call wins. Zero means no limit.
    pub fn take(mut self, take: u64) -> Self {
        self.take = take;
        self
    }

    pub fn paging(mut self, index: u64, size: u64) -> Self {
        let page = PageRequest::new(index, size);
        self.skip = page.skip();
        self.take = page.take();
        self
    }

    /// Mark the results as read-only.
    pub fn no_tracking(mut self) -> Self {
        self.no_tracking = true;
        self
    }

    /// Add a predicate; all predicates are AND-combined.
    pub fn filter<F: IntoCondition>(mut self, predicate: F) -> Self {
        self.directives
            .push(Directive::Filter(predicate.into_condition()));
        self
    }

    /// Eager-load a relation. Repeated includes of the same relation are
    /// joined and loaded once.
    pub fn include(mut self, relation: E::Relation) -> Self {
        self.directives.push(Directive::Include(relation));
        self
    }

    pub fn sort_by(mut self, column: E::Column) -> Self {
        self.directives.push(Directive::Sort(column, SortDir::Asc));
        self
    }

    pub fn sort_by_desc(mut self, column: E::Column) -> Self {
        self.directives.push(Directive::Sort(column, SortDir::Desc));
        self
    }

    /// Drop skip/take, keeping every other directive.
    pub fn unpaged(mut self) -> Self {
        self.skip = 0;
        self.take = 0;
        self
    }

    pub fn offset(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> u64 {
        self.take
    }

    pub fn is_no_tracking(&self) -> bool {
        self.no_tracking
    }

    pub fn directives(&self) -> &[Directive<E>] {
        &self.directives
    }

    /// Included relations in first-seen order, without repeats.
    pub fn includes(&self) -> impl Iterator<Item = &E::Relation> + '_ {
        let mut seen: Vec<Discriminant<E::Relation>> = Vec::new();
        self.directives.iter().filter_map(move |d| match d {
            Directive::Include(relation) if !seen.contains(&discriminant(relation)) => {
                seen.push(discriminant(relation));
                Some(relation)
            }
            _ => None,
        })
    }

    pub fn filters(&self) -> impl Iterator<Item = &Condition> + '_ {
        self.directives.iter().filter_map(|d| match d {
            Directive::Filter(condition) => Some(condition),
            _ => None,
        })
    }

    pub fn sortings(&self) -> impl Iterator<Item = (E::Column, SortDir)> + '_ {
        self.directives.iter().filter_map(|d| match d {
            Directive::Sort(column, dir) => Some((*column, *dir)),
            _ => None,
        })
    }

    /// Replay the recorded directives onto `source`.
    ///
    /// To-one includes become LEFT JOINs; to-many includes only shape the
    /// load plan and are materialised by the repository after the read.
    /// Offset and limit are capped at [`MAX_ROWS`], so an offset past any
    /// real table yields no rows.
    pub fn apply_to(&self, source: impl Into<Option<Select<E>>>) -> Result<Select<E>, Error> {
        let mut select = source.into().ok_or(Error::MissingArgument("source"))?;

        if self.no_tracking {
            trace!(entity = %E::default().table_name(), "read-only query");
        }

        for relation in self.includes() {
            let def = relation.def();
            if matches!(def.rel_type, RelationType::HasOne) {
                select = select.join(JoinType::LeftJoin, def);
            }
        }

        for condition in self.filters() {
            select = select.filter(condition.clone());
        }

        for (column, dir) in self.sortings() {
            select = select.order_by(column, order_of(dir));
        }

        if self.skip > 0 {
            select = select.offset(self.skip.min(MAX_ROWS));
        }

        if self.take > 0 {
            select = select.limit(self.take.min(MAX_ROWS));
        }

        Ok(select)
    }
}

fn order_of(dir: SortDir) -> Order {
    match dir {
        SortDir::Asc => Order::Asc,
        SortDir::Desc => Order::Desc,
    }
}

impl<E: EntityTrait> From<PageRequest> for Query<E> {
    fn from(page: PageRequest) -> Self {
        Self::new().paging(page.index, page.size)
    }
}

impl<E> Clone for Directive<E>
where
    E: EntityTrait,
    E::Relation: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Directive::Filter(condition) => Directive::Filter(condition.clone()),
            Directive::Include(relation) => Directive::Include(relation.clone()),
            Directive::Sort(column, dir) => Directive::Sort(*column, *dir),
        }
    }
}

impl<E> Clone for Query<E>
where
    E: EntityTrait,
    E::Relation: Clone,
{
    fn clone(&self) -> Self {
        Self {
            skip: self.skip,
            take: self.take,
            no_tracking: self.no_tracking,
            directives: self.directives.clone(),
        }
    }
}

impl<E> fmt::Debug for Directive<E>
where
    E: EntityTrait,
    E::Relation: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Filter(condition) => f.debug_tuple("Filter").field(condition).finish(),
            Directive::Include(relation) => f.debug_tuple("Include").field(relation).finish(),
            Directive::Sort(column, dir) => f.debug_tuple("Sort").field(column).field(dir).finish(),
        }
    }
}

impl<E> fmt::Debug for Query<E>
where
    E: EntityTrait,
    E::Relation: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("skip", &self.skip)
            .field("take", &self.take)
            .field("no_tracking", &self.no_tracking)
            .field("directives", &self.directives)
            .finish()
    }
}

/// `select.apply_query(&query)` for call sites that start from a `Select`.
pub trait QueryExt<E: EntityTrait>: Sized {
    fn apply_query(self, query: &Query<E>) -> Result<Self, Error>;
}

impl<E: EntityTrait> QueryExt<E> for Select<E> {
    fn apply_query(self, query: &Query<E>) -> Result<Self, Error> {
        query.apply_to(self)
    }
}
