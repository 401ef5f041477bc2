use std::sync::Arc;

use query_core::{Page, PageRequest};
use sea_orm::{ColumnTrait, Condition};
use store_db::{Query, Repository};
use tracing::{debug, info, instrument, warn};

use crate::config::InventoryConfig;
use crate::contract::dto::{
    ConsumableCreate, ConsumableDetail, ConsumableListItem, ConsumableUpdate,
};
use crate::contract::error::{ServiceError, ServiceResult};
use crate::contract::model::{Consumable, Nid};
use crate::domain::validation::Validator;
use crate::infra::storage::entity::consumable;

const ENTITY: &str = "consumable";

pub type ConsumableRepository = dyn Repository<consumable::Entity, Item = Consumable>;

/// Create, change, remove and browse consumable stock.
#[derive(Clone)]
pub struct ConsumableService {
    repo: Arc<ConsumableRepository>,
    validator: Arc<dyn Validator<Consumable>>,
    config: InventoryConfig,
}

impl ConsumableService {
    pub fn new(
        repo: Arc<ConsumableRepository>,
        validator: Arc<dyn Validator<Consumable>>,
        config: InventoryConfig,
    ) -> Self {
        Self {
            repo,
            validator,
            config,
        }
    }

    #[instrument(
        name = "inventory.consumable.create",
        skip(self, dto),
        fields(tid = %dto.tid)
    )]
    pub async fn create(&self, dto: ConsumableCreate) -> ServiceResult<ConsumableDetail> {
        info!("Creating consumable");

        if self.tid_taken(&dto.tid, None).await? {
            return Err(ServiceError::tid_in_use(&dto.tid));
        }

        let item = dto.build_entity();
        self.validator.validate(&item).into_result()?;

        let mut created = self.commit(self.repo.create(&item).await).await?;
        self.repo
            .load(&mut created, consumable::Relation::Unit)
            .await?;

        info!(nid = created.nid, "Consumable created");
        Ok(ConsumableDetail::of(&created))
    }

    #[instrument(
        name = "inventory.consumable.update",
        skip(self, dto),
        fields(nid = dto.nid, tid = %dto.tid)
    )]
    pub async fn update(&self, dto: ConsumableUpdate) -> ServiceResult<ConsumableDetail> {
        info!("Updating consumable");

        if self.tid_taken(&dto.tid, Some(dto.nid)).await? {
            return Err(ServiceError::tid_in_use(&dto.tid));
        }

        let mut item = self.find(dto.nid).await?;
        dto.update_entity(&mut item);
        self.validator.validate(&item).into_result()?;

        self.commit(self.repo.update(&item).await).await?;
        self.repo.load(&mut item, consumable::Relation::Unit).await?;

        info!("Consumable updated");
        Ok(ConsumableDetail::of(&item))
    }

    #[instrument(name = "inventory.consumable.delete", skip(self), fields(nid = nid))]
    pub async fn delete(&self, nid: Nid) -> ServiceResult<ConsumableDetail> {
        info!("Deleting consumable");

        let mut item = self.find(nid).await?;
        self.repo.load(&mut item, consumable::Relation::Unit).await?;

        self.commit(self.repo.delete(&item).await).await?;

        info!("Consumable deleted");
        Ok(ConsumableDetail::of(&item))
    }

    /// One page of consumables, ordered by nid.
    ///
    /// The returned `page_size` is the effective size: 0 selects the
    /// configured default and larger requests are capped at `max_page_size`.
    #[instrument(name = "inventory.consumable.list", skip(self))]
    pub async fn list(
        &self,
        page_index: u64,
        page_size: u64,
    ) -> ServiceResult<Page<ConsumableListItem>> {
        let size = self.config.clamp_page_size(page_size);
        let query = Query::from(PageRequest::new(page_index, size))
            .sort_by(consumable::Column::Nid)
            .no_tracking();

        let total = self.repo.count(query.clone()).await?;
        let mut items = self.repo.read_query(query).await?;
        for item in items.iter_mut() {
            self.repo.load(item, consumable::Relation::Unit).await?;
        }

        debug!(rows = items.len(), total, "Listed consumables");
        Ok(Page::new(
            items.iter().map(ConsumableListItem::of).collect(),
            page_index,
            size,
            total,
        ))
    }

    #[instrument(name = "inventory.consumable.get", skip(self), fields(nid = nid))]
    pub async fn get(&self, nid: Nid) -> ServiceResult<ConsumableDetail> {
        debug!("Getting consumable by nid");

        let mut item = self.find(nid).await?;
        self.repo.load(&mut item, consumable::Relation::Unit).await?;
        Ok(ConsumableDetail::of(&item))
    }

    /// Commit a staged write, or roll the unit of work back if staging failed.
    async fn commit<T>(&self, staged: store_db::Result<T>) -> ServiceResult<T> {
        match staged {
            Ok(value) => {
                self.repo.save().await?;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "Write failed, discarding staged changes");
                if let Err(rollback) = self.repo.discard().await {
                    warn!(error = %rollback, "Rollback failed");
                }
                Err(e.into())
            }
        }
    }

    async fn find(&self, nid: Nid) -> ServiceResult<Consumable> {
        self.repo
            .find_by_nid(nid)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, nid))
    }

    async fn tid_taken(&self, tid: &str, except: Option<Nid>) -> ServiceResult<bool> {
        let mut predicate = Condition::all().add(consumable::Column::Tid.eq(tid));
        if let Some(nid) = except {
            predicate = predicate.add(consumable::Column::Nid.ne(nid));
        }
        let taken = self.repo.find_by(predicate).await?.is_some();
        if taken {
            debug!(tid, "Business identifier already in use");
        }
        Ok(taken)
    }
}
