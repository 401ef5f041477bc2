use std::sync::Arc;

use query_core::{Page, PageRequest};
use sea_orm::{ColumnTrait, Condition};
use store_db::{Query, Repository};
use tracing::{debug, info, instrument, warn};

use crate::config::InventoryConfig;
use crate::contract::dto::{PatrimonyCreate, PatrimonyDetail, PatrimonyListItem, PatrimonyUpdate};
use crate::contract::error::{ServiceError, ServiceResult};
use crate::contract::model::{Nid, Patrimony, Tag};
use crate::domain::validation::Validator;
use crate::infra::storage::entity::{patrimony, tag};

const ENTITY: &str = "patrimony";

pub type PatrimonyRepository = dyn Repository<patrimony::Entity, Item = Patrimony>;
pub type TagRepository = dyn Repository<tag::Entity, Item = Tag>;

/// Create, change, remove and browse patrimonies.
#[derive(Clone)]
pub struct PatrimonyService {
    repo: Arc<PatrimonyRepository>,
    tags: Arc<TagRepository>,
    validator: Arc<dyn Validator<Patrimony>>,
    config: InventoryConfig,
}

impl PatrimonyService {
    pub fn new(
        repo: Arc<PatrimonyRepository>,
        tags: Arc<TagRepository>,
        validator: Arc<dyn Validator<Patrimony>>,
        config: InventoryConfig,
    ) -> Self {
        Self {
            repo,
            tags,
            validator,
            config,
        }
    }

    #[instrument(
        name = "inventory.patrimony.create",
        skip(self, dto),
        fields(tid = %dto.tid)
    )]
    pub async fn create(&self, dto: PatrimonyCreate) -> ServiceResult<PatrimonyDetail> {
        info!("Creating patrimony");

        if self.tid_taken(&dto.tid, None).await? {
            return Err(ServiceError::tid_in_use(&dto.tid));
        }

        let tags = self.resolve_tags(&dto.tag_nids).await?;
        let patrimony = dto.build_entity(tags);
        self.validator.validate(&patrimony).into_result()?;

        let mut created = self.commit(self.repo.create(&patrimony).await).await?;
        self.repo
            .load(&mut created, patrimony::Relation::Status)
            .await?;

        info!(nid = created.nid, "Patrimony created");
        Ok(PatrimonyDetail::of(&created))
    }

    #[instrument(
        name = "inventory.patrimony.update",
        skip(self, dto),
        fields(nid = dto.nid, tid = %dto.tid)
    )]
    pub async fn update(&self, dto: PatrimonyUpdate) -> ServiceResult<PatrimonyDetail> {
        info!("Updating patrimony");

        if self.tid_taken(&dto.tid, Some(dto.nid)).await? {
            return Err(ServiceError::tid_in_use(&dto.tid));
        }

        let tags = match &dto.tag_nids {
            Some(nids) => Some(self.resolve_tags(nids).await?),
            None => None,
        };

        let mut patrimony = self.find(dto.nid).await?;
        dto.update_entity(&mut patrimony, tags);
        self.validator.validate(&patrimony).into_result()?;

        self.commit(self.repo.update(&patrimony).await).await?;
        self.load_detail(&mut patrimony).await?;

        info!("Patrimony updated");
        Ok(PatrimonyDetail::of(&patrimony))
    }

    /// Remove a patrimony; the response describes what was removed.
    #[instrument(name = "inventory.patrimony.delete", skip(self), fields(nid = nid))]
    pub async fn delete(&self, nid: Nid) -> ServiceResult<PatrimonyDetail> {
        info!("Deleting patrimony");

        let mut patrimony = self.find(nid).await?;
        self.load_detail(&mut patrimony).await?;

        self.commit(self.repo.delete(&patrimony).await).await?;

        info!("Patrimony deleted");
        Ok(PatrimonyDetail::of(&patrimony))
    }

    /// One page of patrimonies, ordered by nid.
    ///
    /// The returned `page_size` is the effective size: 0 selects the
    /// configured default and larger requests are capped at `max_page_size`.
    #[instrument(name = "inventory.patrimony.list", skip(self))]
    pub async fn list(
        &self,
        page_index: u64,
        page_size: u64,
    ) -> ServiceResult<Page<PatrimonyListItem>> {
        let size = self.config.clamp_page_size(page_size);
        let query = Query::from(PageRequest::new(page_index, size))
            .sort_by(patrimony::Column::Nid)
            .no_tracking();

        let total = self.repo.count(query.clone()).await?;
        let mut patrimonies = self.repo.read_query(query).await?;
        for p in patrimonies.iter_mut() {
            self.repo.load(p, patrimony::Relation::Status).await?;
        }

        debug!(rows = patrimonies.len(), total, "Listed patrimonies");
        Ok(Page::new(
            patrimonies.iter().map(PatrimonyListItem::of).collect(),
            page_index,
            size,
            total,
        ))
    }

    #[instrument(name = "inventory.patrimony.get", skip(self), fields(nid = nid))]
    pub async fn get(&self, nid: Nid) -> ServiceResult<PatrimonyDetail> {
        debug!("Getting patrimony by nid");

        let mut patrimony = self.find(nid).await?;
        self.load_detail(&mut patrimony).await?;
        Ok(PatrimonyDetail::of(&patrimony))
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

    async fn find(&self, nid: Nid) -> ServiceResult<Patrimony> {
        self.repo
            .find_by_nid(nid)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, nid))
    }

    /// Whether `tid` belongs to a patrimony other than `except`.
    async fn tid_taken(&self, tid: &str, except: Option<Nid>) -> ServiceResult<bool> {
        let mut predicate = Condition::all().add(patrimony::Column::Tid.eq(tid));
        if let Some(nid) = except {
            predicate = predicate.add(patrimony::Column::Nid.ne(nid));
        }
        let taken = self.repo.find_by(predicate).await?.is_some();
        if taken {
            debug!(tid, "Business identifier already in use");
        }
        Ok(taken)
    }

    /// Unknown tag nids are skipped.
    async fn resolve_tags(&self, nids: &[Nid]) -> ServiceResult<Vec<Tag>> {
        if nids.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new()
            .filter(tag::Column::Nid.is_in(nids.iter().copied()))
            .sort_by(tag::Column::Nid);
        let tags = self.tags.read_query(query).await?;
        if tags.len() < nids.len() {
            debug!(
                requested = nids.len(),
                resolved = tags.len(),
                "Some tag nids did not resolve"
            );
        }
        Ok(tags)
    }

    async fn load_detail(&self, patrimony: &mut Patrimony) -> ServiceResult<()> {
        if patrimony.status.is_none() {
            self.repo
                .load(patrimony, patrimony::Relation::Status)
                .await?;
        }
        if patrimony.tags.is_none() {
            self.repo.load(patrimony, patrimony::Relation::Tags).await?;
        }
        Ok(())
    }
}
