use std::sync::Arc;

use query_core::Page;
use store_db::Query;
use tracing::{debug, instrument};

use crate::config::InventoryConfig;
use crate::contract::dto::ItemListItem;
use crate::contract::error::ServiceResult;
use crate::domain::consumable_service::ConsumableRepository;
use crate::domain::patrimony_service::PatrimonyRepository;
use crate::infra::storage::entity::{consumable, patrimony};

/// Listing across consumables and patrimonies.
///
/// No storage query spans both tables, so both are read in full and paged in
/// memory.
#[derive(Clone)]
pub struct ItemService {
    consumables: Arc<ConsumableRepository>,
    patrimonies: Arc<PatrimonyRepository>,
    config: InventoryConfig,
}

impl ItemService {
    pub fn new(
        consumables: Arc<ConsumableRepository>,
        patrimonies: Arc<PatrimonyRepository>,
        config: InventoryConfig,
    ) -> Self {
        Self {
            consumables,
            patrimonies,
            config,
        }
    }

    /// Items ordered by tid; on equal tids consumables come first.
    ///
    /// `page_size` in the result is the effective, clamped size.
    #[instrument(name = "inventory.item.list", skip(self))]
    pub async fn list(&self, page_index: u64, page_size: u64) -> ServiceResult<Page<ItemListItem>> {
        let size = self.config.clamp_page_size(page_size);

        let consumables = self
            .consumables
            .read_query(
                Query::new()
                    .include(consumable::Relation::Unit)
                    .sort_by(consumable::Column::Nid)
                    .no_tracking(),
            )
            .await?;
        let patrimonies = self
            .patrimonies
            .read_query(
                Query::new()
                    .include(patrimony::Relation::Status)
                    .sort_by(patrimony::Column::Nid)
                    .no_tracking(),
            )
            .await?;

        let mut items: Vec<ItemListItem> = consumables
            .iter()
            .map(ItemListItem::from)
            .chain(patrimonies.iter().map(ItemListItem::from))
            .collect();
        items.sort_by(|a, b| a.tid().cmp(b.tid()));

        debug!(
            consumables = consumables.len(),
            patrimonies = patrimonies.len(),
            "Combined item listing"
        );
        Ok(Page::paginate(items, page_index, size))
    }
}
