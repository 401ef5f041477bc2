//! Wiring of the inventory services onto a database connection.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::AppConfig;
use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use store_db::{DbHandle, Session};
use tracing::info;

use crate::config::InventoryConfig;
use crate::domain::{
    ConsumableService, ConsumableValidator, ItemService, PatrimonyService, PatrimonyValidator,
};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{ConsumableRepo, PatrimonyRepo, TagRepo};

#[derive(Clone)]
pub struct Inventory {
    db: DatabaseConnection,
    config: InventoryConfig,
}

/// The services of one unit of work; they share a single [`Session`].
#[derive(Clone)]
pub struct InventoryServices {
    pub patrimonies: PatrimonyService,
    pub consumables: ConsumableService,
    pub items: ItemService,
    session: Arc<Session>,
}

impl InventoryServices {
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

impl Inventory {
    pub const MODULE_NAME: &'static str = "inventory";

    pub fn new(db: DatabaseConnection, config: InventoryConfig) -> Self {
        Self { db, config }
    }

    /// Connect to the configured database, read the module section and bring
    /// the schema up to date.
    pub async fn from_app_config(app: &AppConfig) -> Result<Self> {
        let db_config = app
            .database
            .as_ref()
            .context("no database configured")?;
        let config: InventoryConfig = app.module_config(Self::MODULE_NAME)?;

        let url = db_config
            .resolved_url(Path::new(&app.home_dir))
            .context("failed to resolve database url")?;
        let handle = DbHandle::connect(&url, db_config.connect_opts())
            .await
            .with_context(|| format!("failed to connect to {url}"))?;
        info!(engine = ?handle.engine(), "Inventory database connected");

        let inventory = Self::new(handle.sea(), config);
        inventory.migrate().await.context("migration failed")?;
        Ok(inventory)
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<(), DbErr> {
        Migrator::up(&self.db, None).await?;
        info!("Inventory schema up to date");
        Ok(())
    }

    /// Fresh services over a new session.
    pub fn services(&self) -> InventoryServices {
        let session = Arc::new(Session::new(self.db.clone()));
        let patrimonies = Arc::new(PatrimonyRepo::new(session.clone()));
        let consumables = Arc::new(ConsumableRepo::new(session.clone()));
        let tags = Arc::new(TagRepo::new(session.clone()));

        InventoryServices {
            patrimonies: PatrimonyService::new(
                patrimonies.clone(),
                tags,
                Arc::new(PatrimonyValidator::new(&self.config)),
                self.config.clone(),
            ),
            consumables: ConsumableService::new(
                consumables.clone(),
                Arc::new(ConsumableValidator::new(&self.config)),
                self.config.clone(),
            ),
            items: ItemService::new(consumables, patrimonies, self.config.clone()),
            session,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }
}
