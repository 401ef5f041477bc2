#![allow(dead_code)]

use inventory::contract::dto::{ConsumableCreate, PatrimonyCreate};
use inventory::contract::model::Nid;
use inventory::infra::storage::entity::{status, tag, unit};
use inventory::{Inventory, InventoryConfig};
use sea_orm::{ActiveModelTrait, Set};
use store_db::{ConnectOpts, DbHandle};

/// Migrated in-memory inventory.
pub async fn setup() -> Inventory {
    setup_with(InventoryConfig::default()).await
}

pub async fn setup_with(config: InventoryConfig) -> Inventory {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("db connect");
    let inventory = Inventory::new(db.sea(), config);
    inventory.migrate().await.expect("migrate");
    inventory
}

pub async fn add_status(inv: &Inventory, name: &str) -> Nid {
    status::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(inv.connection())
    .await
    .expect("insert status")
    .nid
}

pub async fn add_unit(inv: &Inventory, name: &str, symbol: &str) -> Nid {
    unit::ActiveModel {
        name: Set(name.to_string()),
        symbol: Set(symbol.to_string()),
        ..Default::default()
    }
    .insert(inv.connection())
    .await
    .expect("insert unit")
    .nid
}

pub async fn add_tag(inv: &Inventory, tid: &str, name: &str) -> Nid {
    tag::ActiveModel {
        tid: Set(tid.to_string()),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(inv.connection())
    .await
    .expect("insert tag")
    .nid
}

pub fn new_patrimony(tid: &str, status_nid: Nid) -> PatrimonyCreate {
    PatrimonyCreate {
        tid: tid.to_string(),
        name: format!("Asset {tid}"),
        description: None,
        status_nid,
        tag_nids: Vec::new(),
    }
}

pub fn new_consumable(tid: &str, unit_nid: Nid, quantity: i32) -> ConsumableCreate {
    ConsumableCreate {
        tid: tid.to_string(),
        name: format!("Stock {tid}"),
        description: None,
        quantity,
        unit_nid,
    }
}
