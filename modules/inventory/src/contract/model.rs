//! Inventory domain model.
//!
//! `nid` is the storage-assigned numeric key; `tid` is the business
//! identifier, unique among entities of the same kind. Relations are `None`
//! until they have been loaded.

pub use store_db::Nid;

/// Lifecycle state of a patrimony (e.g. "In use", "Retired").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub nid: Nid,
    pub name: String,
}

/// Unit of measure for consumable quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub nid: Nid,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
}

/// A durable, individually tracked asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patrimony {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
    pub description: Option<String>,
    pub status_nid: Nid,
    pub status: Option<Status>,
    pub tags: Option<Vec<Tag>>,
}

/// Stock tracked by quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumable {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_nid: Nid,
    pub unit: Option<Unit>,
}
