//! Transfer objects accepted and returned by the inventory services.

use serde::{Deserialize, Serialize};

use super::model::{Consumable, Nid, Patrimony, Status, Tag, Unit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub nid: Nid,
    pub name: String,
}

impl StatusView {
    pub fn of(status: &Status) -> Self {
        Self {
            nid: status.nid,
            name: status.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    pub nid: Nid,
    pub name: String,
    pub symbol: String,
}

impl UnitView {
    pub fn of(unit: &Unit) -> Self {
        Self {
            nid: unit.nid,
            name: unit.name.clone(),
            symbol: unit.symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagView {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
}

impl TagView {
    pub fn of(tag: &Tag) -> Self {
        Self {
            nid: tag.nid,
            tid: tag.tid.clone(),
            name: tag.name.clone(),
        }
    }
}

// ---- patrimony ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrimonyCreate {
    pub tid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status_nid: Nid,
    #[serde(default)]
    pub tag_nids: Vec<Nid>,
}

impl PatrimonyCreate {
    /// Build a not yet persisted patrimony carrying the resolved tags.
    pub fn build_entity(self, tags: Vec<Tag>) -> Patrimony {
        Patrimony {
            nid: 0,
            tid: self.tid,
            name: self.name,
            description: self.description,
            status_nid: self.status_nid,
            status: None,
            tags: Some(tags),
        }
    }
}

/// Full replacement of a patrimony's fields.
///
/// `tag_nids: None` leaves the tags untouched; `Some(vec![])` clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrimonyUpdate {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status_nid: Nid,
    #[serde(default)]
    pub tag_nids: Option<Vec<Nid>>,
}

impl PatrimonyUpdate {
    pub fn update_entity(&self, target: &mut Patrimony, tags: Option<Vec<Tag>>) {
        target.tid = self.tid.clone();
        target.name = self.name.clone();
        target.description = self.description.clone();
        if target.status_nid != self.status_nid {
            target.status_nid = self.status_nid;
            target.status = None;
        }
        if let Some(tags) = tags {
            target.tags = Some(tags);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatrimonyDetail {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
    pub description: Option<String>,
    pub status_nid: Nid,
    pub status: Option<StatusView>,
    pub tags: Vec<TagView>,
}

impl PatrimonyDetail {
    pub fn of(patrimony: &Patrimony) -> Self {
        Self {
            nid: patrimony.nid,
            tid: patrimony.tid.clone(),
            name: patrimony.name.clone(),
            description: patrimony.description.clone(),
            status_nid: patrimony.status_nid,
            status: patrimony.status.as_ref().map(StatusView::of),
            tags: patrimony
                .tags
                .iter()
                .flatten()
                .map(TagView::of)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatrimonyListItem {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
    pub status: Option<StatusView>,
}

impl PatrimonyListItem {
    pub fn of(patrimony: &Patrimony) -> Self {
        Self {
            nid: patrimony.nid,
            tid: patrimony.tid.clone(),
            name: patrimony.name.clone(),
            status: patrimony.status.as_ref().map(StatusView::of),
        }
    }
}

// ---- consumable ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableCreate {
    pub tid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    pub unit_nid: Nid,
}

impl ConsumableCreate {
    pub fn build_entity(self) -> Consumable {
        Consumable {
            nid: 0,
            tid: self.tid,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            unit_nid: self.unit_nid,
            unit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableUpdate {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_nid: Nid,
}

impl ConsumableUpdate {
    pub fn update_entity(&self, target: &mut Consumable) {
        target.tid = self.tid.clone();
        target.name = self.name.clone();
        target.description = self.description.clone();
        target.quantity = self.quantity;
        if target.unit_nid != self.unit_nid {
            target.unit_nid = self.unit_nid;
            target.unit = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumableDetail {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_nid: Nid,
    pub unit: Option<UnitView>,
}

impl ConsumableDetail {
    pub fn of(consumable: &Consumable) -> Self {
        Self {
            nid: consumable.nid,
            tid: consumable.tid.clone(),
            name: consumable.name.clone(),
            description: consumable.description.clone(),
            quantity: consumable.quantity,
            unit_nid: consumable.unit_nid,
            unit: consumable.unit.as_ref().map(UnitView::of),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumableListItem {
    pub nid: Nid,
    pub tid: String,
    pub name: String,
    pub quantity: i32,
    pub unit: Option<UnitView>,
}

impl ConsumableListItem {
    pub fn of(consumable: &Consumable) -> Self {
        Self {
            nid: consumable.nid,
            tid: consumable.tid.clone(),
            name: consumable.name.clone(),
            quantity: consumable.quantity,
            unit: consumable.unit.as_ref().map(UnitView::of),
        }
    }
}

// ---- cross-entity ----

/// One row of the combined item listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemListItem {
    Consumable(ConsumableListItem),
    Patrimony(PatrimonyListItem),
}

impl ItemListItem {
    pub fn tid(&self) -> &str {
        match self {
            Self::Consumable(c) => &c.tid,
            Self::Patrimony(p) => &p.tid,
        }
    }
}

impl From<&Consumable> for ItemListItem {
    fn from(consumable: &Consumable) -> Self {
        Self::Consumable(ConsumableListItem::of(consumable))
    }
}

impl From<&Patrimony> for ItemListItem {
    fn from(patrimony: &Patrimony) -> Self {
        Self::Patrimony(PatrimonyListItem::of(patrimony))
    }
}
