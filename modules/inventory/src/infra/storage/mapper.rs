use crate::contract::model::{Consumable, Patrimony, Status, Tag, Unit};

use super::entity::{consumable, patrimony, status, tag, unit};

impl From<status::Model> for Status {
    fn from(m: status::Model) -> Self {
        Self {
            nid: m.nid,
            name: m.name,
        }
    }
}

impl From<unit::Model> for Unit {
    fn from(m: unit::Model) -> Self {
        Self {
            nid: m.nid,
            name: m.name,
            symbol: m.symbol,
        }
    }
}

impl From<tag::Model> for Tag {
    fn from(m: tag::Model) -> Self {
        Self {
            nid: m.nid,
            tid: m.tid,
            name: m.name,
        }
    }
}

impl From<patrimony::Model> for Patrimony {
    fn from(m: patrimony::Model) -> Self {
        Self {
            nid: m.nid,
            tid: m.tid,
            name: m.name,
            description: m.description,
            status_nid: m.status_nid,
            status: None,
            tags: None,
        }
    }
}

impl From<consumable::Model> for Consumable {
    fn from(m: consumable::Model) -> Self {
        Self {
            nid: m.nid,
            tid: m.tid,
            name: m.name,
            description: m.description,
            quantity: m.quantity,
            unit_nid: m.unit_nid,
            unit: None,
        }
    }
}
