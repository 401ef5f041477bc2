//! Storage mapping of the inventory aggregates onto the generic SeaORM
//! repository.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use store_db::{Aggregate, Nid, SeaOrmRepository};

use crate::contract::model::{Consumable, Patrimony, Status, Tag, Unit};

use super::entity::{consumable, patrimony, patrimony_tag, status, tag, unit};

pub type PatrimonyRepo = SeaOrmRepository<Patrimony>;
pub type ConsumableRepo = SeaOrmRepository<Consumable>;
pub type TagRepo = SeaOrmRepository<Tag>;

#[async_trait]
impl Aggregate for Patrimony {
    type Entity = patrimony::Entity;

    const NAME: &'static str = "patrimony";

    fn from_model(model: patrimony::Model) -> Self {
        model.into()
    }

    fn nid(&self) -> Nid {
        self.nid
    }

    fn nid_column() -> patrimony::Column {
        patrimony::Column::Nid
    }

    async fn insert<C: ConnectionTrait>(&self, conn: &C) -> Result<Self, DbErr> {
        let model = patrimony::ActiveModel {
            tid: Set(self.tid.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            status_nid: Set(self.status_nid),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        if let Some(tags) = &self.tags {
            link_tags(conn, model.nid, tags).await?;
        }

        let mut created = Patrimony::from(model);
        created.status = self.status.clone();
        created.tags = self.tags.clone();
        Ok(created)
    }

    async fn update<C: ConnectionTrait>(&self, conn: &C) -> Result<(), DbErr> {
        patrimony::ActiveModel {
            nid: Set(self.nid),
            tid: Set(self.tid.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            status_nid: Set(self.status_nid),
        }
        .update(conn)
        .await?;

        if let Some(tags) = &self.tags {
            unlink_tags(conn, self.nid).await?;
            link_tags(conn, self.nid, tags).await?;
        }
        Ok(())
    }

    async fn delete<C: ConnectionTrait>(&self, conn: &C) -> Result<(), DbErr> {
        unlink_tags(conn, self.nid).await?;
        patrimony::Entity::delete_by_id(self.nid).exec(conn).await?;
        Ok(())
    }

    async fn include<C: ConnectionTrait>(
        items: &mut [Self],
        relation: &patrimony::Relation,
        conn: &C,
    ) -> Result<(), DbErr> {
        if items.is_empty() {
            return Ok(());
        }
        match relation {
            patrimony::Relation::Status => {
                let nids: BTreeSet<Nid> = items.iter().map(|p| p.status_nid).collect();
                let statuses: HashMap<Nid, Status> = status::Entity::find()
                    .filter(status::Column::Nid.is_in(nids))
                    .all(conn)
                    .await?
                    .into_iter()
                    .map(|m| (m.nid, Status::from(m)))
                    .collect();
                for p in items.iter_mut() {
                    p.status = statuses.get(&p.status_nid).cloned();
                }
            }
            patrimony::Relation::Tags => {
                let nids: Vec<Nid> = items.iter().map(|p| p.nid).collect();
                let links = patrimony_tag::Entity::find()
                    .filter(patrimony_tag::Column::PatrimonyNid.is_in(nids))
                    .all(conn)
                    .await?;
                let tag_nids: BTreeSet<Nid> = links.iter().map(|l| l.tag_nid).collect();
                let tags: HashMap<Nid, Tag> = tag::Entity::find()
                    .filter(tag::Column::Nid.is_in(tag_nids))
                    .all(conn)
                    .await?
                    .into_iter()
                    .map(|m| (m.nid, Tag::from(m)))
                    .collect();

                let mut by_patrimony: HashMap<Nid, Vec<Tag>> = HashMap::new();
                for link in links {
                    if let Some(tag) = tags.get(&link.tag_nid) {
                        by_patrimony
                            .entry(link.patrimony_nid)
                            .or_default()
                            .push(tag.clone());
                    }
                }
                for p in items.iter_mut() {
                    let mut tags = by_patrimony.remove(&p.nid).unwrap_or_default();
                    tags.sort_by_key(|t| t.nid);
                    p.tags = Some(tags);
                }
            }
        }
        Ok(())
    }
}

async fn link_tags<C: ConnectionTrait>(
    conn: &C,
    patrimony_nid: Nid,
    tags: &[Tag],
) -> Result<(), DbErr> {
    if tags.is_empty() {
        return Ok(());
    }
    let rows = tags.iter().map(|t| patrimony_tag::ActiveModel {
        patrimony_nid: Set(patrimony_nid),
        tag_nid: Set(t.nid),
    });
    patrimony_tag::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn unlink_tags<C: ConnectionTrait>(conn: &C, patrimony_nid: Nid) -> Result<(), DbErr> {
    patrimony_tag::Entity::delete_many()
        .filter(patrimony_tag::Column::PatrimonyNid.eq(patrimony_nid))
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl Aggregate for Consumable {
    type Entity = consumable::Entity;

    const NAME: &'static str = "consumable";

    fn from_model(model: consumable::Model) -> Self {
        model.into()
    }

    fn nid(&self) -> Nid {
        self.nid
    }

    fn nid_column() -> consumable::Column {
        consumable::Column::Nid
    }

    async fn insert<C: ConnectionTrait>(&self, conn: &C) -> Result<Self, DbErr> {
        let model = consumable::ActiveModel {
            tid: Set(self.tid.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            quantity: Set(self.quantity),
            unit_nid: Set(self.unit_nid),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        let mut created = Consumable::from(model);
        created.unit = self.unit.clone();
        Ok(created)
    }

    async fn update<C: ConnectionTrait>(&self, conn: &C) -> Result<(), DbErr> {
        consumable::ActiveModel {
            nid: Set(self.nid),
            tid: Set(self.tid.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            quantity: Set(self.quantity),
            unit_nid: Set(self.unit_nid),
        }
        .update(conn)
        .await?;
        Ok(())
    }

    async fn delete<C: ConnectionTrait>(&self, conn: &C) -> Result<(), DbErr> {
        consumable::Entity::delete_by_id(self.nid).exec(conn).await?;
        Ok(())
    }

    async fn include<C: ConnectionTrait>(
        items: &mut [Self],
        relation: &consumable::Relation,
        conn: &C,
    ) -> Result<(), DbErr> {
        if items.is_empty() {
            return Ok(());
        }
        match relation {
            consumable::Relation::Unit => {
                let nids: BTreeSet<Nid> = items.iter().map(|c| c.unit_nid).collect();
                let units: HashMap<Nid, Unit> = unit::Entity::find()
                    .filter(unit::Column::Nid.is_in(nids))
                    .all(conn)
                    .await?
                    .into_iter()
                    .map(|m| (m.nid, Unit::from(m)))
                    .collect();
                for c in items.iter_mut() {
                    c.unit = units.get(&c.unit_nid).cloned();
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Aggregate for Tag {
    type Entity = tag::Entity;

    const NAME: &'static str = "tag";

    fn from_model(model: tag::Model) -> Self {
        model.into()
    }

    fn nid(&self) -> Nid {
        self.nid
    }

    fn nid_column() -> tag::Column {
        tag::Column::Nid
    }

    async fn insert<C: ConnectionTrait>(&self, conn: &C) -> Result<Self, DbErr> {
        let model = tag::ActiveModel {
            tid: Set(self.tid.clone()),
            name: Set(self.name.clone()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(model.into())
    }

    async fn update<C: ConnectionTrait>(&self, conn: &C) -> Result<(), DbErr> {
        tag::ActiveModel {
            nid: Set(self.nid),
            tid: Set(self.tid.clone()),
            name: Set(self.name.clone()),
        }
        .update(conn)
        .await?;
        Ok(())
    }

    async fn delete<C: ConnectionTrait>(&self, conn: &C) -> Result<(), DbErr> {
        tag::Entity::delete_by_id(self.nid).exec(conn).await?;
        Ok(())
    }

    async fn include<C: ConnectionTrait>(
        _items: &mut [Self],
        relation: &tag::Relation,
        _conn: &C,
    ) -> Result<(), DbErr> {
        match *relation {}
    }
}
