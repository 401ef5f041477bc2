//! Junction between patrimonies and tags.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "patrimony_tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub patrimony_nid: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_nid: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::patrimony::Entity",
        from = "Column::PatrimonyNid",
        to = "super::patrimony::Column::Nid",
        on_delete = "Cascade"
    )]
    Patrimony,
    #[sea_orm(
        belongs_to = "super::tag::Entity",
        from = "Column::TagNid",
        to = "super::tag::Column::Nid",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::patrimony::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patrimony.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
