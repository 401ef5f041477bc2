use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "patrimony")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub nid: i32,
    #[sea_orm(unique)]
    pub tid: String,
    pub name: String,
    pub description: Option<String>,
    pub status_nid: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::status::Entity",
        from = "Column::StatusNid",
        to = "super::status::Column::Nid"
    )]
    Status,
    #[sea_orm(has_many = "super::patrimony_tag::Entity")]
    Tags,
}

impl Related<super::status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::patrimony_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::patrimony_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::patrimony_tag::Relation::Patrimony.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
