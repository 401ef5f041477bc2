use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "consumable")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub nid: i32,
    #[sea_orm(unique)]
    pub tid: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_nid: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitNid",
        to = "super::unit::Column::Nid"
    )]
    Unit,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
