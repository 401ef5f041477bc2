use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Status::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Status::Nid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Status::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Unit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Unit::Nid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Unit::Name).string().not_null())
                    .col(ColumnDef::new(Unit::Symbol).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tag::Nid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tag::Tid).string().not_null().unique_key())
                    .col(ColumnDef::new(Tag::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Patrimony::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Patrimony::Nid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Patrimony::Tid)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Patrimony::Name).string().not_null())
                    .col(ColumnDef::new(Patrimony::Description).string().null())
                    .col(ColumnDef::new(Patrimony::StatusNid).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patrimony_status")
                            .from(Patrimony::Table, Patrimony::StatusNid)
                            .to(Status::Table, Status::Nid)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Consumable::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Consumable::Nid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Consumable::Tid)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Consumable::Name).string().not_null())
                    .col(ColumnDef::new(Consumable::Description).string().null())
                    .col(
                        ColumnDef::new(Consumable::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Consumable::UnitNid).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_consumable_unit")
                            .from(Consumable::Table, Consumable::UnitNid)
                            .to(Unit::Table, Unit::Nid)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PatrimonyTag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PatrimonyTag::PatrimonyNid)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PatrimonyTag::TagNid).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PatrimonyTag::PatrimonyNid)
                            .col(PatrimonyTag::TagNid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patrimony_tag_patrimony")
                            .from(PatrimonyTag::Table, PatrimonyTag::PatrimonyNid)
                            .to(Patrimony::Table, Patrimony::Nid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patrimony_tag_tag")
                            .from(PatrimonyTag::Table, PatrimonyTag::TagNid)
                            .to(Tag::Table, Tag::Nid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            PatrimonyTag::Table.into_iden(),
            Consumable::Table.into_iden(),
            Patrimony::Table.into_iden(),
            Tag::Table.into_iden(),
            Unit::Table.into_iden(),
            Status::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Status {
    Table,
    Nid,
    Name,
}

#[derive(DeriveIden)]
enum Unit {
    Table,
    Nid,
    Name,
    Symbol,
}

#[derive(DeriveIden)]
enum Tag {
    Table,
    Nid,
    Tid,
    Name,
}

#[derive(DeriveIden)]
enum Patrimony {
    Table,
    Nid,
    Tid,
    Name,
    Description,
    StatusNid,
}

#[derive(DeriveIden)]
enum Consumable {
    Table,
    Nid,
    Tid,
    Name,
    Description,
    Quantity,
    UnitNid,
}

#[derive(DeriveIden)]
enum PatrimonyTag {
    Table,
    PatrimonyNid,
    TagNid,
}
