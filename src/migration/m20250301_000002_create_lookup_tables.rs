use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Status {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Town {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Subtown {
    Table,
    Id,
    TownId,
    Name,
}

#[derive(DeriveIden)]
enum ComplaintTypes {
    Table,
    Id,
    TypeName,
}

#[derive(DeriveIden)]
enum ComplaintSubtypes {
    Table,
    Id,
    ComplaintTypeId,
    SubtypeName,
}

const STATUS_SEED: [&str; 5] = ["Pending", "Assigned", "In Progress", "Completed", "Cancelled"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Status::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Status::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Status::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert()
            .into_table(Status::Table)
            .columns([Status::Name])
            .to_owned();
        for name in STATUS_SEED {
            seed.values([name.into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }
        seed.on_conflict(OnConflict::column(Status::Name).do_nothing().to_owned());
        manager.exec_stmt(seed).await?;

        manager
            .create_table(
                Table::create()
                    .table(Town::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Town::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Town::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subtown::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subtown::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subtown::TownId).integer().not_null())
                    .col(ColumnDef::new(Subtown::Name).string_len(100).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subtown_town_id")
                            .from(Subtown::Table, Subtown::TownId)
                            .to(Town::Table, Town::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ComplaintTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintTypes::TypeName)
                            .string_len(100)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ComplaintSubtypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintSubtypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintSubtypes::ComplaintTypeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComplaintSubtypes::SubtypeName)
                            .string_len(100)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_subtypes_type_id")
                            .from(ComplaintSubtypes::Table, ComplaintSubtypes::ComplaintTypeId)
                            .to(ComplaintTypes::Table, ComplaintTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ComplaintSubtypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ComplaintTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subtown::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Town::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Status::Table).to_owned())
            .await
    }
}
