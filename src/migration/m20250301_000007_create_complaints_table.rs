use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Complaints {
    Table,
    Id,
    TownId,
    ComplaintTypeId,
    ContactNumber,
    Address,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Town {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ComplaintTypes {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complaints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Complaints::TownId).integer().not_null())
                    .col(
                        ColumnDef::new(Complaints::ComplaintTypeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Complaints::ContactNumber)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Complaints::Address).string_len(500).not_null())
                    .col(ColumnDef::new(Complaints::Description).text().not_null())
                    .col(
                        ColumnDef::new(Complaints::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_town_id")
                            .from(Complaints::Table, Complaints::TownId)
                            .to(Town::Table, Town::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_complaint_type_id")
                            .from(Complaints::Table, Complaints::ComplaintTypeId)
                            .to(ComplaintTypes::Table, ComplaintTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE complaints ADD COLUMN IF NOT EXISTS geo_tag geometry(Point, 4326)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaints::Table).to_owned())
            .await
    }
}
