use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum WorkRequests {
    Table,
    Id,
    TownId,
    SubtownId,
    ComplaintTypeId,
    ComplaintSubtypeId,
    ContactNumber,
    Address,
    Description,
    RequestDate,
    StatusId,
    AssignedTo,
    CreatorId,
    CreatorType,
}

#[derive(DeriveIden)]
enum Town {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subtown {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ComplaintTypes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ComplaintSubtypes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Status {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Agents {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS postgis")
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkRequests::TownId).integer().not_null())
                    .col(ColumnDef::new(WorkRequests::SubtownId).integer().null())
                    .col(
                        ColumnDef::new(WorkRequests::ComplaintTypeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkRequests::ComplaintSubtypeId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WorkRequests::ContactNumber)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkRequests::Address).string_len(500).not_null())
                    .col(ColumnDef::new(WorkRequests::Description).text().not_null())
                    .col(
                        ColumnDef::new(WorkRequests::RequestDate)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(WorkRequests::StatusId).integer().not_null())
                    .col(ColumnDef::new(WorkRequests::AssignedTo).integer().null())
                    .col(ColumnDef::new(WorkRequests::CreatorId).integer().not_null())
                    .col(
                        ColumnDef::new(WorkRequests::CreatorType)
                            .string_len(20)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_requests_town_id")
                            .from(WorkRequests::Table, WorkRequests::TownId)
                            .to(Town::Table, Town::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_requests_subtown_id")
                            .from(WorkRequests::Table, WorkRequests::SubtownId)
                            .to(Subtown::Table, Subtown::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_requests_complaint_type_id")
                            .from(WorkRequests::Table, WorkRequests::ComplaintTypeId)
                            .to(ComplaintTypes::Table, ComplaintTypes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_requests_complaint_subtype_id")
                            .from(WorkRequests::Table, WorkRequests::ComplaintSubtypeId)
                            .to(ComplaintSubtypes::Table, ComplaintSubtypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_requests_status_id")
                            .from(WorkRequests::Table, WorkRequests::StatusId)
                            .to(Status::Table, Status::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_requests_assigned_to")
                            .from(WorkRequests::Table, WorkRequests::AssignedTo)
                            .to(Agents::Table, Agents::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // creator_id points at one of three tables depending on creator_type,
        // so only the tag itself can be constrained here.
        db.execute_unprepared(
            "ALTER TABLE work_requests \
                ADD CONSTRAINT chk_work_requests_creator_type \
                CHECK (creator_type IN ('user', 'agent', 'socialmedia'))",
        )
        .await?;

        db.execute_unprepared(
            "ALTER TABLE work_requests ADD COLUMN IF NOT EXISTS geo_tag geometry(Point, 4326)",
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_work_requests_geo_tag \
                ON work_requests USING GIST (geo_tag)",
        )
        .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_requests_request_date")
                    .table(WorkRequests::Table)
                    .col(WorkRequests::RequestDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_requests_creator")
                    .table(WorkRequests::Table)
                    .col(WorkRequests::CreatorType)
                    .col(WorkRequests::CreatorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkRequests::Table).to_owned())
            .await
    }
}
