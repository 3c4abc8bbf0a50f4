use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum WorkRequestMedia {
    Table,
    Id,
    WorkRequestId,
    Kind,
    FileUrl,
    Description,
    UploaderId,
    UploaderType,
    UploadedAt,
}

#[derive(DeriveIden)]
enum WorkRequests {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkRequestMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkRequestMedia::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkRequestMedia::WorkRequestId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkRequestMedia::Kind).string_len(10).not_null())
                    .col(
                        ColumnDef::new(WorkRequestMedia::FileUrl)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkRequestMedia::Description).text().null())
                    .col(
                        ColumnDef::new(WorkRequestMedia::UploaderId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkRequestMedia::UploaderType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkRequestMedia::UploadedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_request_media_request")
                            .from(WorkRequestMedia::Table, WorkRequestMedia::WorkRequestId)
                            .to(WorkRequests::Table, WorkRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_request_media_request")
                    .table(WorkRequestMedia::Table)
                    .col(WorkRequestMedia::WorkRequestId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkRequestMedia::Table).to_owned())
            .await
    }
}
