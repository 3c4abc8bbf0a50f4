use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum RequestAssignSmagent {
    Table,
    Id,
    WorkRequestsId,
    SocialmediaAgentId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WorkRequests {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Socialmediaperson {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RequestAssignSmagent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestAssignSmagent::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequestAssignSmagent::WorkRequestsId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestAssignSmagent::SocialmediaAgentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestAssignSmagent::Status)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(RequestAssignSmagent::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_assign_smagent_request")
                            .from(
                                RequestAssignSmagent::Table,
                                RequestAssignSmagent::WorkRequestsId,
                            )
                            .to(WorkRequests::Table, WorkRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_assign_smagent_agent")
                            .from(
                                RequestAssignSmagent::Table,
                                RequestAssignSmagent::SocialmediaAgentId,
                            )
                            .to(Socialmediaperson::Table, Socialmediaperson::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_assign_smagent_unique")
                    .table(RequestAssignSmagent::Table)
                    .col(RequestAssignSmagent::WorkRequestsId)
                    .col(RequestAssignSmagent::SocialmediaAgentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_assign_smagent_agent")
                    .table(RequestAssignSmagent::Table)
                    .col(RequestAssignSmagent::SocialmediaAgentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RequestAssignSmagent::Table).to_owned())
            .await
    }
}
