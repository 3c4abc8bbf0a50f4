use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ActionLogs {
    Table,
    Id,
    ActorId,
    ActorType,
    ActionType,
    EntityType,
    EntityId,
    EntityName,
    Details,
    IpAddress,
    UserAgent,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActionLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActionLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActionLogs::ActorId).integer().null())
                    .col(ColumnDef::new(ActionLogs::ActorType).string_len(20).null())
                    .col(ColumnDef::new(ActionLogs::ActionType).string_len(20).not_null())
                    .col(ColumnDef::new(ActionLogs::EntityType).string_len(50).not_null())
                    .col(ColumnDef::new(ActionLogs::EntityId).integer().null())
                    .col(ColumnDef::new(ActionLogs::EntityName).string_len(255).null())
                    .col(
                        ColumnDef::new(ActionLogs::Details)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(ColumnDef::new(ActionLogs::IpAddress).string_len(64).null())
                    .col(ColumnDef::new(ActionLogs::UserAgent).text().null())
                    .col(
                        ColumnDef::new(ActionLogs::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_action_logs_entity")
                    .table(ActionLogs::Table)
                    .col(ActionLogs::EntityType)
                    .col(ActionLogs::EntityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActionLogs::Table).to_owned())
            .await
    }
}
