use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    ServiceName,
    Price,
    UserId,
    StartDate,
    EndDate,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::ServiceName)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::Price)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Subscriptions::Price).gte(0)),
                    )
                    .col(ColumnDef::new(Subscriptions::UserId).uuid().not_null())
                    // first instant of the month, UTC
                    .col(
                        ColumnDef::new(Subscriptions::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // NULL = open-ended
                    .col(
                        ColumnDef::new(Subscriptions::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscriptions_user")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscriptions_period")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::StartDate)
                    .col(Subscriptions::EndDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Subscriptions::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
