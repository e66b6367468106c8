use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentHookDeliveries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentHookDeliveries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentHookDeliveries::HookId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentHookDeliveries::Event)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentHookDeliveries::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentHookDeliveries::StatusCode).integer())
                    .col(ColumnDef::new(PaymentHookDeliveries::Error).text())
                    .col(
                        ColumnDef::new(PaymentHookDeliveries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PaymentHookDeliveries::Table, PaymentHookDeliveries::HookId)
                            .to(PaymentHooks::Table, PaymentHooks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PaymentHookDeliveries::Table)
                    .col(PaymentHookDeliveries::HookId)
                    .col(PaymentHookDeliveries::CreatedAt)
                    .name("idx_payment_hook_deliveries_hook_id_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentHookDeliveries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PaymentHookDeliveries {
    Table,
    Id,
    HookId,
    Event,
    Payload,
    StatusCode,
    Error,
    CreatedAt,
}

#[derive(Iden)]
enum PaymentHooks {
    Table,
    Id,
}
