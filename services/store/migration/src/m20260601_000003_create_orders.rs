use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Orders::TotalCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::Currency)
                            .string_len(3)
                            .not_null()
                            .default("BRL"),
                    )
                    .col(ColumnDef::new(Orders::CustomerEmail).string())
                    .col(ColumnDef::new(Orders::CustomerId).uuid())
                    .col(ColumnDef::new(Orders::Provider).string_len(32))
                    .col(ColumnDef::new(Orders::ProviderPreferenceId).string())
                    .col(ColumnDef::new(Orders::ProviderPaymentId).string())
                    .col(ColumnDef::new(Orders::ProviderStatus).string())
                    .col(ColumnDef::new(Orders::ProviderStatusDetail).string())
                    .col(ColumnDef::new(Orders::ReceiptSentAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_orders_status", Orders::Status),
            ("idx_orders_created_at", Orders::CreatedAt),
            ("idx_orders_customer_id", Orders::CustomerId),
            ("idx_orders_provider_preference_id", Orders::ProviderPreferenceId),
            ("idx_orders_provider_payment_id", Orders::ProviderPaymentId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .table(Orders::Table)
                        .col(column)
                        .name(name)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    Status,
    TotalCents,
    Currency,
    CustomerEmail,
    CustomerId,
    Provider,
    ProviderPreferenceId,
    ProviderPaymentId,
    ProviderStatus,
    ProviderStatusDetail,
    ReceiptSentAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
