use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentHooks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentHooks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentHooks::Name).string().not_null())
                    .col(ColumnDef::new(PaymentHooks::Url).string().not_null())
                    .col(
                        ColumnDef::new(PaymentHooks::Provider)
                            .string_len(50)
                            .not_null()
                            .default("mercadopago"),
                    )
                    .col(ColumnDef::new(PaymentHooks::Event).string_len(100).not_null())
                    .col(
                        ColumnDef::new(PaymentHooks::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PaymentHooks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentHooks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PaymentHooks::Table)
                    .col(PaymentHooks::Event)
                    .col(PaymentHooks::Active)
                    .name("idx_payment_hooks_event_active")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentHooks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PaymentHooks {
    Table,
    Id,
    Name,
    Url,
    Provider,
    Event,
    Active,
    CreatedAt,
    UpdatedAt,
}
