use sea_orm_migration::prelude::*;

mod m20260601_000001_create_users;
mod m20260601_000002_create_products;
mod m20260601_000003_create_orders;
mod m20260601_000004_create_order_items;
mod m20260601_000005_create_payment_hooks;
mod m20260601_000006_create_payment_hook_deliveries;
mod m20260601_000007_create_app_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_create_users::Migration),
            Box::new(m20260601_000002_create_products::Migration),
            Box::new(m20260601_000003_create_orders::Migration),
            Box::new(m20260601_000004_create_order_items::Migration),
            Box::new(m20260601_000005_create_payment_hooks::Migration),
            Box::new(m20260601_000006_create_payment_hook_deliveries::Migration),
            Box::new(m20260601_000007_create_app_settings::Migration),
        ]
    }
}
