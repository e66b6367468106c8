use sea_orm_migration::prelude::*;

use vitrine_store_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
