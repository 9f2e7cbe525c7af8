//! Migration module for the catalog database.
pub mod m20240101_000001_create_products;
pub mod m20240101_000002_index_products;
pub mod m20240101_000003_folded_columns;

use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

/// Migrator for the catalog database.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn sea_orm_migration::MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_products::Migration),
            Box::new(m20240101_000002_index_products::Migration),
            Box::new(m20240101_000003_folded_columns::Migration),
        ]
    }
}

/// Runs all pending migrations.
pub async fn run_migrations(db_conn: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db_conn, None).await
}
