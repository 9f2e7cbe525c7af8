// Indexes backing the active-flag filter and the newest-first fallback listing
use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_products::Products;

const IDX_ACTIVE: &str = "idx_products_is_active";
const IDX_CREATED: &str = "idx_products_created_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_ACTIVE)
                    .table(Products::Table)
                    .col(Products::IsActive)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_CREATED)
                    .table(Products::Table)
                    .col(Products::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_CREATED).table(Products::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(IDX_ACTIVE).table(Products::Table).to_owned())
            .await
    }
}
