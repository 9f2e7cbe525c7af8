// Lowercased shadow columns for case-insensitive matching beyond ASCII
use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_products::Products;
use crate::catalog::dao::fold_case;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite accepts a single column per ALTER TABLE
        for col in [
            ColumnDef::new(Products::TitleFolded)
                .text()
                .not_null()
                .default("")
                .to_owned(),
            ColumnDef::new(Products::DescriptionFolded).text().to_owned(),
            ColumnDef::new(Products::CategoryFolded)
                .text()
                .not_null()
                .default("")
                .to_owned(),
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Products::Table)
                        .add_column(col)
                        .to_owned(),
                )
                .await?;
        }

        backfill(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for col in [
            Products::CategoryFolded,
            Products::DescriptionFolded,
            Products::TitleFolded,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Products::Table)
                        .drop_column(col)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}

/// Fills the new columns for rows written before this migration.
async fn backfill(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let backend = manager.get_database_backend();
    let select = Query::select()
        .columns([
            Products::Id,
            Products::Title,
            Products::Description,
            Products::Category,
        ])
        .from(Products::Table)
        .to_owned();
    let rows = manager.get_connection().query_all(backend.build(&select)).await?;

    for row in rows {
        let id: i32 = row.try_get("", "id")?;
        let title: String = row.try_get("", "title")?;
        let description: Option<String> = row.try_get("", "description")?;
        let category: String = row.try_get("", "category")?;

        let update = Query::update()
            .table(Products::Table)
            .values([
                (Products::TitleFolded, fold_case(&title).into()),
                (
                    Products::DescriptionFolded,
                    description.as_deref().map(fold_case).into(),
                ),
                (Products::CategoryFolded, fold_case(&category).into()),
            ])
            .and_where(Expr::col(Products::Id).eq(id))
            .to_owned();
        manager.exec_stmt(update).await?;
    }
    Ok(())
}
