//! Product entity. Read-only from the search path.
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    /// Lowercased copies used for case-insensitive matching. SQLite `LOWER()` only folds ASCII.
    #[sea_orm(column_type = "Text")]
    pub title_folded: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_folded: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub category_folded: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
