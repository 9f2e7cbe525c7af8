use crate::catalog::entities::ProductEntity;
use crate::catalog::entities::product::{ActiveModel, Column, Model};
use crate::catalog::error::CatalogError;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use tracing::debug;

/// A product to be inserted. Optional fields take the column defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    "electronics".to_string()
}

fn default_active() -> bool {
    true
}

/// Case folding applied to both stored text and search needles.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive substring match of `column` against `needle`.
///
/// Title, description and category compare against their folded shadow
/// columns; any other column falls back to SQL `LOWER()`, which folds ASCII only.
pub fn icontains(column: Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", fold_case(needle));
    match column {
        Column::Title => Expr::col(Column::TitleFolded).like(pattern),
        Column::Description => Expr::col(Column::DescriptionFolded).like(pattern),
        Column::Category => Expr::col(Column::CategoryFolded).like(pattern),
        other => Expr::expr(Func::lower(Expr::col(other))).like(pattern),
    }
}

/// Data Access Object for the product catalog.
pub struct ProductDAO;

impl ProductDAO {
    /// One page of active products ordered by id, plus whether more pages exist.
    ///
    /// `page` is 1-based. One extra row is fetched to compute `has_more`.
    pub async fn list_active_page<C>(
        conn: &C,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Model>, bool), CatalogError>
    where
        C: ConnectionTrait,
    {
        let offset = page.saturating_sub(1).saturating_mul(limit);
        let mut products = ProductEntity::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(limit + 1)
            .all(conn)
            .await?;

        let has_more = products.len() as u64 > limit;
        products.truncate(limit as usize);
        debug!(page, limit, rows = products.len(), has_more, "listed active products");
        Ok((products, has_more))
    }

    /// Products matching `condition`, capped at `limit`, in storage order.
    pub async fn find_matching<C>(
        conn: &C,
        condition: Condition,
        limit: u64,
    ) -> Result<Vec<Model>, CatalogError>
    where
        C: ConnectionTrait,
    {
        Ok(ProductEntity::find()
            .filter(condition)
            .limit(limit)
            .all(conn)
            .await?)
    }

    /// Newest active products whose category contains `category`.
    pub async fn newest_in_category<C>(
        conn: &C,
        category: &str,
        limit: u64,
    ) -> Result<Vec<Model>, CatalogError>
    where
        C: ConnectionTrait,
    {
        Ok(ProductEntity::find()
            .filter(Column::IsActive.eq(true))
            .filter(icontains(Column::Category, category))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(conn)
            .await?)
    }

    pub async fn insert<C>(conn: &C, product: NewProduct) -> Result<Model, CatalogError>
    where
        C: ConnectionTrait,
    {
        let model = ActiveModel {
            id: Default::default(), // Auto-increment
            title_folded: Set(fold_case(&product.title)),
            description_folded: Set(product.description.as_deref().map(fold_case)),
            category_folded: Set(fold_case(&product.category)),
            title: Set(product.title),
            description: Set(product.description),
            price: Set(product.price),
            image_url: Set(product.image_url),
            category: Set(product.category),
            is_active: Set(product.is_active),
            created_at: Set(product.created_at.unwrap_or_else(Utc::now)),
        };
        Ok(model.insert(conn).await?)
    }
}
