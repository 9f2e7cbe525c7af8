use crate::catalog::dao::{NewProduct, ProductDAO};
use crate::catalog::error::CatalogError;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::path::Path;
use tracing::info;

/// Loads a JSON array of products into the catalog in one transaction.
///
/// Returns the number of inserted rows.
pub async fn seed_from_file(conn: &DatabaseConnection, path: &Path) -> Result<usize, CatalogError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let products: Vec<NewProduct> = serde_json::from_str(&raw)?;
    let count = products.len();

    let txn = conn.begin().await?;
    for product in products {
        ProductDAO::insert(&txn, product).await?;
    }
    txn.commit().await?;

    info!(path=%path.display(), count, "seeded catalog");
    Ok(count)
}
