use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait};
use tracing::debug;

use crate::catalog::entities::product::Column;
use crate::catalog::{CatalogError, ProductDAO, icontains};
use crate::search::category::resolve_category;
use crate::search::intent::tokenize;
use crate::search::types::{IntentData, SearchResults};

pub const PRIMARY_LIMIT: u64 = 8;
pub const FALLBACK_LIMIT: u64 = 6;
pub const FALLBACK_CATEGORY: &str = "electronics";

/// Filter for the primary query.
///
/// `is_active AND (any keyword in title/description OR mapped category) AND price <= max_price`,
/// where the OR-group and the price bound are each omitted when empty.
pub fn build_condition(intent: &IntentData) -> Condition {
    let mapped_category = resolve_category(&intent.keywords);

    let mut matches: Vec<SimpleExpr> = Vec::with_capacity(intent.keywords.len() * 2 + 1);
    for keyword in &intent.keywords {
        matches.push(icontains(Column::Title, keyword));
        matches.push(icontains(Column::Description, keyword));
    }
    if let Some(category) = mapped_category {
        matches.push(icontains(Column::Category, category));
    }

    let mut condition = Condition::all().add(Column::IsActive.eq(true));
    if !matches.is_empty() {
        condition = condition.add(
            matches
                .into_iter()
                .fold(Condition::any(), |any, expr| any.add(expr)),
        );
    }
    if let Some(max_price) = intent.max_price.filter(|p| *p != 0.0) {
        condition = condition.add(Column::Price.lte(max_price));
    }
    condition
}

/// Search with an already extracted intent, serving the default listing when nothing matches.
pub async fn search_products<C>(conn: &C, intent: &IntentData) -> Result<SearchResults, CatalogError>
where
    C: ConnectionTrait,
{
    let products = ProductDAO::find_matching(conn, build_condition(intent), PRIMARY_LIMIT).await?;
    if !products.is_empty() {
        return Ok(SearchResults {
            products,
            fallback_listing: false,
        });
    }

    debug!(?intent, "primary search empty, serving fallback listing");
    let products =
        ProductDAO::newest_in_category(conn, FALLBACK_CATEGORY, FALLBACK_LIMIT).await?;
    Ok(SearchResults {
        products,
        fallback_listing: true,
    })
}

/// Same composition over the raw query's own tokens, without any oracle.
pub async fn fallback_search<C>(conn: &C, raw_query: &str) -> Result<SearchResults, CatalogError>
where
    C: ConnectionTrait,
{
    search_products(conn, &IntentData::from_keywords(tokenize(raw_query))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::dao::NewProduct;
    use crate::catalog::test_support::{new_product, setup_test_db};
    use chrono::{TimeZone, Utc};
    use sea_orm::DatabaseConnection;

    fn intent(keywords: &[&str], max_price: Option<f64>) -> IntentData {
        IntentData {
            category: None,
            max_price,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    async fn insert(db: &DatabaseConnection, p: NewProduct) {
        ProductDAO::insert(db, p).await.unwrap();
    }

    /// Ten electronics items, one per day of January, plus a few others.
    async fn seed_catalog(db: &DatabaseConnection) {
        for day in 1..=10 {
            let mut p = new_product(&format!("Gadget {day}"), 50.0 * day as f64, "electronics");
            p.created_at = Some(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap());
            insert(db, p).await;
        }
        let mut kettle = new_product("Steel Kettle", 25.0, "kitchen");
        kettle.description = Some("Boils water fast".into());
        insert(db, kettle).await;
        let mut retired = new_product("Retired Laptop", 10.0, "electronics");
        retired.is_active = false;
        insert(db, retired).await;
    }

    #[tokio::test]
    async fn keyword_matches_title_and_description_case_insensitively() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        let by_title = search_products(&db, &intent(&["kettle"], None)).await.unwrap();
        assert!(!by_title.fallback_listing);
        assert_eq!(by_title.products.len(), 1);

        let by_description = search_products(&db, &intent(&["WATER"], None)).await.unwrap();
        assert!(!by_description.fallback_listing);
        assert_eq!(by_description.products[0].title, "Steel Kettle");
    }

    #[tokio::test]
    async fn mapped_category_widens_the_match() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        // no title contains "laptop" among active rows, but laptop maps to electronics
        let results = search_products(&db, &intent(&["laptop"], None)).await.unwrap();
        assert!(!results.fallback_listing);
        assert_eq!(results.products.len(), PRIMARY_LIMIT as usize);
        assert!(results.products.iter().all(|p| p.category == "electronics"));
        assert!(results.products.iter().all(|p| p.is_active));
    }

    #[tokio::test]
    async fn empty_intent_matches_all_active_up_to_cap() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        let results = search_products(&db, &IntentData::default()).await.unwrap();
        assert!(!results.fallback_listing);
        assert_eq!(results.products.len(), PRIMARY_LIMIT as usize);
        assert!(results.products.iter().all(|p| p.is_active));
    }

    #[tokio::test]
    async fn price_ceiling_is_respected_in_primary_branch() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        let results = search_products(&db, &intent(&[], Some(100.0))).await.unwrap();
        assert!(!results.fallback_listing);
        assert!(!results.products.is_empty());
        assert!(results.products.iter().all(|p| p.price <= 100.0));
    }

    #[tokio::test]
    async fn unmatched_query_serves_newest_electronics() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        let results = search_products(&db, &intent(&["xyzzyunmatched"], None))
            .await
            .unwrap();
        assert!(results.fallback_listing);
        assert_eq!(results.products.len(), FALLBACK_LIMIT as usize);
        let titles: Vec<_> = results.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Gadget 10", "Gadget 9", "Gadget 8", "Gadget 7", "Gadget 6", "Gadget 5"]
        );
    }

    #[tokio::test]
    async fn accented_keyword_matches_accented_title() {
        let (_tmp, db) = setup_test_db().await;
        insert(&db, new_product("ÉCRAN Géant", 300.0, "home")).await;
        insert(&db, new_product("Old Radio", 40.0, "electronics")).await;

        let results = search_products(&db, &intent(&["écran"], None)).await.unwrap();
        assert!(!results.fallback_listing);
        let titles: Vec<_> = results.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["ÉCRAN Géant"]);
    }

    #[tokio::test]
    async fn overly_strict_price_also_triggers_fallback() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        let results = search_products(&db, &intent(&["gadget"], Some(1.0))).await.unwrap();
        assert!(results.fallback_listing);
        assert!(results.products.len() <= FALLBACK_LIMIT as usize);
    }

    #[tokio::test]
    async fn fallback_listing_on_empty_catalog_is_empty() {
        let (_tmp, db) = setup_test_db().await;

        let results = search_products(&db, &intent(&["anything"], None)).await.unwrap();
        assert!(results.fallback_listing);
        assert!(results.products.is_empty());
    }

    #[tokio::test]
    async fn search_is_idempotent() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        let query = intent(&["gadget"], Some(300.0));
        let first = search_products(&db, &query).await.unwrap();
        let second = search_products(&db, &query).await.unwrap();
        assert_eq!(first.products, second.products);
        assert_eq!(first.fallback_listing, second.fallback_listing);
    }

    #[tokio::test]
    async fn punctuation_only_raw_query_lists_active_products() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        let results = fallback_search(&db, "###").await.unwrap();
        assert!(!results.fallback_listing);
        assert_eq!(results.products.len(), PRIMARY_LIMIT as usize);
        assert!(results.products.iter().all(|p| p.is_active));
    }

    #[tokio::test]
    async fn fallback_search_tokenizes_raw_query() {
        let (_tmp, db) = setup_test_db().await;
        seed_catalog(&db).await;

        let results = fallback_search(&db, "  STEEL  ").await.unwrap();
        assert!(!results.fallback_listing);
        assert_eq!(results.products.len(), 1);
        assert_eq!(results.products[0].title, "Steel Kettle");
    }
}
