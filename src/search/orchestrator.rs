use sea_orm::ConnectionTrait;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::CatalogError;
use crate::search::composer::{fallback_search, search_products};
use crate::search::intent::IntentSource;
use crate::search::types::{IntentData, SearchOutcome, SearchRoute};

/// Per-request entry point: extracts intent, then picks a composer path.
#[derive(Clone)]
pub struct SearchOrchestrator {
    intent_source: Arc<dyn IntentSource>,
}

impl SearchOrchestrator {
    pub fn new(intent_source: Arc<dyn IntentSource>) -> Self {
        Self { intent_source }
    }

    pub fn route_for(intent: &IntentData) -> SearchRoute {
        if intent.category.is_some() || intent.max_price.is_some() {
            SearchRoute::Targeted
        } else if intent.is_empty() {
            SearchRoute::RawQueryFallback
        } else {
            SearchRoute::KeywordOnly
        }
    }

    pub async fn run<C>(&self, conn: &C, raw_query: &str) -> Result<SearchOutcome, CatalogError>
    where
        C: ConnectionTrait,
    {
        let intent = self.intent_source.extract_intent(raw_query).await;
        let route = Self::route_for(&intent);

        // Targeted and KeywordOnly share a path; RawQueryFallback ignores the extracted intent.
        let results = match route {
            SearchRoute::Targeted | SearchRoute::KeywordOnly => {
                search_products(conn, &intent).await?
            }
            SearchRoute::RawQueryFallback => fallback_search(conn, raw_query).await?,
        };

        debug!(source = self.intent_source.name(), route = ?route, "search dispatched");

        Ok(SearchOutcome {
            route,
            intent,
            results,
        })
    }
}
