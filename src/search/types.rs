use crate::catalog::Product;

/// Structured guess derived from a free-text query. Built once per request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentData {
    pub category: Option<String>,
    /// Price ceiling; only ever a finite positive number.
    pub max_price: Option<f64>,
    pub keywords: Vec<String>,
}

impl IntentData {
    pub fn from_keywords(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            ..Self::default()
        }
    }

    /// No keywords, no category and no price ceiling.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.category.is_none() && self.max_price.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SearchResults {
    pub products: Vec<Product>,
    /// Set when the primary query matched nothing and the default listing was served.
    pub fallback_listing: bool,
}

/// Which path the orchestrator took for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRoute {
    /// Intent carried a category or a price ceiling.
    Targeted,
    /// Intent carried keywords only.
    KeywordOnly,
    /// Intent was empty; the raw query was re-tokenized.
    RawQueryFallback,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub route: SearchRoute,
    pub intent: IntentData,
    pub results: SearchResults,
}
