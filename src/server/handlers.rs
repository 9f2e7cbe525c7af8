use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::catalog::{Product, ProductDAO};
use crate::server::error::AppError;
use crate::server::state::AppState;

pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductOut {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductOut {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            // prices carry two fractional digits
            price: (p.price * 100.0).round() / 100.0,
            image_url: p.image_url,
            category: p.category,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedProducts {
    pub data: Vec<ProductOut>,
    pub page: u64,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub version: String,
}

pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to catalog-search" }))
}

pub async fn health_handler() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn products_handler(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<PaginatedProducts>, AppError> {
    let Query(params) = params?;
    if params.page < 1 {
        return Err(AppError::BadRequest("page must be at least 1".into()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&params.limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let (products, has_more) =
        ProductDAO::list_active_page(&state.db, params.page, params.limit).await?;
    Ok(Json(PaginatedProducts {
        data: products.into_iter().map(ProductOut::from).collect(),
        page: params.page,
        has_more,
    }))
}

pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<ProductOut>>, AppError> {
    let Json(payload) = payload?;
    let span = info_span!("ai_search", request_id = %Uuid::new_v4());
    let outcome = state
        .orchestrator
        .run(&state.db, &payload.query)
        .instrument(span.clone())
        .await?;

    span.in_scope(|| {
        info!(
            route = ?outcome.route,
            keywords = ?outcome.intent.keywords,
            max_price = ?outcome.intent.max_price,
            results = outcome.results.products.len(),
            fallback = outcome.results.fallback_listing,
            "search completed"
        )
    });

    Ok(Json(
        outcome
            .results
            .products
            .into_iter()
            .map(ProductOut::from)
            .collect(),
    ))
}
