use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::catalog::ProductDAO;
use crate::catalog::test_support::{new_product, setup_test_db};
use crate::search::SearchOrchestrator;
use crate::search::intent::NaiveTokenizer;
use crate::server::handlers::{HealthCheck, PaginatedProducts, ProductOut};
use crate::server::{AppState, router};

async fn test_state() -> (TempDir, AppState) {
    let (tmp, db) = setup_test_db().await;
    let mut phone = new_product("Budget Phone", 199.999, "electronics");
    phone.description = Some("Dual SIM".into());
    phone.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    ProductDAO::insert(&db, phone).await.unwrap();
    let mut tv = new_product("OLED Screen", 1299.0, "electronics");
    tv.created_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    ProductDAO::insert(&db, tv).await.unwrap();
    ProductDAO::insert(&db, new_product("Mug", 8.0, "kitchen"))
        .await
        .unwrap();

    let orchestrator = SearchOrchestrator::new(Arc::new(NaiveTokenizer));
    (tmp, AppState::new(db, orchestrator))
}

async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn search_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ai/search")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (_tmp, state) = test_state().await;
    let resp = router(state)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthCheck = body_json(resp).await;
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn search_returns_matching_products() {
    let (_tmp, state) = test_state().await;
    let resp = router(state)
        .oneshot(search_request(r#"{"query": "dual sim"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<ProductOut> = body_json(resp).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Budget Phone");
    assert_eq!(products[0].price, 200.0);
    assert!(products[0].is_active);
}

#[tokio::test]
async fn unmatched_search_serves_newest_electronics() {
    let (_tmp, state) = test_state().await;
    let resp = router(state)
        .oneshot(search_request(r#"{"query": "xyzzyunmatched"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<ProductOut> = body_json(resp).await;
    let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["OLED Screen", "Budget Phone"]);
}

#[tokio::test]
async fn search_without_query_field_is_rejected() {
    let (_tmp, state) = test_state().await;
    let resp = router(state)
        .oneshot(search_request(r#"{"q": "phone"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn malformed_search_body_gets_json_detail() {
    let (_tmp, state) = test_state().await;
    let resp = router(state)
        .oneshot(search_request("{ not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn unparseable_paging_gets_json_detail() {
    let (_tmp, state) = test_state().await;
    let resp = router(state)
        .oneshot(Request::get("/products?page=abc").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("query string"));
}

#[tokio::test]
async fn products_are_paginated() {
    let (_tmp, state) = test_state().await;
    let app = router(state);

    let resp = app
        .clone()
        .oneshot(
            Request::get("/products?page=1&limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: PaginatedProducts = body_json(resp).await;
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.page, 1);
    assert!(page.has_more);

    let resp = app
        .oneshot(
            Request::get("/products?page=2&limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let page: PaginatedProducts = body_json(resp).await;
    assert_eq!(page.data.len(), 1);
    assert!(!page.has_more);
}

#[tokio::test]
async fn out_of_range_paging_is_a_bad_request() {
    let (_tmp, state) = test_state().await;
    let app = router(state);

    for uri in ["/products?page=0", "/products?limit=0", "/products?limit=101"] {
        let resp = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: serde_json::Value = body_json(resp).await;
        assert!(body["detail"].is_string(), "{uri}");
    }
}
