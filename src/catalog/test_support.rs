//! Shared fixtures for tests that need a migrated catalog database.
use crate::catalog::dao::NewProduct;
use sea_orm::{Database, DatabaseConnection};
use tempfile::TempDir;

pub async fn setup_test_db() -> (TempDir, DatabaseConnection) {
    let tmp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = tmp_dir.path().join("test.db");
    // Add `mode=rwc` query parameter to ensure the file is created
    let db_url = format!("sqlite://{}?mode=rwc", db_path.to_string_lossy());
    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");
    crate::catalog::migration::run_migrations(&db)
        .await
        .expect("Failed to run migrations");
    (tmp_dir, db)
}

pub fn new_product(title: &str, price: f64, category: &str) -> NewProduct {
    NewProduct {
        title: title.to_string(),
        description: None,
        price,
        image_url: None,
        category: category.to_string(),
        is_active: true,
        created_at: None,
    }
}
