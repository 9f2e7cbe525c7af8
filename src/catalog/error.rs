use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("failed to read seed file: {0}")]
    SeedRead(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    SeedParse(#[from] serde_json::Error),
}
