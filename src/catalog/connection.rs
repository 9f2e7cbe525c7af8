use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// Connects to the catalog database.
///
/// # Arguments
/// * `database_url` - SeaORM connection URL, e.g. `sqlite://catalog.sqlite?mode=rwc`.
///
/// # Returns
/// * `Result<DatabaseConnection, DbErr>` - The pooled connection or an error.
pub async fn connect_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    info!(url = %redact(database_url), "connecting to catalog database");

    let mut opt = ConnectOptions::new(database_url.to_string());
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug);

    Database::connect(opt).await
}

/// Strips credentials from a connection URL before it reaches the logs.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***{}", &url[..scheme], &url[at..])
        }
        _ => url.to_string(),
    }
}
