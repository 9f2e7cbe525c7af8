use sea_orm::DatabaseConnection;

use crate::search::SearchOrchestrator;

/// Shared per-process handles. Cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub orchestrator: SearchOrchestrator,
}

impl AppState {
    pub fn new(db: DatabaseConnection, orchestrator: SearchOrchestrator) -> Self {
        Self { db, orchestrator }
    }
}
