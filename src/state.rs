use sqlx::PgPool;
use std::sync::Arc;

use crate::services::quote_service::QuoteSource;

/// Shared handles passed to handlers and middleware through `State`
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub quotes: Arc<dyn QuoteSource>,
}

impl AppState {
    pub fn new(pool: PgPool, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { pool, quotes }
    }
}
