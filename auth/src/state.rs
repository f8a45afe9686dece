use std::sync::Arc;

use sqlx::PgPool;

use crate::services::auth::token_issuer::AccessTokenIssuer;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<AccessTokenIssuer>,
}

impl AppState {
    pub fn new(db: PgPool, tokens: Arc<AccessTokenIssuer>) -> Self {
        Self { db, tokens }
    }
}
