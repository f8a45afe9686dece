/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, gate: AuthorizationGate, policy: 操作ごとの許可ロール
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AccessPolicy;
use crate::services::auth::AuthorizationGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub gate: Arc<AuthorizationGate>,
    pub policy: Arc<AccessPolicy>,
    /// Role assigned to self-registered users.
    pub default_signup_role: String,
}

impl AppState {
    pub fn new(
        db: PgPool,
        gate: Arc<AuthorizationGate>,
        policy: AccessPolicy,
        default_signup_role: String,
    ) -> Self {
        Self {
            db,
            gate,
            policy: Arc::new(policy),
            default_signup_role,
        }
    }
}
