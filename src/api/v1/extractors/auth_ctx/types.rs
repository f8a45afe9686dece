/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が gate で検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証は services::auth::gate の責務
 * - 所有者チェック (BOLA) は api::v1::policy で別途行う
 */

use crate::services::auth::Principal;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は token の `sub` (内部ユーザーID)
/// - `role` は token の `role` claim (表記は token のまま)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub role: String,
}

impl AuthCtx {
    pub fn new(user_id: i64, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }
}

impl From<Principal> for AuthCtx {
    fn from(p: Principal) -> Self {
        Self::new(p.subject_id, p.role)
    }
}
