/*
 * Responsibility
 * - ログインに必要なユーザー情報 (password hash + role 名) を読む
 * - users / roles テーブルは storefront の migrations が管理する
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct CredentialRow {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub role_name: String,
}

pub async fn find_credentials_by_email(
    db: &PgPool,
    email: &str,
) -> RepoResult<Option<CredentialRow>> {
    let row = sqlx::query_as::<_, CredentialRow>(
        r#"
        SELECT u.id, u.nickname, u.email, u.password_hash, r.name AS role_name
        FROM users u
        JOIN roles r ON r.id = u.role_id
        WHERE lower(u.email) = lower($1)
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
