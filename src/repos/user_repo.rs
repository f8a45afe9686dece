/*
 * Responsibility
 * - SQLx access for the users table (joined with roles for the role name)
 * - Takes a PgPool and provides CRUD plus lookups by email/nickname
 * - Unique violations come back as RepoError::Conflict
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role_id: i64,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
}

const SELECT_USER: &str = r#"
    SELECT u.id, u.nickname, u.email, u.full_name, u.role_id,
           r.name AS role_name, u.created_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

pub async fn list(db: &PgPool) -> RepoResult<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY u.id"))
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: i64) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = $1"))
        .bind(user_id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn find_by_email(db: &PgPool, email: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "{SELECT_USER} WHERE lower(u.email) = lower($1)"
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn find_by_nickname(db: &PgPool, nickname: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.nickname = $1"))
        .bind(nickname)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    nickname: &str,
    email: &str,
    password_hash: &str,
    full_name: Option<&str>,
    role_id: i64,
) -> RepoResult<UserRow> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (nickname, email, password_hash, full_name, role_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(nickname)
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    get(db, id).await?.ok_or(RepoError::Db(sqlx::Error::RowNotFound))
}

pub async fn update(
    db: &PgPool,
    user_id: i64,
    nickname: Option<&str>,
    email: Option<&str>,
    full_name: Option<Option<&str>>,
    role_id: Option<i64>,
) -> RepoResult<Option<UserRow>> {
    // full_name: Some(Some(v)) -> set to v
    // full_name: Some(None)    -> set to NULL
    // full_name: None          -> do not update
    let updated = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE users
        SET
            nickname = COALESCE($2, nickname),
            email = COALESCE($3, email),
            full_name = CASE
                WHEN $4 = false THEN full_name
                ELSE $5
            END,
            role_id = COALESCE($6, role_id)
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(nickname)
    .bind(email)
    .bind(full_name.is_some())
    .bind(full_name.flatten())
    .bind(role_id)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    match updated {
        Some(id) => get(db, id).await,
        None => Ok(None),
    }
}

pub async fn update_password_by_email(
    db: &PgPool,
    email: &str,
    password_hash: &str,
) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $2
        WHERE lower(email) = lower($1)
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, user_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
