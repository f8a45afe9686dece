/*
 * Responsibility
 * - roles table: list/get/create, lookup by name
 * - ensure(): upsert a role name that configuration depends on (signup role)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: i64,
    pub name: String,
}

pub async fn list(db: &PgPool) -> RepoResult<Vec<RoleRow>> {
    let rows = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles ORDER BY id")
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, role_id: i64) -> RepoResult<Option<RoleRow>> {
    let row = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE id = $1")
        .bind(role_id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

/// Case-insensitive lookup, consistent with how the gate compares roles.
pub async fn find_by_name(db: &PgPool, name: &str) -> RepoResult<Option<RoleRow>> {
    let row = sqlx::query_as::<_, RoleRow>(
        "SELECT id, name FROM roles WHERE lower(name) = lower($1) ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(db: &PgPool, name: &str) -> RepoResult<RoleRow> {
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        INSERT INTO roles (name)
        VALUES ($1)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn ensure(db: &PgPool, name: &str) -> RepoResult<RoleRow> {
    if let Some(row) = find_by_name(db, name).await? {
        return Ok(row);
    }

    match create(db, name).await {
        Ok(row) => Ok(row),
        // Lost a race with another instance; the row exists now.
        Err(RepoError::Conflict) => find_by_name(db, name)
            .await?
            .ok_or(RepoError::Db(sqlx::Error::RowNotFound)),
        Err(e) => Err(e),
    }
}
