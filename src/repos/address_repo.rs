/*
 * Responsibility
 * - addresses CRUD (user -> addresses, one-to-many)
 * - rows carry the commune/region names for display
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct AddressRow {
    pub id: i64,
    pub street: String,
    pub postal_code: Option<String>,
    pub user_id: i64,
    pub commune_id: i64,
    pub commune_name: String,
    pub region_id: i64,
    pub region_name: String,
    pub created_at: DateTime<Utc>,
}

const SELECT_ADDRESS: &str = r#"
    SELECT a.id, a.street, a.postal_code, a.user_id, a.commune_id,
           c.name AS commune_name, c.region_id, r.name AS region_name, a.created_at
    FROM addresses a
    JOIN communes c ON c.id = a.commune_id
    JOIN regions r ON r.id = c.region_id
"#;

pub async fn list(db: &PgPool) -> RepoResult<Vec<AddressRow>> {
    let rows = sqlx::query_as::<_, AddressRow>(&format!("{SELECT_ADDRESS} ORDER BY a.id"))
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn list_by_user(db: &PgPool, user_id: i64) -> RepoResult<Vec<AddressRow>> {
    let rows = sqlx::query_as::<_, AddressRow>(&format!(
        "{SELECT_ADDRESS} WHERE a.user_id = $1 ORDER BY a.id"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, address_id: i64) -> RepoResult<Option<AddressRow>> {
    let row = sqlx::query_as::<_, AddressRow>(&format!("{SELECT_ADDRESS} WHERE a.id = $1"))
        .bind(address_id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    street: &str,
    postal_code: Option<&str>,
    user_id: i64,
    commune_id: i64,
) -> RepoResult<AddressRow> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO addresses (street, postal_code, user_id, commune_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(street)
    .bind(postal_code)
    .bind(user_id)
    .bind(commune_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    get(db, id).await?.ok_or(RepoError::Db(sqlx::Error::RowNotFound))
}
