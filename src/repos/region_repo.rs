/*
 * Responsibility
 * - regions and communes (the address service's reference data)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct RegionRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommuneRow {
    pub id: i64,
    pub name: String,
    pub region_id: i64,
    pub region_name: String,
}

const SELECT_COMMUNE: &str = r#"
    SELECT c.id, c.name, c.region_id, r.name AS region_name
    FROM communes c
    JOIN regions r ON r.id = c.region_id
"#;

pub async fn list_regions(db: &PgPool) -> RepoResult<Vec<RegionRow>> {
    let rows = sqlx::query_as::<_, RegionRow>("SELECT id, name FROM regions ORDER BY id")
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn region_exists(db: &PgPool, region_id: i64) -> RepoResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM regions WHERE id = $1)")
        .bind(region_id)
        .fetch_one(db)
        .await?;

    Ok(exists)
}

pub async fn create_region(db: &PgPool, name: &str) -> RepoResult<RegionRow> {
    let row = sqlx::query_as::<_, RegionRow>(
        r#"
        INSERT INTO regions (name)
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

pub async fn list_communes(db: &PgPool) -> RepoResult<Vec<CommuneRow>> {
    let rows = sqlx::query_as::<_, CommuneRow>(&format!("{SELECT_COMMUNE} ORDER BY c.id"))
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn list_communes_by_region(db: &PgPool, region_id: i64) -> RepoResult<Vec<CommuneRow>> {
    let rows = sqlx::query_as::<_, CommuneRow>(&format!(
        "{SELECT_COMMUNE} WHERE c.region_id = $1 ORDER BY c.name"
    ))
    .bind(region_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get_commune(db: &PgPool, commune_id: i64) -> RepoResult<Option<CommuneRow>> {
    let row = sqlx::query_as::<_, CommuneRow>(&format!("{SELECT_COMMUNE} WHERE c.id = $1"))
        .bind(commune_id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn create_commune(db: &PgPool, name: &str, region_id: i64) -> RepoResult<CommuneRow> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO communes (name, region_id)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(region_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    get_commune(db, id)
        .await?
        .ok_or(RepoError::Db(sqlx::Error::RowNotFound))
}
