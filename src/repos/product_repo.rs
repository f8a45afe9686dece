/*
 * Responsibility
 * - categories and products CRUD (product -> category, many-to-one)
 * - deleting a product that appears in a sale surfaces as RepoError::ForeignKey
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_uri: Option<String>,
    pub category_id: i64,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable product fields; create and full update take the same shape.
#[derive(Debug, Clone, Copy)]
pub struct ProductFields<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: i64,
    pub stock: i32,
    pub image_uri: Option<&'a str>,
    pub category_id: i64,
}

const SELECT_PRODUCT: &str = r#"
    SELECT p.id, p.name, p.description, p.price, p.stock, p.image_uri,
           p.category_id, c.name AS category_name, p.created_at, p.updated_at
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

pub async fn list_categories(db: &PgPool) -> RepoResult<Vec<CategoryRow>> {
    let rows = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn category_exists(db: &PgPool, category_id: i64) -> RepoResult<bool> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(category_id)
            .fetch_one(db)
            .await?;

    Ok(exists)
}

pub async fn create_category(db: &PgPool, name: &str) -> RepoResult<CategoryRow> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        INSERT INTO categories (name)
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

pub async fn list(db: &PgPool) -> RepoResult<Vec<ProductRow>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} ORDER BY p.id"))
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, product_id: i64) -> RepoResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE p.id = $1"))
        .bind(product_id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn create(db: &PgPool, fields: ProductFields<'_>) -> RepoResult<ProductRow> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO products (name, description, price, stock, image_uri, category_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(fields.name)
    .bind(fields.description)
    .bind(fields.price)
    .bind(fields.stock)
    .bind(fields.image_uri)
    .bind(fields.category_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    get(db, id).await?.ok_or(RepoError::Db(sqlx::Error::RowNotFound))
}

pub async fn update(
    db: &PgPool,
    product_id: i64,
    fields: ProductFields<'_>,
) -> RepoResult<Option<ProductRow>> {
    let updated = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE products
        SET
            name = $2,
            description = $3,
            price = $4,
            stock = $5,
            image_uri = $6,
            category_id = $7,
            updated_at = now()
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(product_id)
    .bind(fields.name)
    .bind(fields.description)
    .bind(fields.price)
    .bind(fields.stock)
    .bind(fields.image_uri)
    .bind(fields.category_id)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    match updated {
        Some(id) => get(db, id).await,
        None => Ok(None),
    }
}

pub async fn delete(db: &PgPool, product_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM products
        WHERE id = $1
        "#,
    )
    .bind(product_id)
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(result.rows_affected() > 0)
}
