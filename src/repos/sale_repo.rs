/*
 * Responsibility
 * - sales and sale_details (sale -> line items, one-to-many)
 * - plain reads take the pool; checkout steps take a connection so the
 *   service can run them inside one transaction
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::repos::error::{RepoError, RepoResult};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_DELIVERED: &str = "DELIVERED";

#[derive(Debug, Clone, FromRow)]
pub struct SaleRow {
    pub id: i64,
    pub user_id: i64,
    pub address_id: i64,
    pub total: i64,
    pub status: String,
    pub proof_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SaleDetailRow {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: i64,
}

/// A line item joined with the product it refers to.
#[derive(Debug, Clone, FromRow)]
pub struct SaleProductRow {
    pub product_id: i64,
    pub name: String,
    pub image_uri: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
}

/// Product price/stock as seen under a row lock.
#[derive(Debug, Clone, FromRow)]
pub struct LockedProduct {
    pub id: i64,
    pub price: i64,
    pub stock: i32,
}

const SELECT_SALE: &str = r#"
    SELECT id, user_id, address_id, total, status, proof_uri, created_at, delivered_at
    FROM sales
"#;

pub async fn list(db: &PgPool) -> RepoResult<Vec<SaleRow>> {
    let rows = sqlx::query_as::<_, SaleRow>(&format!("{SELECT_SALE} ORDER BY id DESC"))
        .fetch_all(db)
        .await?;

    Ok(rows)
}

pub async fn list_by_user(db: &PgPool, user_id: i64) -> RepoResult<Vec<SaleRow>> {
    let rows = sqlx::query_as::<_, SaleRow>(&format!(
        "{SELECT_SALE} WHERE user_id = $1 ORDER BY id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_by_address(db: &PgPool, address_id: i64) -> RepoResult<Vec<SaleRow>> {
    let rows = sqlx::query_as::<_, SaleRow>(&format!(
        "{SELECT_SALE} WHERE address_id = $1 ORDER BY id DESC"
    ))
    .bind(address_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, sale_id: i64) -> RepoResult<Option<SaleRow>> {
    let row = sqlx::query_as::<_, SaleRow>(&format!("{SELECT_SALE} WHERE id = $1"))
        .bind(sale_id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn list_details(db: &PgPool) -> RepoResult<Vec<SaleDetailRow>> {
    let rows = sqlx::query_as::<_, SaleDetailRow>(
        r#"
        SELECT id, sale_id, product_id, quantity, unit_price
        FROM sale_details
        ORDER BY sale_id, id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn products_of_sale(db: &PgPool, sale_id: i64) -> RepoResult<Vec<SaleProductRow>> {
    let rows = sqlx::query_as::<_, SaleProductRow>(
        r#"
        SELECT d.product_id, p.name, p.image_uri, d.quantity, d.unit_price
        FROM sale_details d
        JOIN products p ON p.id = d.product_id
        WHERE d.sale_id = $1
        ORDER BY d.id
        "#,
    )
    .bind(sale_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn set_proof(db: &PgPool, sale_id: i64, proof_uri: &str) -> RepoResult<Option<SaleRow>> {
    let row = sqlx::query_as::<_, SaleRow>(
        r#"
        UPDATE sales
        SET proof_uri = $2,
            status = $3,
            delivered_at = now()
        WHERE id = $1
        RETURNING id, user_id, address_id, total, status, proof_uri, created_at, delivered_at
        "#,
    )
    .bind(sale_id)
    .bind(proof_uri)
    .bind(STATUS_DELIVERED)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

// --- checkout steps (run inside a transaction) ---

pub async fn lock_product(
    conn: &mut PgConnection,
    product_id: i64,
) -> RepoResult<Option<LockedProduct>> {
    let row = sqlx::query_as::<_, LockedProduct>(
        "SELECT id, price, stock FROM products WHERE id = $1 FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn decrement_stock(
    conn: &mut PgConnection,
    product_id: i64,
    quantity: i32,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - $2,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(())
}

pub async fn insert_sale(
    conn: &mut PgConnection,
    user_id: i64,
    address_id: i64,
    total: i64,
) -> RepoResult<SaleRow> {
    let row = sqlx::query_as::<_, SaleRow>(
        r#"
        INSERT INTO sales (user_id, address_id, total, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, address_id, total, status, proof_uri, created_at, delivered_at
        "#,
    )
    .bind(user_id)
    .bind(address_id)
    .bind(total)
    .bind(STATUS_PENDING)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn insert_detail(
    conn: &mut PgConnection,
    sale_id: i64,
    product_id: i64,
    quantity: i32,
    unit_price: i64,
) -> RepoResult<SaleDetailRow> {
    let row = sqlx::query_as::<_, SaleDetailRow>(
        r#"
        INSERT INTO sale_details (sale_id, product_id, quantity, unit_price)
        VALUES ($1, $2, $3, $4)
        RETURNING id, sale_id, product_id, quantity, unit_price
        "#,
    )
    .bind(sale_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}
