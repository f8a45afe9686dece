/*
 * Responsibility
 * - Turn a cart into a sale in one transaction
 *   - address must belong to the buyer
 *   - lines for the same product are merged
 *   - product rows are locked in ascending id order, stock checked then decremented
 *   - total = sum(unit_price * quantity), computed with checked arithmetic
 */
use std::collections::BTreeMap;

use sqlx::PgPool;
use thiserror::Error;

use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::repos::address_repo;
use crate::repos::sale_repo::{self, SaleDetailRow, SaleRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug)]
pub struct PlacedSale {
    pub sale: SaleRow,
    pub details: Vec<SaleDetailRow>,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("quantity must be positive")]
    InvalidQuantity,
    #[error("address does not belong to the buyer")]
    AddressNotOwned,
    #[error("unknown product {0}")]
    UnknownProduct(i64),
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: i64,
        requested: i32,
        available: i32,
    },
    #[error("order total out of range")]
    Overflow,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        CheckoutError::Repo(RepoError::Db(e))
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart => AppError::bad_request("EMPTY_CART", e.to_string()),
            CheckoutError::InvalidQuantity | CheckoutError::Overflow => {
                AppError::bad_request("INVALID_QUANTITY", e.to_string())
            }
            CheckoutError::AddressNotOwned => {
                AppError::bad_request("INVALID_ADDRESS", e.to_string())
            }
            CheckoutError::UnknownProduct(_) => {
                AppError::bad_request("UNKNOWN_PRODUCT", e.to_string())
            }
            CheckoutError::InsufficientStock { .. } => {
                AppError::conflict("INSUFFICIENT_STOCK", e.to_string())
            }
            CheckoutError::Repo(err) => err.into(),
        }
    }
}

/// Merge lines per product. The map is ordered by product id, which is the
/// order rows get locked in.
pub fn merge_lines(lines: &[CartLine]) -> Result<BTreeMap<i64, i32>, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut merged = BTreeMap::new();
    for line in lines {
        if line.quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity);
        }
        let qty = merged.entry(line.product_id).or_insert(0i32);
        *qty = qty.checked_add(line.quantity).ok_or(CheckoutError::Overflow)?;
    }

    Ok(merged)
}

fn line_total(unit_price: i64, quantity: i32) -> Result<i64, CheckoutError> {
    unit_price
        .checked_mul(i64::from(quantity))
        .ok_or(CheckoutError::Overflow)
}

pub async fn place_order(
    db: &PgPool,
    user_id: i64,
    address_id: i64,
    lines: &[CartLine],
) -> Result<PlacedSale, CheckoutError> {
    let merged = merge_lines(lines)?;

    let address = address_repo::get(db, address_id).await?;
    if address.map(|a| a.user_id) != Some(user_id) {
        return Err(CheckoutError::AddressNotOwned);
    }

    let mut tx = db.begin().await?;

    let mut priced = Vec::with_capacity(merged.len());
    let mut total: i64 = 0;
    for (&product_id, &quantity) in &merged {
        let product = sale_repo::lock_product(&mut *tx, product_id)
            .await?
            .ok_or(CheckoutError::UnknownProduct(product_id))?;

        if product.stock < quantity {
            return Err(CheckoutError::InsufficientStock {
                product_id,
                requested: quantity,
                available: product.stock,
            });
        }

        total = total
            .checked_add(line_total(product.price, quantity)?)
            .ok_or(CheckoutError::Overflow)?;
        priced.push((product_id, quantity, product.price));
    }

    let sale = sale_repo::insert_sale(&mut *tx, user_id, address_id, total).await?;

    let mut details = Vec::with_capacity(priced.len());
    for (product_id, quantity, unit_price) in priced {
        sale_repo::decrement_stock(&mut *tx, product_id, quantity).await?;
        let detail =
            sale_repo::insert_detail(&mut *tx, sale.id, product_id, quantity, unit_price).await?;
        details.push(detail);
    }

    tx.commit().await?;

    tracing::info!(sale_id = sale.id, user_id, total, lines = details.len(), "sale placed");

    Ok(PlacedSale { sale, details })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn line(product_id: i64, quantity: i32) -> CartLine {
        CartLine {
            product_id,
            quantity,
        }
    }

    #[test]
    fn duplicate_products_are_merged_in_id_order() {
        let merged = merge_lines(&[line(9, 1), line(2, 3), line(9, 4)]).unwrap();
        let pairs: Vec<_> = merged.into_iter().collect();
        assert_eq!(pairs, vec![(2, 3), (9, 5)]);
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert!(matches!(merge_lines(&[]), Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert!(matches!(
            merge_lines(&[line(1, 2), line(2, 0)]),
            Err(CheckoutError::InvalidQuantity)
        ));
        assert!(matches!(
            merge_lines(&[line(1, -1)]),
            Err(CheckoutError::InvalidQuantity)
        ));
    }

    #[test]
    fn merged_quantity_overflow_is_reported() {
        assert!(matches!(
            merge_lines(&[line(1, i32::MAX), line(1, 1)]),
            Err(CheckoutError::Overflow)
        ));
    }

    #[test]
    fn line_total_is_checked() {
        assert_eq!(line_total(1990, 3).unwrap(), 5970);
        assert!(matches!(line_total(i64::MAX, 2), Err(CheckoutError::Overflow)));
    }

    #[test]
    fn errors_map_to_http_statuses() {
        let stock: AppError = CheckoutError::InsufficientStock {
            product_id: 1,
            requested: 5,
            available: 2,
        }
        .into();
        assert_eq!(stock.status(), StatusCode::CONFLICT);

        let foreign: AppError = CheckoutError::AddressNotOwned.into();
        assert_eq!(foreign.status(), StatusCode::BAD_REQUEST);

        let unknown: AppError = CheckoutError::UnknownProduct(42).into();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    }
}
