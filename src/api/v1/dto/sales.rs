/*
 * Responsibility
 * - Sales の request/response DTO
 * - 購入者は token の subject。request に user_id は含めない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::sale_repo::{SaleDetailRow, SaleProductRow, SaleRow};
use crate::services::checkout::{CartLine, PlacedSale};

const MAX_CART_LINES: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub address_id: i64,
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    // Empty carts and bad quantities are reported by the checkout service.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.address_id <= 0 {
            return Err("address_id must be positive");
        }
        if self.items.len() > MAX_CART_LINES {
            return Err("items must be <= 100 lines");
        }
        Ok(())
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.items
            .iter()
            .map(|i| CartLine {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct DeliveryProofRequest {
    pub proof_uri: String,
}

impl DeliveryProofRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.proof_uri.trim().is_empty() {
            return Err("proof_uri is required");
        }
        if self.proof_uri.len() > 2048 {
            return Err("proof_uri must be <= 2048 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: i64,
    pub user_id: i64,
    pub address_id: i64,
    pub total: i64,
    pub status: String,
    pub proof_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<SaleRow> for SaleResponse {
    fn from(s: SaleRow) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            address_id: s.address_id,
            total: s.total,
            status: s.status,
            proof_uri: s.proof_uri,
            created_at: s.created_at,
            delivered_at: s.delivered_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaleDetailResponse {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: i64,
}

impl From<SaleDetailRow> for SaleDetailResponse {
    fn from(d: SaleDetailRow) -> Self {
        Self {
            id: d.id,
            sale_id: d.sale_id,
            product_id: d.product_id,
            quantity: d.quantity,
            unit_price: d.unit_price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaleProductResponse {
    pub product_id: i64,
    pub name: String,
    pub image_uri: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
    pub subtotal: i64,
}

impl From<SaleProductRow> for SaleProductResponse {
    fn from(p: SaleProductRow) -> Self {
        // stored totals were computed with checked arithmetic at checkout
        let subtotal = p.unit_price.saturating_mul(i64::from(p.quantity));
        Self {
            product_id: p.product_id,
            name: p.name,
            image_uri: p.image_uri,
            quantity: p.quantity,
            unit_price: p.unit_price,
            subtotal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub sale: SaleResponse,
    pub details: Vec<SaleDetailResponse>,
}

impl From<PlacedSale> for CheckoutResponse {
    fn from(p: PlacedSale) -> Self {
        Self {
            sale: p.sale.into(),
            details: p.details.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_body_ignores_a_client_supplied_user_id() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"user_id":1,"address_id":4,"items":[{"product_id":2,"quantity":3}]}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(
            req.lines(),
            vec![CartLine {
                product_id: 2,
                quantity: 3
            }]
        );
    }

    #[test]
    fn missing_items_deserialize_as_empty_cart() {
        let req: CheckoutRequest = serde_json::from_str(r#"{"address_id":4}"#).unwrap();
        assert!(req.lines().is_empty());
    }

    #[test]
    fn blank_proof_is_rejected() {
        let req = DeliveryProofRequest {
            proof_uri: "  ".into(),
        };
        assert_eq!(req.validate(), Err("proof_uri is required"));
    }

    #[test]
    fn product_subtotal_is_price_times_quantity() {
        let res = SaleProductResponse::from(SaleProductRow {
            product_id: 1,
            name: "Torta".into(),
            image_uri: None,
            quantity: 3,
            unit_price: 1500,
        });
        assert_eq!(res.subtotal, 4500);
    }
}
