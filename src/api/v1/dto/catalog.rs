/*
 * Responsibility
 * - Categories / products の request/response DTO
 * - price は通貨の最小単位の整数
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::product_repo::{CategoryRow, ProductFields, ProductRow};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.chars().count() > 100 {
            return Err("name must be <= 100 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRow> for CategoryResponse {
    fn from(c: CategoryRow) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

/// Body of both POST and PUT (full replacement).
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_uri: Option<String>,
    pub category_id: i64,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.chars().count() > 150 {
            return Err("name must be <= 150 chars");
        }
        if self.price < 0 {
            return Err("price must be >= 0");
        }
        if self.stock < 0 {
            return Err("stock must be >= 0");
        }
        if let Some(uri) = &self.image_uri
            && uri.len() > 2048
        {
            return Err("image_uri must be <= 2048 chars");
        }
        if self.category_id <= 0 {
            return Err("category_id must be positive");
        }
        Ok(())
    }

    pub fn fields(&self) -> ProductFields<'_> {
        ProductFields {
            name: self.name.trim(),
            description: self.description.as_deref(),
            price: self.price,
            stock: self.stock,
            image_uri: self.image_uri.as_deref(),
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_uri: Option<String>,
    pub category: CategoryResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductResponse {
    fn from(p: ProductRow) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
            image_uri: p.image_uri,
            category: CategoryResponse {
                id: p.category_id,
                name: p.category_name,
            },
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductRequest {
        ProductRequest {
            name: "  Queque de naranja ".into(),
            description: None,
            price: 4990,
            stock: 10,
            image_uri: None,
            category_id: 2,
        }
    }

    #[test]
    fn negative_price_or_stock_is_rejected() {
        let mut req = product();
        req.price = -1;
        assert_eq!(req.validate(), Err("price must be >= 0"));

        let mut req = product();
        req.stock = -5;
        assert_eq!(req.validate(), Err("stock must be >= 0"));
    }

    #[test]
    fn fields_trim_the_name() {
        let req = product();
        assert!(req.validate().is_ok());
        assert_eq!(req.fields().name, "Queque de naranja");
    }

    #[test]
    fn fractional_price_does_not_deserialize() {
        let body = r#"{"name":"x","price":10.5,"stock":1,"category_id":1}"#;
        assert!(serde_json::from_str::<ProductRequest>(body).is_err());
    }
}
