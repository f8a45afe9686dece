/*
 * Responsibility
 * - Regions / communes / addresses の request/response DTO
 * - address の user_id は token から取るので request には含めない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::{
    address_repo::AddressRow,
    region_repo::{CommuneRow, RegionRow},
};

#[derive(Debug, Deserialize)]
pub struct CreateRegionRequest {
    pub name: String,
}

impl CreateRegionRequest {
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
pub struct RegionResponse {
    pub id: i64,
    pub name: String,
}

impl From<RegionRow> for RegionResponse {
    fn from(r: RegionRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCommuneRequest {
    pub name: String,
    pub region_id: i64,
}

impl CreateCommuneRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.region_id <= 0 {
            return Err("region_id must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CommuneResponse {
    pub id: i64,
    pub name: String,
    pub region: RegionResponse,
}

impl From<CommuneRow> for CommuneResponse {
    fn from(c: CommuneRow) -> Self {
        Self {
            id: c.id,
            name: c.name,
            region: RegionResponse {
                id: c.region_id,
                name: c.region_name,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAddressRequest {
    pub street: String,
    pub postal_code: Option<String>,
    pub commune_id: i64,
}

impl CreateAddressRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.street.trim().is_empty() {
            return Err("street is required");
        }
        if self.street.chars().count() > 200 {
            return Err("street must be <= 200 chars");
        }
        if let Some(code) = &self.postal_code
            && (code.trim().is_empty() || code.len() > 20)
        {
            return Err("postal_code must be 1..=20 chars");
        }
        if self.commune_id <= 0 {
            return Err("commune_id must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub id: i64,
    pub street: String,
    pub postal_code: Option<String>,
    pub user_id: i64,
    pub commune: CommuneResponse,
    pub created_at: DateTime<Utc>,
}

impl From<AddressRow> for AddressResponse {
    fn from(a: AddressRow) -> Self {
        Self {
            id: a.id,
            street: a.street,
            postal_code: a.postal_code,
            user_id: a.user_id,
            commune: CommuneResponse {
                id: a.commune_id,
                name: a.commune_name,
                region: RegionResponse {
                    id: a.region_id,
                    name: a.region_name,
                },
            },
            created_at: a.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_body_has_no_user_id() {
        let req: CreateAddressRequest = serde_json::from_str(
            r#"{"street":"Av. Siempre Viva 742","commune_id":3,"user_id":99}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.commune_id, 3);
    }

    #[test]
    fn blank_postal_code_is_rejected_but_absent_is_fine() {
        let mut req = CreateAddressRequest {
            street: "Calle 1".into(),
            postal_code: Some(" ".into()),
            commune_id: 1,
        };
        assert!(req.validate().is_err());
        req.postal_code = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn commune_needs_a_region() {
        let req = CreateCommuneRequest {
            name: "Providencia".into(),
            region_id: 0,
        };
        assert_eq!(req.validate(), Err("region_id must be positive"));
    }
}
