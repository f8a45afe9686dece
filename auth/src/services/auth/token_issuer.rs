use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::jwt::JwtIssuer;

/// Claims read by the resource server's authorization gate.
#[derive(Debug, Serialize)]
struct AccessTokenClaims<'a> {
    iss: &'a str,
    aud: &'a str,
    /// Decimal user id.
    sub: String,
    role: &'a str,
    iat: u64,
    exp: u64,
    jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Clone)]
pub struct AccessTokenIssuer {
    jwt: JwtIssuer,
}

impl AccessTokenIssuer {
    pub fn new(jwt: JwtIssuer) -> Self {
        Self { jwt }
    }

    pub fn issue(&self, user_id: i64, role: &str) -> Result<IssuedAccessToken, AppError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(AppError::InvalidRequest("role must not be blank".to_string()));
        }

        let now = jsonwebtoken::get_current_timestamp();
        let claims = AccessTokenClaims {
            iss: self.jwt.issuer(),
            aud: self.jwt.audience(),
            sub: user_id.to_string(),
            role,
            iat: now,
            exp: now + self.jwt.ttl_seconds(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(IssuedAccessToken {
            access_token: self.jwt.sign(&claims)?,
            expires_in: self.jwt.ttl_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SigningKey;
    use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
    use serde_json::Value;

    fn issuer(ttl: u64) -> AccessTokenIssuer {
        let jwt = JwtIssuer::new(
            &SigningKey::Secret("unit-secret".into()),
            "https://auth.test".into(),
            "storefront".into(),
            ttl,
        )
        .unwrap();
        AccessTokenIssuer::new(jwt)
    }

    #[test]
    fn issued_token_carries_subject_role_and_expiry() {
        let issued = issuer(600).issue(42, "CLIENTE").unwrap();
        assert_eq!(issued.expires_in, 600);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["https://auth.test"]);
        validation.set_audience(&["storefront"]);
        let data = decode::<Value>(
            &issued.access_token,
            &DecodingKey::from_secret(b"unit-secret"),
            &validation,
        )
        .unwrap();

        let claims = data.claims;
        assert_eq!(claims["sub"], "42");
        assert_eq!(claims["role"], "CLIENTE");
        assert_eq!(
            claims["exp"].as_u64().unwrap() - claims["iat"].as_u64().unwrap(),
            600
        );
        assert!(claims["jti"].as_str().is_some());
        assert_eq!(data.header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let issuer = issuer(60);
        let a = issuer.issue(1, "CLIENTE").unwrap().access_token;
        let b = issuer.issue(1, "CLIENTE").unwrap().access_token;
        assert_ne!(a, b);
    }

    #[test]
    fn blank_role_is_not_issued() {
        assert!(matches!(
            issuer(60).issue(1, "  "),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
