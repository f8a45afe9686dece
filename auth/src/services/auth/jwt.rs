use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::{error, warn};

use crate::config::SigningKey;
use crate::error::AppError;

#[derive(Clone)]
pub struct JwtIssuer {
    issuer: String,
    audience: String,
    ttl_seconds: u64,
    algorithm: Algorithm,
    encoding_key: EncodingKey,
}

impl JwtIssuer {
    /// - `SigningKey::Secret`: HS256
    /// - `SigningKey::Ed25519PrivatePem`: EdDSA, Ed25519 private key in PKCS#8 PEM
    pub fn new(
        key: &SigningKey,
        issuer: String,
        audience: String,
        ttl_seconds: u64,
    ) -> Result<Self, AppError> {
        let (encoding_key, algorithm) = match key {
            SigningKey::Secret(secret) => {
                if secret.is_empty() {
                    warn!("access JWT secret is empty");
                    return Err(AppError::Internal);
                }
                (EncodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            SigningKey::Ed25519PrivatePem(pem) => {
                let key = EncodingKey::from_ed_pem(pem.as_bytes()).map_err(|e| {
                    warn!(error = %e, "failed to parse access JWT private key PEM (expected Ed25519 PKCS#8 PEM)");
                    AppError::Internal
                })?;
                (key, Algorithm::EdDSA)
            }
        };

        Ok(Self {
            issuer,
            audience,
            ttl_seconds,
            algorithm,
            encoding_key,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AppError> {
        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }
}
