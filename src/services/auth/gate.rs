//! Bearer-token authorization gate.
//!
//! `AuthorizationGate::authorize` takes the raw `Authorization` header and the
//! roles allowed for one operation, and either admits the request with the
//! token's subject id and role or returns one of three rejection kinds.
//! The gate holds only immutable verification material; it does no I/O and
//! no logging, so callers decide how to report a rejection.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::services::auth::roles::RoleSet;

const BEARER_PREFIX: &str = "Bearer ";

/// Key material used to verify access-token signatures.
///
/// - `Secret`: shared HMAC secret (HS256)
/// - `Ed25519PublicPem`: SPKI PEM public key of the issuer (EdDSA)
#[derive(Clone)]
pub enum VerificationKey {
    Secret(String),
    Ed25519PublicPem(String),
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Secret(_) => f.write_str("VerificationKey::Secret(..)"),
            Self::Ed25519PublicPem(_) => f.write_str("VerificationKey::Ed25519PublicPem(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub key: VerificationKey,
    pub issuer: String,
    pub audience: String,
    pub leeway_seconds: u64,
}

#[derive(Debug, Error)]
pub enum GateBuildError {
    #[error("access token secret must not be empty")]
    EmptySecret,
    #[error("invalid ed25519 public key pem: {0}")]
    InvalidPublicKey(#[source] jsonwebtoken::errors::Error),
}

/// Why a presented token was not accepted. Diagnostic only: every fault is
/// reported to the client the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFault {
    Expired,
    NotYetValid,
    BadSignature,
    WrongIssuerOrAudience,
    Malformed,
    MissingClaim(&'static str),
    InvalidClaim(&'static str),
}

impl fmt::Display for CredentialFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => f.write_str("token expired"),
            Self::NotYetValid => f.write_str("token not yet valid"),
            Self::BadSignature => f.write_str("signature or algorithm rejected"),
            Self::WrongIssuerOrAudience => f.write_str("issuer or audience mismatch"),
            Self::Malformed => f.write_str("token malformed"),
            Self::MissingClaim(name) => write!(f, "missing '{}' claim", name),
            Self::InvalidClaim(name) => write!(f, "invalid '{}' claim", name),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("bearer token missing or malformed")]
    MissingOrMalformedCredential,

    #[error("invalid or expired token: {fault}")]
    InvalidOrExpiredCredential { fault: CredentialFault },

    #[error("role '{role}' is not allowed; allowed roles: {allowed}")]
    InsufficientRole { role: String, allowed: RoleSet },
}

impl AuthzError {
    fn invalid(fault: CredentialFault) -> Self {
        Self::InvalidOrExpiredCredential { fault }
    }
}

/// The authenticated subject admitted by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: i64,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GateClaims {
    #[serde(default)]
    sub: Option<SubjectClaim>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    exp: Option<u64>,
}

// Issuers write `sub` as a decimal string; a bare JSON integer is accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SubjectClaim {
    Number(i64),
    Text(String),
}

impl SubjectClaim {
    fn subject_id(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

#[derive(Clone)]
pub struct AuthorizationGate {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
}

impl fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthorizationGate")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthorizationGate {
    pub fn new(config: GateConfig) -> Result<Self, GateBuildError> {
        let (decoding_key, algorithm) = match &config.key {
            VerificationKey::Secret(secret) => {
                if secret.is_empty() {
                    return Err(GateBuildError::EmptySecret);
                }
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            VerificationKey::Ed25519PublicPem(pem) => (
                DecodingKey::from_ed_pem(pem.as_bytes())
                    .map_err(GateBuildError::InvalidPublicKey)?,
                Algorithm::EdDSA,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = config.leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
            leeway_seconds: config.leeway_seconds,
        })
    }

    /// Decide whether the request carrying `header_value` may perform an
    /// operation restricted to `allowed`.
    pub fn authorize(
        &self,
        header_value: Option<&str>,
        allowed: &RoleSet,
    ) -> Result<Principal, AuthzError> {
        let token = header_value
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthzError::MissingOrMalformedCredential)?;

        let principal = self.verify(token)?;

        if !allowed.contains(&principal.role) {
            return Err(AuthzError::InsufficientRole {
                role: principal.role,
                allowed: allowed.clone(),
            });
        }

        Ok(principal)
    }

    /// Verify signature, expiry, issuer and audience, then extract the
    /// subject id and role claims.
    pub fn verify(&self, token: &str) -> Result<Principal, AuthzError> {
        let data = jsonwebtoken::decode::<GateClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthzError::invalid(fault_from_jwt(e.kind())))?;

        let claims = data.claims;

        // jsonwebtoken still admits a token at the exact `exp` second.
        let exp = claims
            .exp
            .ok_or(AuthzError::invalid(CredentialFault::MissingClaim("exp")))?;
        if exp.saturating_add(self.leeway_seconds) <= jsonwebtoken::get_current_timestamp() {
            return Err(AuthzError::invalid(CredentialFault::Expired));
        }

        let subject_id = claims
            .sub
            .as_ref()
            .ok_or(AuthzError::invalid(CredentialFault::MissingClaim("sub")))?
            .subject_id()
            .ok_or(AuthzError::invalid(CredentialFault::InvalidClaim("sub")))?;

        let role = claims
            .role
            .ok_or(AuthzError::invalid(CredentialFault::MissingClaim("role")))?;
        let role = role.trim();
        if role.is_empty() {
            return Err(AuthzError::invalid(CredentialFault::InvalidClaim("role")));
        }

        Ok(Principal {
            subject_id,
            role: role.to_string(),
        })
    }
}

fn fault_from_jwt(kind: &ErrorKind) -> CredentialFault {
    match kind {
        ErrorKind::ExpiredSignature => CredentialFault::Expired,
        ErrorKind::ImmatureSignature => CredentialFault::NotYetValid,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            CredentialFault::BadSignature
        }
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
            CredentialFault::WrongIssuerOrAudience
        }
        ErrorKind::MissingRequiredClaim(claim) => {
            CredentialFault::MissingClaim(required_claim_name(claim))
        }
        _ => CredentialFault::Malformed,
    }
}

fn required_claim_name(claim: &str) -> &'static str {
    match claim {
        "iss" => "iss",
        "aud" => "aud",
        "sub" => "sub",
        "nbf" => "nbf",
        _ => "exp",
    }
}
