/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, CORS origins, token verification, role sets)
 * - Validate them once at startup (missing or invalid values abort the boot)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::{RoleSet, VerificationKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Roles allowed for each group of guarded operations.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    /// List/read users and their addresses.
    pub user_read: RoleSet,
    /// Modify or delete users, create roles.
    pub user_admin: RoleSet,
    /// Any signed-in account; owner checks narrow it further.
    pub account: RoleSet,
    pub address_write: RoleSet,
    /// Regions, communes, categories and products.
    pub catalog_admin: RoleSet,
    pub checkout: RoleSet,
    pub sales_read: RoleSet,
    /// Upload delivery proof.
    pub delivery: RoleSet,
}

impl AccessPolicy {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the policy from an arbitrary key lookup; missing keys fall back
    /// to the defaults below.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let role_set = |key: &'static str, default: &str| -> Result<RoleSet, ConfigError> {
            let raw = lookup(key).unwrap_or_else(|| default.to_string());
            RoleSet::parse(&raw).map_err(|_| ConfigError::Invalid(key))
        };

        Ok(Self {
            user_read: role_set("ROLES_USER_READ", "ADMINISTRADOR,DELIVERY")?,
            user_admin: role_set("ROLES_USER_ADMIN", "ADMINISTRADOR")?,
            account: role_set("ROLES_ACCOUNT", "CLIENTE,ADMINISTRADOR,DELIVERY")?,
            address_write: role_set("ROLES_ADDRESS_WRITE", "CLIENTE")?,
            catalog_admin: role_set("ROLES_CATALOG_ADMIN", "ADMINISTRADOR")?,
            checkout: role_set("ROLES_CHECKOUT", "CLIENTE")?,
            sales_read: role_set("ROLES_SALES_READ", "ADMINISTRADOR,DELIVERY")?,
            delivery: role_set("ROLES_DELIVERY", "DELIVERY,ADMINISTRADOR")?,
        })
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_leeway_seconds: u64,
    pub access_verification_key: VerificationKey,

    pub default_signup_role: String,
    pub access_policy: AccessPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = split_list(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let auth_issuer =
            std::env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;

        let auth_audience =
            std::env::var("AUTH_AUDIENCE").map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;

        // Tokens must be strictly before `exp`; a leeway is opt-in.
        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let access_verification_key = verification_key_from(
            std::env::var("ACCESS_JWT_PUBLIC_KEY_PEM").ok(),
            std::env::var("ACCESS_JWT_SECRET").ok(),
        )?;

        let default_signup_role = std::env::var("DEFAULT_SIGNUP_ROLE")
            .ok()
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "CLIENTE".to_string());
        if default_signup_role.is_empty() {
            return Err(ConfigError::Invalid("DEFAULT_SIGNUP_ROLE"));
        }

        let access_policy = AccessPolicy::from_env()?;

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            app_env,
            cors_allowed_origins,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            access_verification_key,
            default_signup_role,
            access_policy,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// An EdDSA public key wins over a shared secret when both are set.
fn verification_key_from(
    public_key_pem: Option<String>,
    secret: Option<String>,
) -> Result<VerificationKey, ConfigError> {
    if let Some(pem) = public_key_pem.filter(|p| !p.trim().is_empty()) {
        return Ok(VerificationKey::Ed25519PublicPem(pem.replace("\\n", "\n")));
    }
    match secret {
        Some(secret) if !secret.is_empty() => Ok(VerificationKey::Secret(secret)),
        Some(_) => Err(ConfigError::Invalid("ACCESS_JWT_SECRET")),
        None => Err(ConfigError::Missing(
            "ACCESS_JWT_PUBLIC_KEY_PEM or ACCESS_JWT_SECRET",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_parses_production_aliases() {
        assert!(AppEnv::parse("PROD").is_production());
        assert!(AppEnv::parse("production").is_production());
        assert!(!AppEnv::parse("staging").is_production());
    }

    #[test]
    fn default_policy_matches_documented_roles() {
        let policy = AccessPolicy::from_lookup(|_| None).unwrap();
        assert!(policy.user_read.contains("ADMINISTRADOR"));
        assert!(policy.user_read.contains("DELIVERY"));
        assert!(!policy.user_read.contains("CLIENTE"));
        assert!(policy.address_write.contains("cliente"));
        assert!(policy.delivery.contains("delivery"));
        assert_eq!(policy.user_admin.len(), 1);
    }

    #[test]
    fn policy_override_is_read_from_lookup() {
        let policy = AccessPolicy::from_lookup(|key| {
            (key == "ROLES_CHECKOUT").then(|| "CLIENTE, VIP".to_string())
        })
        .unwrap();
        assert!(policy.checkout.contains("vip"));
    }

    #[test]
    fn empty_policy_override_is_invalid() {
        let err = AccessPolicy::from_lookup(|key| {
            (key == "ROLES_SALES_READ").then(|| " , ".to_string())
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("ROLES_SALES_READ"));
    }

    #[test]
    fn public_key_takes_precedence_over_secret() {
        let key = verification_key_from(Some("-----BEGIN\\nX".into()), Some("s".into())).unwrap();
        match key {
            VerificationKey::Ed25519PublicPem(pem) => assert_eq!(pem, "-----BEGIN\nX"),
            other => panic!("unexpected key: {other:?}"),
        }
    }

    #[test]
    fn missing_key_material_is_reported() {
        assert!(matches!(
            verification_key_from(None, None),
            Err(ConfigError::Missing(_))
        ));
        assert_eq!(
            verification_key_from(None, Some(String::new())).unwrap_err(),
            ConfigError::Invalid("ACCESS_JWT_SECRET")
        );
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(
            split_list(" http://a , ,http://b"),
            vec!["http://a".to_string(), "http://b".to_string()]
        );
    }
}
