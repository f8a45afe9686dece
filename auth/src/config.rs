use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
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

/// How access tokens are signed. Must match the resource server's
/// verification key (shared secret, or the public half of the Ed25519 key).
#[derive(Clone)]
pub enum SigningKey {
    Secret(String),
    Ed25519PrivatePem(String),
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret(_) => f.write_str("SigningKey::Secret(..)"),
            Self::Ed25519PrivatePem(_) => f.write_str("SigningKey::Ed25519PrivatePem(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub database_url: String,
    pub issuer: String,
    pub audience: String,
    pub signing_key: SigningKey,
    pub access_token_ttl_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("AUTH_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("AUTH_PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let issuer = env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;
        let audience =
            env::var("AUTH_AUDIENCE").map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;

        let signing_key = signing_key_from(
            env::var("ACCESS_JWT_PRIVATE_KEY_PEM").ok(),
            env::var("ACCESS_JWT_SECRET").ok(),
        )?;

        let access_token_ttl_seconds = env::var("ACCESS_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(600); // 10 min
        if access_token_ttl_seconds == 0 {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }

        Ok(Config {
            addr,
            app_env,
            database_url,
            issuer,
            audience,
            signing_key,
            access_token_ttl_seconds,
        })
    }
}

fn signing_key_from(
    private_key_pem: Option<String>,
    secret: Option<String>,
) -> Result<SigningKey, ConfigError> {
    if let Some(pem) = private_key_pem.filter(|p| !p.trim().is_empty()) {
        return Ok(SigningKey::Ed25519PrivatePem(pem.replace("\\n", "\n")));
    }
    match secret {
        Some(secret) if !secret.is_empty() => Ok(SigningKey::Secret(secret)),
        Some(_) => Err(ConfigError::Invalid("ACCESS_JWT_SECRET")),
        None => Err(ConfigError::Missing(
            "ACCESS_JWT_PRIVATE_KEY_PEM or ACCESS_JWT_SECRET",
        )),
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        tracing::error!(error = %e, "configuration error");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_key_wins_over_secret() {
        let key = signing_key_from(Some("a\\nb".into()), Some("s".into())).unwrap();
        assert!(matches!(key, SigningKey::Ed25519PrivatePem(pem) if pem == "a\nb"));
    }

    #[test]
    fn missing_or_empty_secret_is_an_error() {
        assert!(matches!(
            signing_key_from(None, None),
            Err(ConfigError::Missing(_))
        ));
        assert_eq!(
            signing_key_from(Some("  ".into()), Some(String::new())).unwrap_err(),
            ConfigError::Invalid("ACCESS_JWT_SECRET")
        );
    }

    #[test]
    fn signing_key_debug_hides_material() {
        let key = SigningKey::Secret("hunter2".into());
        assert!(!format!("{key:?}").contains("hunter2"));
    }
}
