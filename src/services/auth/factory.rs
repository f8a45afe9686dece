/// Factory: build the `AuthorizationGate` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::gate::{AuthorizationGate, GateBuildError, GateConfig};

pub fn build_gate(config: &Config) -> Result<Arc<AuthorizationGate>, GateBuildError> {
    let gate = AuthorizationGate::new(GateConfig {
        key: config.access_verification_key.clone(),
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
    })?;

    Ok(Arc::new(gate))
}
