//! Role guard: access token (JWT) を gate で検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を受け取り、署名/exp/iss/aud と role を検証する
//! - 許可ロールはルートのグループごとに `apply` に渡す
//! - 拒否理由はここでログに出す (gate 自身はログを出さない)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AuthorizationGate, AuthzError, RoleSet};
use crate::state::AppState;

#[derive(Clone)]
struct RouteGuard {
    gate: Arc<AuthorizationGate>,
    allowed: RoleSet,
}

/// `router` の全ルートに、`allowed` のロールだけを通す guard を掛ける。
///
/// 例：
/// ```ignore
/// let admin = Router::new().route("/roles", post(create_role));
/// let admin = middleware::auth::access::apply(admin, &state, state.policy.user_admin.clone());
/// ```
pub fn apply(router: Router<AppState>, state: &AppState, allowed: RoleSet) -> Router<AppState> {
    let guard = RouteGuard {
        gate: state.gate.clone(),
        allowed,
    };
    // route_layer: マッチしなかったリクエストは 404 のまま (401 にしない)
    router.route_layer(middleware::from_fn_with_state(guard, access_middleware))
}

async fn access_middleware(
    State(guard): State<RouteGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let principal = match guard.gate.authorize(header_value, &guard.allowed) {
        Ok(principal) => principal,
        Err(err) => {
            match &err {
                AuthzError::MissingOrMalformedCredential => {
                    tracing::debug!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        "bearer token missing or malformed"
                    );
                }
                AuthzError::InvalidOrExpiredCredential { fault } => {
                    tracing::warn!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        fault = %fault,
                        "access token verification failed"
                    );
                }
                AuthzError::InsufficientRole { role, allowed } => {
                    tracing::debug!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        role = %role,
                        allowed = %allowed,
                        "role not allowed"
                    );
                }
            }
            return Err(err.into());
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(principal));

    Ok(next.run(req).await)
}
