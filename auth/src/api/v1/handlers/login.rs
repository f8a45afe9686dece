use axum::Json;
use axum::extract::State;

use crate::api::v1::dto::{login_request::LoginRequest, login_response::LoginResponse};
use crate::error::AppError;
use crate::services::auth::login as login_service;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::InvalidRequest(msg.to_string()))?;

    let out = login_service::login(&state.db, &state.tokens, &req.email, &req.password).await?;

    Ok(Json(out.into()))
}
