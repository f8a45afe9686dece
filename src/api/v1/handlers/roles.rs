use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::users::{CreateRoleRequest, RoleResponse},
    error::AppError,
    repos::{error::RepoError, role_repo},
    state::AppState,
};

pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<RoleResponse>>, AppError> {
    let rows = role_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_role(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> Result<Json<RoleResponse>, AppError> {
    let row = role_repo::get(&state.db, role_id)
        .await?
        .ok_or(AppError::not_found("role"))?;

    Ok(Json(row.into()))
}

pub async fn create_role(
    State(state): State<AppState>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = role_repo::create(&state.db, req.name.trim())
        .await
        .map_err(|e| match e {
            RepoError::Conflict => AppError::conflict("ROLE_EXISTS", "role already exists"),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(row.into())))
}
