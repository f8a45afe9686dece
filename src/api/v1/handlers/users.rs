/*
 * Responsibility
 * - /users 系 handler
 * - Path/Json を extractor で受け、DTO validation → repo/service 呼び出し
 * - POST /users は公開 (self sign-up)。role は設定値 DEFAULT_SIGNUP_ROLE 固定
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::users::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserResponse},
        extractors::AuthCtxExtractor,
        policy::ensure_owner_or,
    },
    error::AppError,
    repos::{error::RepoError, role_repo, user_repo},
    services::password::{self, PasswordError},
    state::AppState,
};

fn password_error(e: PasswordError) -> AppError {
    match e {
        PasswordError::Blank => AppError::validation("password is required"),
        PasswordError::Hash(err) => {
            tracing::error!(error = %err, "password hashing failed");
            AppError::Internal
        }
    }
}

fn duplicate_user(e: RepoError) -> AppError {
    match e {
        RepoError::Conflict => {
            AppError::conflict("USER_EXISTS", "nickname or email is already registered")
        }
        RepoError::ForeignKey => AppError::bad_request("UNKNOWN_ROLE", "role does not exist"),
        other => other.into(),
    }
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let role = role_repo::ensure(&state.db, &state.default_signup_role).await?;
    let password_hash = password::hash_password(&req.password).map_err(password_error)?;

    let row = user_repo::create(
        &state.db,
        req.nickname.trim(),
        req.email.trim(),
        &password_hash,
        req.full_name.as_deref(),
        role.id,
    )
    .await
    .map_err(duplicate_user)?;

    tracing::info!(user_id = row.id, role = %row.role_name, "user registered");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::get(&state.db, user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::find_by_email(&state.db, email.trim())
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn get_user_by_nickname(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::find_by_nickname(&state.db, nickname.trim())
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate().map_err(AppError::validation)?;

    let full_name: Option<Option<&str>> = req.full_name.as_ref().map(|inner| inner.as_deref());

    let row = user_repo::update(
        &state.db,
        user_id,
        req.nickname.as_deref().map(str::trim),
        req.email.as_deref().map(str::trim),
        full_name,
        req.role_id,
    )
    .await
    .map_err(duplicate_user)?
    .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if user_repo::delete(&state.db, user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}

/// PUT /users/password/{email}: the account owner, or a user admin.
pub async fn change_password(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(email): Path<String>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    req.validate().map_err(AppError::validation)?;

    let admins = &state.policy.user_admin;
    match user_repo::find_by_email(&state.db, email.trim()).await? {
        Some(user) => ensure_owner_or(&ctx, user.id, admins)?,
        // Only admins learn whether an email is registered.
        None if admins.contains(&ctx.role) => return Err(AppError::not_found("user")),
        None => {
            return Err(AppError::forbidden(format!(
                "access denied: only the owner or roles {admins} may access this resource"
            )));
        }
    }

    let password_hash = password::hash_password(&req.new_password).map_err(password_error)?;
    if !user_repo::update_password_by_email(&state.db, email.trim(), &password_hash).await? {
        return Err(AppError::not_found("user"));
    }

    tracing::info!(user_id = ctx.user_id, "password changed");

    Ok(StatusCode::NO_CONTENT)
}
