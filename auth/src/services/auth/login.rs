/*
 * Responsibility
 * - email + password を検証して access token を発行する
 * - 未登録 email とパスワード不一致は区別しない (どちらも InvalidCredentials)
 */
use sqlx::PgPool;

use crate::error::AppError;
use crate::repos::user_repo;
use crate::services::auth::token_issuer::{AccessTokenIssuer, IssuedAccessToken};
use crate::services::password::verify_password;

#[derive(Debug, Clone)]
pub struct LoggedInUser {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedAccessToken,
    pub user: LoggedInUser,
}

pub async fn login(
    db: &PgPool,
    tokens: &AccessTokenIssuer,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AppError> {
    let Some(row) = user_repo::find_credentials_by_email(db, email.trim()).await? else {
        tracing::info!("login rejected: unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &row.password_hash) {
        tracing::info!(user_id = row.id, "login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens.issue(row.id, &row.role_name)?;
    tracing::info!(user_id = row.id, role = %row.role_name, "access token issued");

    Ok(LoginOutcome {
        token,
        user: LoggedInUser {
            id: row.id,
            nickname: row.nickname,
            email: row.email,
            role: row.role_name,
        },
    })
}
