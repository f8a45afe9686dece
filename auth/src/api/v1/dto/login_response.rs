use serde::Serialize;

use crate::services::auth::login::{LoggedInUser, LoginOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub role: String,
}

impl From<LoggedInUser> for LoginUser {
    fn from(u: LoggedInUser) -> Self {
        Self {
            id: u.id,
            nickname: u.nickname,
            email: u.email,
            role: u.role,
        }
    }
}

impl From<LoginOutcome> for LoginResponse {
    fn from(out: LoginOutcome) -> Self {
        Self {
            access_token: out.token.access_token,
            token_type: "Bearer",
            expires_in: out.token.expires_in,
            user: out.user.into(),
        }
    }
}
