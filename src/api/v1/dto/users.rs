/*
 * Responsibility
 * - Users / roles の request/response DTO
 * - validate() は形式チェックのみ (一意性などは DB 側)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::repos::{role_repo::RoleRow, user_repo::UserRow};

const MIN_PASSWORD_LEN: usize = 8;

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && value.len() <= 254,
        None => false,
    }
}

// `Some(None)` for an explicit null, `None` when the field is absent.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub nickname: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let nickname = self.nickname.trim();
        if nickname.is_empty() {
            return Err("nickname is required");
        }
        if nickname.chars().count() > 50 {
            return Err("nickname must be <= 50 chars");
        }
        if !looks_like_email(&self.email) {
            return Err("email is invalid");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("password must be >= 8 chars");
        }
        if let Some(name) = &self.full_name
            && name.chars().count() > 120
        {
            return Err("full_name must be <= 120 chars");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub nickname: Option<String>,
    pub email: Option<String>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (set NULL)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "explicit_null")]
    pub full_name: Option<Option<String>>,
    pub role_id: Option<i64>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(nickname) = &self.nickname
            && nickname.trim().is_empty()
        {
            return Err("nickname cannot be empty");
        }
        if let Some(email) = &self.email
            && !looks_like_email(email)
        {
            return Err("email is invalid");
        }
        if let Some(Some(name)) = &self.full_name
            && name.chars().count() > 120
        {
            return Err("full_name must be <= 120 chars");
        }
        if let Some(role_id) = self.role_id
            && role_id <= 0
        {
            return Err("role_id must be positive");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.new_password.trim().is_empty() {
            return Err("new_password is required");
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err("new_password must be >= 8 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: RoleResponse,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(u: UserRow) -> Self {
        Self {
            id: u.id,
            nickname: u.nickname,
            email: u.email,
            full_name: u.full_name,
            role: RoleResponse {
                id: u.role_id,
                name: u.role_name,
            },
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
}

impl CreateRoleRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required");
        }
        if name.contains(',') {
            return Err("name must not contain ','");
        }
        if name.chars().count() > 50 {
            return Err("name must be <= 50 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
}

impl From<RoleRow> for RoleResponse {
    fn from(r: RoleRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}
