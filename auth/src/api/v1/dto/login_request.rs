use serde::Deserialize;

/// Request body for `POST /auth/login`.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"..")
            .finish()
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() {
            return Err("email is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_rejected() {
        let req = LoginRequest {
            email: " ".into(),
            password: "x".into(),
        };
        assert_eq!(req.validate(), Err("email is required"));

        let req = LoginRequest {
            email: "a@b.cl".into(),
            password: String::new(),
        };
        assert_eq!(req.validate(), Err("password is required"));
    }

    #[test]
    fn password_is_not_debug_printed() {
        let req = LoginRequest {
            email: "a@b.cl".into(),
            password: "s3cret-pass".into(),
        };
        assert!(!format!("{req:?}").contains("s3cret-pass"));
    }
}
