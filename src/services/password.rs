//! Password hashing (argon2id, PHC string format).

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use rand_core::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must not be blank")]
    Blank,
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.trim().is_empty() {
        return Err(PasswordError::Blank);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::PasswordHash;

    #[test]
    fn hash_is_a_phc_argon2id_string() {
        let hash = hash_password("correct horse").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(parsed.salt.is_some());
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = hash_password("pw-123456").unwrap();
        let b = hash_password("pw-123456").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn blank_password_is_rejected() {
        assert!(matches!(hash_password("   "), Err(PasswordError::Blank)));
    }
}
