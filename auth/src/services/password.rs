use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

/// `false` for a wrong password and for an unparsable stored hash alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHasher, SaltString};
    use rand_core::OsRng;

    #[test]
    fn verifies_an_argon2_phc_hash() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"CorrectHorseBatteryStaple!", &salt)
            .unwrap()
            .to_string();

        assert!(verify_password("CorrectHorseBatteryStaple!", &hash));
        assert!(!verify_password("correcthorsebatterystaple!", &hash));
        assert!(!verify_password("CorrectHorseBatteryStaple!", "plaintext"));
    }
}
