use actix_web::web;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| Error::FailedToHashPassword(err.to_string()))?;

    Ok(hash.to_string())
}

/// A hash that can't be parsed never verifies.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// `hash_password` on the actix blocking thread pool.
pub async fn hash_password_blocking(password: String) -> Result<String, Error> {
    web::block(move || hash_password(&password))
        .await
        .map_err(|err| Error::FailedToHashPassword(err.to_string()))?
}

pub async fn verify_password_blocking(
    password: String,
    password_hash: String,
) -> Result<bool, Error> {
    web::block(move || verify_password(&password, &password_hash))
        .await
        .map_err(|err| Error::FailedToHashPassword(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[actix_web::test]
    async fn blocking_variants_agree_with_inline_ones() {
        let hash = hash_password_blocking("correct horse".to_string())
            .await
            .unwrap();

        assert!(verify_password("correct horse", &hash));
        assert!(verify_password_blocking("correct horse".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password_blocking("battery staple".to_string(), hash)
            .await
            .unwrap());
    }
}
