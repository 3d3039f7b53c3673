//! Password hashing and verification using Argon2id.
//!
//! Hashing uses OWASP-recommended parameters (memory: 19 MiB,
//! iterations: 2, parallelism: 1) with a random salt per hash. An
//! optional pepper (server-side secret) may be prepended.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::DbError;

/// Hash a plaintext password into a PHC-format Argon2id hash.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Corrupt(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Corrupt(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or an error
/// if the stored hash is malformed.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, DbError> {
    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| DbError::Corrupt(format!("invalid hash format: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(input, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(DbError::Corrupt(format!("verify error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("hunter2", None).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &hash, None).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("hunter2", None).unwrap();
        assert!(!verify_password("wrong", &hash, None).unwrap());
    }

    #[test]
    fn pepper_is_applied() {
        let hash = hash_password("hunter2", Some("pepper!")).unwrap();
        assert!(verify_password("hunter2", &hash, Some("pepper!")).unwrap());
        // Without pepper should fail.
        assert!(!verify_password("hunter2", &hash, None).unwrap());
    }

    #[test]
    fn malformed_hash_returns_error() {
        let result = verify_password("pw", "not-a-hash", None);
        assert!(result.is_err());
    }
}
