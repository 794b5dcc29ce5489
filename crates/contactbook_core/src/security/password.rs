use super::{PasswordHasher, SecurityError};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Argon2id digests in PHC string format.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, SecurityError> {
        let salt = SaltString::generate(&mut OsRng);
        password_hash::PasswordHasher::hash_password(
            &Argon2::default(),
            password.as_bytes(),
            &salt,
        )
        .map(|digest| digest.to_string())
        .map_err(|err| SecurityError::HashFailed(err.to_string()))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, SecurityError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|err| SecurityError::MalformedDigest(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(SecurityError::MalformedDigest(err.to_string())),
        }
    }
}
