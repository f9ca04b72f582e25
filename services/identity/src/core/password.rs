//! Argon2id secret hashing.
//!
//! Hashing stays entirely inside the identity service; only PHC strings reach
//! the store and nothing password-shaped ever goes on the wire.

use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

/// Well-formed PHC string that matches no real secret. Verifying candidates
/// against it keeps the absent-user path on the same code path (and roughly
/// the same cost) as a real mismatch.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

pub(crate) fn hash_secret(secret: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();
    Ok(phc)
}

pub(crate) fn verify_secret(hash: &str, candidate: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(candidate.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}

/// Burn a verification against the dummy hash. Always fails.
pub(crate) fn verify_dummy(candidate: &str) -> bool {
    verify_secret(DUMMY_HASH, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() -> Result<()> {
        let hash = hash_secret("hunter2secret")?;
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_secret(&hash, "hunter2secret"));
        Ok(())
    }

    #[test]
    fn verify_rejects_wrong_secret() -> Result<()> {
        let hash = hash_secret("hunter2secret")?;
        assert!(!verify_secret(&hash, "not-the-secret"));
        Ok(())
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_secret("not-a-phc-string", "anything"));
    }

    #[test]
    fn hashes_are_salted() -> Result<()> {
        let first = hash_secret("same-secret")?;
        let second = hash_secret("same-secret")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn dummy_verification_never_succeeds() {
        assert!(!verify_dummy(""));
        assert!(!verify_dummy("hunter2secret"));
    }
}
