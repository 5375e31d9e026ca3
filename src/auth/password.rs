//! Password hashing and verification using bcrypt.

/// Hash a plaintext password with the given bcrypt cost factor.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is
/// malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the tests fast; production cost comes from config.
    const TEST_COST: u32 = 4;

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("hunter2-but-longer", TEST_COST).unwrap();
        assert!(verify_password("hunter2-but-longer", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("hunter2-but-longer", TEST_COST).unwrap();
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password", TEST_COST).unwrap();
        let b = hash_password("same-password", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_returns_error() {
        assert!(verify_password("pw", "not-a-bcrypt-hash").is_err());
    }
}
