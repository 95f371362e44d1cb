use crate::error::AppError;

/// Default bcrypt work factor. Overridable through `auth.hash_cost`.
pub const DEFAULT_HASH_COST: u32 = 10;

/// One-way salted hash. bcrypt generates a fresh random salt per call, so
/// hashing the same password twice yields different strings.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(plaintext, cost)?)
}

pub fn verify_password(plaintext: &str, hashed: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(plaintext, hashed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost (4) keeps the adaptive hash fast enough for tests.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_salt_randomization() {
        let first = hash_password("secret1", TEST_COST).unwrap();
        let second = hash_password("secret1", TEST_COST).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_round_trip() {
        let hashed = hash_password("secret1", TEST_COST).unwrap();
        assert!(verify_password("secret1", &hashed).unwrap());
        assert!(!verify_password("secret2", &hashed).unwrap());
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hashed = hash_password("secret1", TEST_COST).unwrap();
        assert!(!hashed.contains("secret1"));
    }
}
