//! Salted password digests.

use constant_time_eq::constant_time_eq;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

pub const SALT_LEN: usize = 16;

/// Lowercase hex SHA-256 of `password || salt`.
#[must_use]
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Random salt of [`SALT_LEN`] characters from `[A-Za-z0-9]`.
#[must_use]
pub fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}

/// Recompute the digest and compare it against `expected_hash` in constant time.
#[must_use]
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    constant_time_eq(
        hash_password(password, salt).as_bytes(),
        expected_hash.as_bytes(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(
            hash_password("secret1", "abcdefgh12345678"),
            hash_password("secret1", "abcdefgh12345678")
        );
    }

    #[test]
    fn hash_matches_known_digest() {
        // sha256("password" || "salt")
        assert_eq!(
            hash_password("password", "salt"),
            "7a37b85c8918eac19a9089c0fa5a2ab4dce3f90528dcdeec108b23ddf3607b99"
        );
    }

    #[test]
    fn hash_is_lowercase_hex_of_fixed_length() {
        let digest = hash_password("", "");
        assert_eq!(digest.len(), 64);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn different_salts_give_different_digests() {
        assert_ne!(
            hash_password("secret1", "aaaaaaaaaaaaaaaa"),
            hash_password("secret1", "aaaaaaaaaaaaaaab")
        );
    }

    #[test]
    fn salt_shape() {
        let salt = generate_salt();
        assert_eq!(salt.chars().count(), SALT_LEN);
        assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn salts_are_not_repeated() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn verify_password_accepts_only_the_original() {
        let salt = generate_salt();
        let hash = hash_password("secret1", &salt);
        assert!(verify_password("secret1", &salt, &hash));
        assert!(!verify_password("secret2", &salt, &hash));
        assert!(!verify_password("secret1", "otherotherother1", &hash));
    }

    #[test]
    fn verify_rejects_malformed_stored_hash() {
        let salt = generate_salt();
        let hash = hash_password("secret1", &salt);
        assert!(!verify_password("secret1", &salt, &hash[..63]));
        assert!(!verify_password("secret1", &salt, &hash.to_uppercase()));
        assert!(!verify_password("secret1", &salt, ""));
    }
}
