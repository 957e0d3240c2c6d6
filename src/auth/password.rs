// file: src/auth/password.rs
// description: salted sha-256 password sealing compatible with existing user rows

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

/// Length of a base64-encoded sha-256 digest; the salt follows it.
pub const HASH_LEN: usize = 44;

pub fn generate_salt() -> String {
    STANDARD.encode(rand::random::<[u8; 16]>())
}

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// Value stored in `users.password`: hash followed by salt.
pub fn seal(password: &str) -> String {
    let salt = generate_salt();
    let hash = hash_password(password, &salt);
    format!("{}{}", hash, salt)
}

pub fn verify(password: &str, stored: &str) -> bool {
    if stored.len() <= HASH_LEN || !stored.is_char_boundary(HASH_LEN) {
        return false;
    }
    let (hash, salt) = stored.split_at(HASH_LEN);
    hash_password(password, salt) == hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_has_fixed_length() {
        let salt = generate_salt();
        assert_eq!(salt.len(), 24);
        assert_eq!(hash_password("secret", &salt).len(), HASH_LEN);
        assert_eq!(hash_password("", "").len(), HASH_LEN);
    }

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        assert_eq!(
            hash_password("a", "bc"),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
    }

    #[test]
    fn test_verify_sealed_password() {
        let stored = seal("hunter2");
        assert!(verify("hunter2", &stored));
        assert!(!verify("hunter3", &stored));
        assert!(!verify("", &stored));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(seal("same"), seal("same"));
    }

    #[test]
    fn test_verify_rejects_malformed_storage() {
        assert!(!verify("x", ""));
        assert!(!verify("x", "too-short"));
        assert!(!verify("x", &"é".repeat(30)));
    }
}
