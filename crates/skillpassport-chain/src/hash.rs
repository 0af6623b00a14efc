// SHA-256 hashing utilities for Skill Passport

use rand::Rng;
use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash of the input bytes and returns it as a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Builds a stand-in transaction hash: `0x` followed by the SHA-256 of the
/// user id, kind, item id, unix time and a random nonce.
///
/// This is not a chain submission. Two calls with identical inputs in the
/// same second still differ because of the nonce.
pub fn placeholder_tx_hash(user_id: i64, kind: &str, item_id: i64, unix_time: i64) -> String {
    let nonce: u64 = rand::thread_rng().gen();
    let seed = format!("{}{}{}{}.{:016x}", user_id, kind, item_id, unix_time, nonce);
    format!("0x{}", sha256_hex(seed.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_hash() {
        let empty_hash = sha256_hex(b"");
        assert_eq!(
            empty_hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );

        let hello_hash = sha256_hex(b"hello");
        assert_eq!(
            hello_hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_placeholder_tx_hash_shape() {
        let hash = placeholder_tx_hash(7, "badge", 42, 1_700_000_000);
        assert!(hash.starts_with("0x"));
        // 0x + 64 hex characters
        assert_eq!(hash.len(), 66);
        assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }

    #[test]
    fn test_placeholder_tx_hash_differs_within_same_second() {
        let a = placeholder_tx_hash(7, "course", 3, 1_700_000_000);
        let b = placeholder_tx_hash(7, "course", 3, 1_700_000_000);
        assert_ne!(a, b);
    }
}
