//! Deterministic output fingerprints for replay audits.
//!
//! Two runs over the same input must produce the same fingerprint; the CLI
//! logs input and output fingerprints so reruns can be compared.

use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// sha256 of the compact JSON encoding of `value`.
pub fn of_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(&serde_json::to_vec(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_json_fingerprint_is_stable() {
        let v = json!({"b": 1, "a": [1, 2]});
        assert_eq!(of_json(&v).unwrap(), of_json(&v.clone()).unwrap());
        assert_ne!(of_json(&v).unwrap(), of_json(&json!({"b": 2})).unwrap());
    }
}
