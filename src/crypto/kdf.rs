//! Key derivation and deterministic byte-stream expansion.
//!
//! The session key is the SHA-256 digest of the shared passphrase.
//! Seed-expanded streams (session tickets, session ids, the reply's
//! Finished-shaped body) use HKDF-SHA256 with the 64-bit seed as input
//! keying material, so both sides of the protocol can regenerate them
//! from the same seed arithmetic.

use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_SIZE;

/// The symmetric session key derived from the shared passphrase.
///
/// Automatically zeroized when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; KEY_SIZE]);

impl SessionKey {
    /// Create a session key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes.
    ///
    /// # Security
    ///
    /// Handle with care - this is secret key material.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Integer interpretation of the key, used in seed arithmetic.
    pub fn seed_fold(&self) -> u64 {
        be_fold(&self.0)
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Derive the session key from the shared passphrase.
///
/// The key is the SHA-256 digest of the passphrase bytes; the server
/// derives the same key from its own copy of the passphrase.
pub fn passphrase_key(passphrase: &str) -> SessionKey {
    let digest = Sha256::digest(passphrase.as_bytes());
    SessionKey(digest.into())
}

/// Expand a 64-bit seed into `len` deterministic bytes.
///
/// Same seed, same output; the streams are indistinguishable from
/// random to an observer without the seed. `len` must fit within one
/// HKDF expansion (8160 bytes); protocol fields are far below that.
pub fn seeded_bytes(seed: u64, len: usize) -> Vec<u8> {
    let hk = Hkdf::<Sha256>::new(None, &seed.to_be_bytes());
    let mut okm = vec![0u8; len];
    // Output lengths used by the protocol are always valid
    hk.expand(&[], &mut okm)
        .expect("seed expansion length within HKDF bounds");
    okm
}

/// Fold a byte slice into a u64 in big-endian order, wrapping on
/// overflow. This is the protocol's integer interpretation of opaque
/// byte strings (tags, keys) for seed arithmetic.
pub fn be_fold(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_mul(256).wrapping_add(b as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrase_key_known_vector() {
        // SHA-256 of the empty string
        let key = passphrase_key("");
        assert_eq!(
            hex::encode(key.as_bytes()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_passphrase_key_distinct() {
        assert_ne!(passphrase_key("alpha"), passphrase_key("beta"));
        assert_eq!(passphrase_key("alpha"), passphrase_key("alpha"));
    }

    #[test]
    fn test_seeded_bytes_deterministic() {
        let a = seeded_bytes(42, 192);
        let b = seeded_bytes(42, 192);
        assert_eq!(a, b);
        assert_eq!(a.len(), 192);

        let c = seeded_bytes(43, 192);
        assert_ne!(a, c);
    }

    #[test]
    fn test_seeded_bytes_not_degenerate() {
        let stream = seeded_bytes(0, 64);
        assert!(!stream.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_be_fold() {
        assert_eq!(be_fold(&[]), 0);
        assert_eq!(be_fold(&[0x01]), 1);
        assert_eq!(be_fold(&[0x01, 0x00]), 256);
        assert_eq!(be_fold(&[0xff, 0xff]), 65535);
        // Wraps instead of overflowing for long inputs
        let tag = [0xffu8; 32];
        let _ = be_fold(&tag);
    }

    #[test]
    fn test_session_key_debug_redacted() {
        let key = passphrase_key("secret");
        assert_eq!(format!("{:?}", key), "SessionKey(..)");
    }
}
