//! Cryptographic primitives for the bootstrap protocol.
//!
//! This module provides:
//! - Secure random number generation (opaque tags, mask IVs)
//! - SHA-256 passphrase key derivation
//! - HKDF-based deterministic seed expansion
//! - AES-256-CFB single-block masking of the hello random field
//!
//! Secret material is zeroized on drop to prevent memory leakage.

mod kdf;
mod mask;
mod random;

pub use kdf::{be_fold, passphrase_key, seeded_bytes, SessionKey};
pub use mask::{mask_block, MASK_BLOCK_SIZE, MASK_IV_SIZE};
pub use random::SecureRandom;

/// Size of the derived symmetric key in bytes (SHA-256 output)
pub const KEY_SIZE: usize = 32;

/// Size of the per-session opaque tag in bytes
pub const OPAQUE_TAG_SIZE: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation_and_mask_agree_across_peers() {
        // Client and server derive the key independently from the
        // shared passphrase; the server must be able to unmask what
        // the client masked.
        let client_key = passphrase_key("the-shared-passphrase");
        let server_key = passphrase_key("the-shared-passphrase");
        assert_eq!(client_key, server_key);

        let iv: [u8; MASK_IV_SIZE] = SecureRandom::bytes();
        let goal = [0x5au8; MASK_BLOCK_SIZE];

        let masked = mask_block(&client_key, &iv, &goal);
        let unmasked = mask_block(&server_key, &iv, &masked);
        assert_eq!(unmasked, goal);
    }

    #[test]
    fn test_opaque_tag_fold_matches_manual() {
        let tag: [u8; OPAQUE_TAG_SIZE] = SecureRandom::bytes();
        // The fold only keeps the low 64 bits of the big-endian value
        let expected = u64::from_be_bytes(tag[OPAQUE_TAG_SIZE - 8..].try_into().unwrap());
        assert_eq!(be_fold(&tag), expected);
    }
}
