//! Random-field masking.
//!
//! The ClientHello random field carries a proof of key possession: a
//! time-bucketed goal hash encrypted under the session key. A single
//! 16-byte block in CFB mode needs no stream cipher machinery: the
//! keystream is the AES encryption of the IV, XORed with the plaintext
//! block. Masking and unmasking are the same operation.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;

use crate::crypto::SessionKey;

/// Size of the CFB initialization vector.
pub const MASK_IV_SIZE: usize = 16;

/// Size of the masked goal block.
pub const MASK_BLOCK_SIZE: usize = 16;

/// Apply single-block AES-256-CFB to `block` under `key` and `iv`.
///
/// Calling this twice with the same key and IV returns the original
/// block, so the receiving side uses the same function to unmask.
pub fn mask_block(
    key: &SessionKey,
    iv: &[u8; MASK_IV_SIZE],
    block: &[u8; MASK_BLOCK_SIZE],
) -> [u8; MASK_BLOCK_SIZE] {
    let cipher = Aes256::new(GenericArray::from_slice(key.as_bytes()));
    let mut keystream = GenericArray::clone_from_slice(iv);
    cipher.encrypt_block(&mut keystream);

    let mut out = [0u8; MASK_BLOCK_SIZE];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = keystream[i] ^ block[i];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{passphrase_key, SecureRandom};

    #[test]
    fn test_mask_roundtrip() {
        let key = passphrase_key("shared-secret");
        let iv: [u8; MASK_IV_SIZE] = SecureRandom::bytes();
        let block = *b"0123456789abcdef";

        let masked = mask_block(&key, &iv, &block);
        assert_ne!(masked, block);

        let unmasked = mask_block(&key, &iv, &masked);
        assert_eq!(unmasked, block);
    }

    #[test]
    fn test_mask_depends_on_key_and_iv() {
        let iv = [0x11u8; MASK_IV_SIZE];
        let block = [0x22u8; MASK_BLOCK_SIZE];

        let a = mask_block(&passphrase_key("one"), &iv, &block);
        let b = mask_block(&passphrase_key("two"), &iv, &block);
        assert_ne!(a, b);

        let other_iv = [0x12u8; MASK_IV_SIZE];
        let c = mask_block(&passphrase_key("one"), &other_iv, &block);
        assert_ne!(a, c);
    }
}
