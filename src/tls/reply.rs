//! Reply-acceptance message composition.
//!
//! After the server's three reply records arrive, the client answers
//! with a ChangeCipherSpec record followed by a Finished-shaped record
//! of opaque bytes. The message carries no session material at all
//! (it is pure camouflage), so composition never consults the session.
//! The Finished body is drawn from the CSPRNG once per process and
//! cached, making repeated calls byte-identical.

use std::sync::OnceLock;

use crate::crypto::SecureRandom;
use crate::tls::{add_record_layer, ContentType, TLS12_RECORD_VERSION};

/// Size of the fake Finished record body
const FINISHED_SIZE: usize = 40;

static REPLY: OnceLock<Vec<u8>> = OnceLock::new();

/// Compose the disguised acceptance reply:
/// ChangeCipherSpec ‖ Finished-shaped record.
///
/// Always succeeds and always returns the same bytes for the lifetime
/// of the process.
pub fn compose_reply() -> &'static [u8] {
    REPLY.get_or_init(|| {
        let mut reply = add_record_layer(ContentType::ChangeCipherSpec, TLS12_RECORD_VERSION, &[0x01]);

        let mut finished = [0u8; FINISHED_SIZE];
        SecureRandom::fill(&mut finished);
        reply.extend_from_slice(&add_record_layer(
            ContentType::Handshake,
            TLS12_RECORD_VERSION,
            &finished,
        ));
        reply
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tls::RECORD_HEADER_SIZE;

    #[test]
    fn test_reply_shape() {
        let reply = compose_reply();

        // CCS record (6 bytes) + Finished record (5 + 40 bytes)
        assert_eq!(reply.len(), 6 + RECORD_HEADER_SIZE + FINISHED_SIZE);
        assert_eq!(&reply[..6], &[0x14, 0x03, 0x03, 0x00, 0x01, 0x01]);
        assert_eq!(reply[6], 0x16);
        assert_eq!(&reply[7..9], &[0x03, 0x03]);
        assert_eq!(u16::from_be_bytes([reply[9], reply[10]]), FINISHED_SIZE as u16);
    }

    #[test]
    fn test_reply_identical_across_calls() {
        let a = compose_reply().to_vec();
        let b = compose_reply().to_vec();
        assert_eq!(a, b);
    }
}
