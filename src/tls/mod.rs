//! TLS message construction for the disguise layer.
//!
//! This module renders the byte-level camouflage: record-layer framing,
//! browser-imitating ClientHello messages, and the fixed acceptance
//! reply. Nothing here performs real TLS. The messages only need to
//! look like TLS to a middlebox while carrying the protocol's own
//! fields in the random and session-ticket slots.

mod hello;
mod reply;

use bytes::{BufMut, BytesMut};

pub use hello::compose_init_handshake;
pub use reply::compose_reply;

/// TLS record types
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22,
    ApplicationData = 23,
}

/// Size of a record-layer header (type + version + length)
pub const RECORD_HEADER_SIZE: usize = 5;

/// Record-layer version used on the initial hello record (TLS 1.0,
/// matching what real browsers put on the first flight)
pub const HELLO_RECORD_VERSION: [u8; 2] = [0x03, 0x01];

/// Record-layer version for every record after the hello (TLS 1.2)
pub const TLS12_RECORD_VERSION: [u8; 2] = [0x03, 0x03];

/// Wrap `payload` in a record-layer header.
pub(crate) fn add_record_layer(
    content_type: ContentType,
    version: [u8; 2],
    payload: &[u8],
) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(RECORD_HEADER_SIZE + payload.len());
    buf.put_u8(content_type as u8);
    buf.put_slice(&version);
    buf.put_u16(payload.len() as u16);
    buf.put_slice(payload);
    buf.to_vec()
}
