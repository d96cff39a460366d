//! Browser-imitating ClientHello construction.
//!
//! The hello is a fixed-size TLS ClientHello cloned from a real browser
//! fingerprint (Chrome or Firefox), with two fields repurposed:
//!
//! - the 32-byte random field carries `iv ‖ CFB(key, iv, goal)`, where
//!   `goal` is a time-bucketed hash only a passphrase holder can
//!   produce; the server unmasks it to authenticate the client;
//! - the session-ticket extension carries 192 seed-expanded bytes the
//!   server can regenerate from the same opaque tag, key and time
//!   arithmetic.
//!
//! Everything else (cipher suites, extension order, GREASE placement,
//! padding) imitates the browser byte-for-byte so the flight blends in.
//! The padding extension absorbs the server-name length, keeping the
//! handshake body at exactly 508 bytes.

use bytes::{BufMut, BytesMut};
use sha2::{Digest, Sha256};

use crate::crypto::{mask_block, seeded_bytes, SecureRandom, MASK_BLOCK_SIZE, MASK_IV_SIZE};
use crate::session::{Browser, SessionConfig};
use crate::tls::{add_record_layer, ContentType, HELLO_RECORD_VERSION};

/// TLS handshake message type for ClientHello
const HANDSHAKE_CLIENT_HELLO: u8 = 0x01;

/// Size of the legacy session id field
const SESSION_ID_SIZE: usize = 32;

/// Size of the fake session-ticket extension body
pub const SESSION_TICKET_SIZE: usize = 192;

/// The goal hash rotates every 12 hours
const GOAL_ROTATION_SECS: u64 = 12 * 60 * 60;

/// Chrome's TLS 1.2-era cipher suite list, GREASE value pinned
const CHROME_CIPHER_SUITES: &[u8] = &[
    0x2a, 0x2a, // GREASE
    0xc0, 0x2b, // TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256
    0xc0, 0x2f, // TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256
    0xc0, 0x2c, // TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384
    0xc0, 0x30, // TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384
    0xcc, 0xa9, // TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256
    0xcc, 0xa8, // TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256
    0xc0, 0x13, // TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA
    0xc0, 0x14, // TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA
    0x00, 0x9c, // TLS_RSA_WITH_AES_128_GCM_SHA256
    0x00, 0x9d, // TLS_RSA_WITH_AES_256_GCM_SHA384
    0x00, 0x2f, // TLS_RSA_WITH_AES_128_CBC_SHA
    0x00, 0x35, // TLS_RSA_WITH_AES_256_CBC_SHA
    0x00, 0x0a, // TLS_RSA_WITH_3DES_EDE_CBC_SHA
];

const FIREFOX_CIPHER_SUITES: &[u8] = &[
    0xc0, 0x2b, // TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256
    0xc0, 0x2f, // TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256
    0xcc, 0xa9, // TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256
    0xcc, 0xa8, // TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256
    0xc0, 0x2c, // TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384
    0xc0, 0x30, // TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384
    0xc0, 0x0a, // TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA
    0xc0, 0x09, // TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA
    0xc0, 0x13, // TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA
    0xc0, 0x14, // TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA
    0x00, 0x33, // TLS_DHE_RSA_WITH_AES_128_CBC_SHA
    0x00, 0x39, // TLS_DHE_RSA_WITH_AES_256_CBC_SHA
    0x00, 0x2f, // TLS_RSA_WITH_AES_128_CBC_SHA
    0x00, 0x35, // TLS_RSA_WITH_AES_256_CBC_SHA
    0x00, 0x0a, // TLS_RSA_WITH_3DES_EDE_CBC_SHA
];

/// Signature algorithms as Chrome advertises them (list length prefix
/// included in the extension body)
const CHROME_SIG_ALGOS: &[u8] = &[
    0x00, 0x12, // list length
    0x04, 0x03, 0x08, 0x04, 0x04, 0x01, 0x05, 0x03, 0x08, 0x05, 0x05, 0x01, 0x08, 0x06, 0x06,
    0x01, 0x02, 0x01,
];

const FIREFOX_SIG_ALGOS: &[u8] = &[
    0x00, 0x16, // list length
    0x04, 0x03, 0x05, 0x03, 0x06, 0x03, 0x08, 0x04, 0x08, 0x05, 0x08, 0x06, 0x04, 0x01, 0x05,
    0x01, 0x06, 0x01, 0x02, 0x03, 0x02, 0x01,
];

/// ALPN body advertising h2 and http/1.1
const ALPN_PROTOCOLS: &[u8] = &[
    0x00, 0x0c, // protocol list length
    0x02, b'h', b'2', // h2
    0x08, b'h', b't', b't', b'p', b'/', b'1', b'.', b'1', // http/1.1
];

const FIREFOX_SUPPORTED_GROUPS: &[u8] = &[
    0x00, 0x08, // list length
    0x00, 0x1d, // x25519
    0x00, 0x17, // secp256r1
    0x00, 0x18, // secp384r1
    0x00, 0x19, // secp521r1
];

/// Padding budgets: the padding extension body shrinks as the SNI
/// extension grows, keeping the handshake body length constant.
const CHROME_PADDING_BUDGET: usize = 110;
const FIREFOX_PADDING_BUDGET: usize = 121;

/// Compose the disguised initial handshake: a browser-templated
/// ClientHello wrapped in a record layer.
pub fn compose_init_handshake(config: &SessionConfig) -> Vec<u8> {
    let epoch = config.unix_time();
    let secs = epoch.as_secs();

    let (cipher_suites, extensions) = match config.browser {
        Browser::Chrome => (CHROME_CIPHER_SUITES, chrome_extensions(config, secs)),
        Browser::Firefox => (FIREFOX_CIPHER_SUITES, firefox_extensions(config, secs)),
    };

    let body = hello_body(config, epoch.as_nanos() as u64, secs, cipher_suites, &extensions);
    add_record_layer(ContentType::Handshake, HELLO_RECORD_VERSION, &body)
}

fn hello_body(
    config: &SessionConfig,
    nanos: u64,
    secs: u64,
    cipher_suites: &[u8],
    extensions: &[u8],
) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(512);

    buf.put_u8(HANDSHAKE_CLIENT_HELLO);

    // 3-byte handshake length
    let body_len =
        2 + 32 + 1 + SESSION_ID_SIZE + 2 + cipher_suites.len() + 2 + 2 + extensions.len();
    buf.put_u8((body_len >> 16) as u8);
    buf.put_u16((body_len & 0xffff) as u16);

    // Legacy client version (TLS 1.2)
    buf.put_slice(&[0x03, 0x03]);

    // Random field with the masked goal hash
    buf.put_slice(&random_field(config, secs));

    // Session id: time-seeded filler, fresh-looking but cheap
    buf.put_u8(SESSION_ID_SIZE as u8);
    buf.put_slice(&seeded_bytes(nanos, SESSION_ID_SIZE));

    buf.put_u16(cipher_suites.len() as u16);
    buf.put_slice(cipher_suites);

    // Null compression only
    buf.put_u8(1);
    buf.put_u8(0);

    buf.put_u16(extensions.len() as u16);
    buf.put_slice(extensions);

    buf.to_vec()
}

/// Build the 32-byte random field: `iv(16) ‖ CFB(key, iv, goal[..16])`.
///
/// The goal is `SHA-256(bucket ‖ passphrase)` where `bucket` is the
/// decimal Unix time divided into 12-hour windows, so a captured hello
/// cannot be replayed indefinitely.
fn random_field(config: &SessionConfig, secs: u64) -> [u8; 32] {
    let bucket = secs / GOAL_ROTATION_SECS;

    let mut hasher = Sha256::new();
    hasher.update(bucket.to_string().as_bytes());
    hasher.update(config.passphrase().as_bytes());
    let goal: [u8; 32] = hasher.finalize().into();

    let mut goal_block = [0u8; MASK_BLOCK_SIZE];
    goal_block.copy_from_slice(&goal[..MASK_BLOCK_SIZE]);

    let iv: [u8; MASK_IV_SIZE] = SecureRandom::bytes();
    let masked = mask_block(config.session_key(), &iv, &goal_block);

    let mut field = [0u8; 32];
    field[..MASK_IV_SIZE].copy_from_slice(&iv);
    field[MASK_IV_SIZE..].copy_from_slice(&masked);
    field
}

/// Fake session ticket: seed-expanded bytes the server regenerates from
/// the opaque tag, the key fold and the ticket time window.
fn session_ticket(config: &SessionConfig, secs: u64) -> Vec<u8> {
    let seed = config
        .opaque_seed()
        .wrapping_add(config.session_key().seed_fold())
        .wrapping_add(secs / config.ticket_time_hint);
    seeded_bytes(seed, SESSION_TICKET_SIZE)
}

/// A Chrome GREASE value: a random nibble doubled into both bytes,
/// low nibble 0xA.
fn grease() -> u16 {
    let b = (SecureRandom::u64() % 16) as u8 * 16 + 0x0a;
    u16::from_be_bytes([b, b])
}

/// Extension record: type, length, body.
fn ext_record(ext_type: u16, data: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(4 + data.len());
    buf.put_u16(ext_type);
    buf.put_u16(data.len() as u16);
    buf.put_slice(data);
    buf.to_vec()
}

/// SNI extension body: server name list with a single host_name entry.
fn server_name_indication(name: &str) -> Vec<u8> {
    let name_bytes = name.as_bytes();
    let mut buf = BytesMut::with_capacity(5 + name_bytes.len());
    buf.put_u16((3 + name_bytes.len()) as u16); // server name list length
    buf.put_u8(0x00); // host_name
    buf.put_u16(name_bytes.len() as u16);
    buf.put_slice(name_bytes);
    buf.to_vec()
}

fn chrome_supported_groups() -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(10);
    buf.put_u16(0x0008); // list length
    buf.put_u16(grease());
    buf.put_slice(&[
        0x00, 0x1d, // x25519
        0x00, 0x17, // secp256r1
        0x00, 0x18, // secp384r1
    ]);
    buf.to_vec()
}

fn chrome_extensions(config: &SessionConfig, secs: u64) -> Vec<u8> {
    let sni = ext_record(0x0000, &server_name_indication(&config.server_name));
    let padding = vec![0u8; CHROME_PADDING_BUDGET.saturating_sub(sni.len())];

    let mut ext = BytesMut::with_capacity(512);
    ext.put_slice(&ext_record(grease(), &[])); // leading GREASE
    ext.put_slice(&ext_record(0xff01, &[0x00])); // renegotiation_info
    ext.put_slice(&sni);
    ext.put_slice(&ext_record(0x0017, &[])); // extended_master_secret
    ext.put_slice(&ext_record(0x0023, &session_ticket(config, secs)));
    ext.put_slice(&ext_record(0x000d, CHROME_SIG_ALGOS));
    ext.put_slice(&ext_record(0x0005, &[0x01, 0x00, 0x00, 0x00, 0x00])); // status_request
    ext.put_slice(&ext_record(0x0012, &[])); // signed_certificate_timestamp
    ext.put_slice(&ext_record(0x0010, ALPN_PROTOCOLS));
    ext.put_slice(&ext_record(0x7550, &[])); // channel_id
    ext.put_slice(&ext_record(0x000b, &[0x01, 0x00])); // ec_point_formats
    ext.put_slice(&ext_record(0x000a, &chrome_supported_groups()));
    ext.put_slice(&ext_record(grease(), &[0x00])); // trailing GREASE
    ext.put_slice(&ext_record(0x0015, &padding));
    ext.to_vec()
}

fn firefox_extensions(config: &SessionConfig, secs: u64) -> Vec<u8> {
    let sni = ext_record(0x0000, &server_name_indication(&config.server_name));
    let padding = vec![0u8; FIREFOX_PADDING_BUDGET.saturating_sub(sni.len())];

    let mut ext = BytesMut::with_capacity(512);
    ext.put_slice(&sni);
    ext.put_slice(&ext_record(0x0017, &[])); // extended_master_secret
    ext.put_slice(&ext_record(0xff01, &[0x00])); // renegotiation_info
    ext.put_slice(&ext_record(0x000a, FIREFOX_SUPPORTED_GROUPS));
    ext.put_slice(&ext_record(0x000b, &[0x01, 0x00])); // ec_point_formats
    ext.put_slice(&ext_record(0x0023, &session_ticket(config, secs)));
    ext.put_slice(&ext_record(0x0010, ALPN_PROTOCOLS));
    ext.put_slice(&ext_record(0x0005, &[0x01, 0x00, 0x00, 0x00, 0x00])); // status_request
    ext.put_slice(&ext_record(0x000d, FIREFOX_SIG_ALGOS));
    ext.put_slice(&ext_record(0x0015, &padding));
    ext.to_vec()
}
