//! # quietwire
//!
//! Client-side bootstrap for a TLS-camouflaged transport: configure a
//! session from an option string, emit a browser-imitating ClientHello,
//! answer the server's reply flight, then frame application data as
//! TLS records. The crate is consumed either as a Rust library or
//! through its C exports (`qw_setopt` / `qw_make_hello` /
//! `qw_make_reply`).
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  C surface (qw_* exports, single locked session slot)   │
//! ├─────────────────────────────────────────────────────────┤
//! │  Session (options, opaque tag, derived key, clock)      │
//! ├─────────────────────────────────────────────────────────┤
//! │  TLS disguise (hello templates, reply, record framing)  │
//! ├─────────────────────────────────────────────────────────┤
//! │  Record codec (handshake states, data chunking)         │
//! ├─────────────────────────────────────────────────────────┤
//! │  Crypto (SHA-256 KDF, HKDF expansion, AES-CFB mask)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Goals
//!
//! 1. **Blend in**: every outbound flight is byte-shaped like a real
//!    browser's TLS traffic
//! 2. **Whole-or-nothing configure**: a failed configure never
//!    disturbs an installed session
//! 3. **No hidden state in the library**: sessions are values; only
//!    the C surface keeps a (locked) slot

#![warn(missing_docs, rust_2018_idioms)]

pub mod codec;
pub mod crypto;
pub mod error;
pub mod session;
pub mod tls;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use error::{Error, Result};
pub use session::{Browser, ClientSession, SessionConfig, SessionOptions};
