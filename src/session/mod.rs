//! Client session bootstrap.
//!
//! A session is configured once from an option string, which draws a
//! fresh 32-byte opaque tag and derives the symmetric key from the
//! shared passphrase. The configured session then composes the two
//! client-side flights of the disguised handshake: the initial hello
//! and the acceptance reply.
//!
//! ## Bootstrap flow
//!
//! ```text
//! Client                                   Server
//!   |                                        |
//!   |  ClientHello (masked goal + ticket)    |
//!   |--------------------------------------->|
//!   |        ServerHello / CCS / Ticket (3)  |
//!   |<---------------------------------------|
//!   |  CCS + Finished-shaped reply           |
//!   |--------------------------------------->|
//!   |                                        |
//!   |====== application data records ========|
//! ```

mod client;
mod config;

pub use client::ClientSession;
pub use config::{Browser, SessionConfig, SessionOptions, TimeSource, DEFAULT_TICKET_TIME_HINT};
