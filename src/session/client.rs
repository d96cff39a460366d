//! Client session state machine.

use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::session::config::{SessionConfig, SessionOptions, TimeSource};
use crate::tls;

/// A client bootstrap session.
///
/// Holds at most one [`SessionConfig`]; a successful `configure`
/// replaces the previous one wholesale, a failed one leaves it
/// untouched. There is no global state: callers own the session value
/// (the C surface keeps exactly one behind a lock).
pub struct ClientSession {
    config: Option<SessionConfig>,
}

impl ClientSession {
    /// Create an unconfigured session.
    pub const fn new() -> Self {
        Self { config: None }
    }

    /// Whether a successful `configure` has installed a config.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// The current configuration, if any.
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// Configure the session from an option string, using the system
    /// clock for time-derived handshake fields.
    pub fn configure(&mut self, opt: &str) -> Result<()> {
        self.configure_at(opt, SystemTime::now)
    }

    /// Configure with an explicit time source.
    ///
    /// The new configuration is built completely (options parsed,
    /// opaque tag drawn, key derived) before it replaces the current
    /// one, so any failure leaves the session exactly as it was.
    pub fn configure_at(&mut self, opt: &str, now: TimeSource) -> Result<()> {
        let options = SessionOptions::parse(opt)?;
        let config = SessionConfig::build(options, now);
        tracing::debug!(
            server_name = %config.server_name,
            browser = ?config.browser,
            "client session configured"
        );
        self.config = Some(config);
        Ok(())
    }

    /// Drop the current configuration, returning to the unconfigured
    /// state.
    pub fn reset(&mut self) {
        if self.config.take().is_some() {
            tracing::debug!("client session reset");
        }
    }

    /// Compose the disguised initial handshake for the current
    /// configuration.
    pub fn compose_hello(&self) -> Result<Vec<u8>> {
        let config = self.config.as_ref().ok_or(Error::NotConfigured)?;
        Ok(tls::compose_init_handshake(config))
    }

    /// Compose the disguised acceptance reply.
    ///
    /// Valid in any state: the reply is a fixed per-process template
    /// and does not consult the configuration.
    pub fn compose_reply(&self) -> Vec<u8> {
        tls::compose_reply().to_vec()
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}
