//! Session configuration: option parsing and the configured state.

use std::fs;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use zeroize::ZeroizeOnDrop;

use crate::crypto::{be_fold, passphrase_key, SecureRandom, SessionKey, OPAQUE_TAG_SIZE};
use crate::error::{Error, Result};

/// Fallback ticket lifetime hint in seconds, applied when the option
/// is zero or not a number.
pub const DEFAULT_TICKET_TIME_HINT: u64 = 3600;

/// Injectable clock. Production code passes `SystemTime::now`; tests
/// substitute a fixed function to pin time-derived fields.
pub type TimeSource = fn() -> SystemTime;

/// Browser fingerprint template to imitate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Firefox,
}

impl Browser {
    /// Select the template by name. Only the exact string `"chrome"`
    /// selects Chrome; everything else falls back to Firefox.
    pub fn from_name(name: &str) -> Self {
        if name == "chrome" {
            Browser::Chrome
        } else {
            Browser::Firefox
        }
    }
}

/// Raw option fields, before a session is built from them.
///
/// Accepted in two shapes: an inline `Field=value;Field=value` string,
/// or a path to a JSON file with the same PascalCase field names.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionOptions {
    /// SNI hostname to imitate
    pub server_name: String,
    /// Shared passphrase the symmetric key is derived from
    pub key: String,
    /// Ticket lifetime hint in seconds
    #[serde(default)]
    pub ticket_time_hint: u64,
    /// Browser template name
    pub browser: String,
}

impl std::fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOptions")
            .field("server_name", &self.server_name)
            .field("key", &"..")
            .field("ticket_time_hint", &self.ticket_time_hint)
            .field("browser", &self.browser)
            .finish()
    }
}

impl SessionOptions {
    /// Parse an option string.
    ///
    /// A string containing `;` is parsed inline; anything else is
    /// treated as a path to a JSON options file.
    pub fn parse(opt: &str) -> Result<Self> {
        let mut options = if opt.contains(';') {
            Self::parse_inline(opt)?
        } else {
            Self::parse_file(opt)?
        };
        if options.ticket_time_hint == 0 {
            options.ticket_time_hint = DEFAULT_TICKET_TIME_HINT;
        }
        Ok(options)
    }

    fn parse_inline(opt: &str) -> Result<Self> {
        let mut server_name = None;
        let mut key = None;
        let mut ticket_time_hint = None;
        let mut browser = None;

        for segment in opt.split(';') {
            // Segments without '=' and unknown fields are ignored
            let Some((field, value)) = segment.split_once('=') else {
                continue;
            };
            match field {
                "ServerName" => server_name = Some(value.to_string()),
                "Key" => key = Some(value.to_string()),
                // Mirrors C atoi: garbage reads as 0, normalized later
                "TicketTimeHint" => ticket_time_hint = Some(value.parse().unwrap_or(0)),
                "Browser" => browser = Some(value.to_string()),
                _ => {}
            }
        }

        let require = |name: &str, value: Option<String>| {
            value.ok_or_else(|| Error::config(format!("missing option {}", name)))
        };

        Ok(Self {
            server_name: require("ServerName", server_name)?,
            key: require("Key", key)?,
            ticket_time_hint: ticket_time_hint
                .ok_or_else(|| Error::config("missing option TicketTimeHint"))?,
            browser: require("Browser", browser)?,
        })
    }

    fn parse_file(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read options file {}: {}", path, e)))?;
        serde_json::from_str(&data)
            .map_err(|e| Error::config(format!("malformed options file {}: {}", path, e)))
    }
}

/// A fully configured client session.
///
/// Built whole from parsed options: the opaque tag is drawn and the
/// symmetric key derived before the value exists, so holding a
/// `SessionConfig` implies a valid key.
#[derive(ZeroizeOnDrop)]
pub struct SessionConfig {
    /// Local/remote endpoint strings. Unused in the shim configuration
    /// path; the embedding transport fills them in.
    #[zeroize(skip)]
    pub local_host: String,
    #[zeroize(skip)]
    pub local_port: String,
    #[zeroize(skip)]
    pub remote_host: String,
    #[zeroize(skip)]
    pub remote_port: String,

    /// SNI hostname to imitate
    #[zeroize(skip)]
    pub server_name: String,
    /// Ticket lifetime hint in seconds, always nonzero
    #[zeroize(skip)]
    pub ticket_time_hint: u64,
    /// Browser template
    #[zeroize(skip)]
    pub browser: Browser,

    // Shared passphrase, retained for the goal hash
    key: String,
    /// Per-session opaque tag, 32 random bytes
    #[zeroize(skip)]
    opaque: [u8; OPAQUE_TAG_SIZE],
    /// Injected clock
    #[zeroize(skip)]
    now: TimeSource,
    // SessionKey zeroizes itself on drop
    #[zeroize(skip)]
    session_key: SessionKey,
}

impl SessionConfig {
    /// Build a configuration from parsed options: draw a fresh opaque
    /// tag and derive the symmetric key.
    pub fn build(options: SessionOptions, now: TimeSource) -> Self {
        let session_key = passphrase_key(&options.key);
        Self {
            local_host: String::new(),
            local_port: String::new(),
            remote_host: String::new(),
            remote_port: String::new(),
            server_name: options.server_name,
            // Nonzero whatever path the options took; the hint divides
            // the clock in seed arithmetic
            ticket_time_hint: match options.ticket_time_hint {
                0 => DEFAULT_TICKET_TIME_HINT,
                hint => hint,
            },
            browser: Browser::from_name(&options.browser),
            key: options.key,
            opaque: SecureRandom::bytes(),
            now,
            session_key,
        }
    }

    /// The shared passphrase.
    pub fn passphrase(&self) -> &str {
        &self.key
    }

    /// The derived symmetric key.
    pub fn session_key(&self) -> &SessionKey {
        &self.session_key
    }

    /// The raw opaque tag bytes.
    pub fn opaque_tag(&self) -> &[u8; OPAQUE_TAG_SIZE] {
        &self.opaque
    }

    /// Integer interpretation of the opaque tag for seed arithmetic.
    pub fn opaque_seed(&self) -> u64 {
        be_fold(&self.opaque)
    }

    /// Current time as a duration since the Unix epoch, read from the
    /// injected clock.
    pub fn unix_time(&self) -> Duration {
        (self.now)()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}
