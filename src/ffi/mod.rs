//! C-callable exports for embedding the bootstrap in non-Rust hosts.
//!
//! The surface mirrors the classic obfuscation-plugin shape: one
//! implicit client session configured by `qw_setopt`, interrogated by
//! `qw_make_hello` / `qw_make_reply`. The session slot is guarded by a
//! mutex, so the exports may be called from any thread.
//!
//! ## Memory
//!
//! Every buffer handed out by the compose functions is an independent
//! copy owned by the caller; release it with `qw_free_buffer`. Strings
//! returned by `qw_version` are static and must not be freed.

mod buffer;

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::sync::Mutex;

use crate::session::ClientSession;
use crate::tls;

pub use buffer::qw_free_buffer;

/// Status code for a successful configure.
pub const QW_OK: c_int = 0;
/// Status code for a rejected option string.
pub const QW_ERR_CONFIG: c_int = 1;

/// The single session behind the C surface. Exclusive lock for
/// configure/reset, held across hello composition.
static SESSION: Mutex<ClientSession> = Mutex::new(ClientSession::new());

fn lock_session() -> std::sync::MutexGuard<'static, ClientSession> {
    // A poisoned lock only means a panic mid-compose; the session
    // state itself is still coherent
    SESSION.lock().unwrap_or_else(|e| e.into_inner())
}

/// Initialize library logging.
///
/// Idempotent; safe to call more than once. Honors `RUST_LOG`.
#[no_mangle]
pub extern "C" fn qw_init() -> c_int {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    });
    QW_OK
}

/// Configure the session from an option string.
///
/// Writes `QW_ERR_CONFIG` to `*err` up front and `QW_OK` only after
/// the new configuration is installed; a failure leaves any previous
/// configuration in place.
///
/// # Safety
///
/// `opt` must be null or a valid null-terminated C string; `err` must
/// be null or a writable pointer.
#[no_mangle]
pub unsafe extern "C" fn qw_setopt(opt: *const c_char, err: *mut c_int) {
    if err.is_null() {
        return;
    }
    *err = QW_ERR_CONFIG;

    if opt.is_null() {
        return;
    }
    let opt = match CStr::from_ptr(opt).to_str() {
        Ok(s) => s,
        Err(_) => return,
    };

    match lock_session().configure(opt) {
        Ok(()) => *err = QW_OK,
        Err(e) => tracing::warn!("rejected options: {}", e),
    }
}

/// Drop the current configuration.
#[no_mangle]
pub extern "C" fn qw_freeopt() {
    lock_session().reset();
}

/// Compose the disguised initial handshake.
///
/// On success `*data` points to a caller-owned buffer of `*out_len`
/// bytes. Before any successful `qw_setopt`, `*data` is null and
/// `*out_len` is zero.
///
/// # Safety
///
/// `data` and `out_len` must be writable pointers.
#[no_mangle]
pub unsafe extern "C" fn qw_make_hello(data: *mut *mut c_char, out_len: *mut usize) {
    if data.is_null() || out_len.is_null() {
        return;
    }
    match lock_session().compose_hello() {
        Ok(hello) => buffer::export(hello, data, out_len),
        Err(_) => buffer::export_empty(data, out_len),
    }
}

/// Compose the disguised acceptance reply.
///
/// Always succeeds; the bytes are identical on every call and do not
/// depend on the session state.
///
/// # Safety
///
/// `data` and `out_len` must be writable pointers.
#[no_mangle]
pub unsafe extern "C" fn qw_make_reply(data: *mut *mut c_char, out_len: *mut usize) {
    if data.is_null() || out_len.is_null() {
        return;
    }
    buffer::export(tls::compose_reply().to_vec(), data, out_len);
}

/// Get the library version string.
///
/// Caller must not free the returned pointer.
#[no_mangle]
pub extern "C" fn qw_version() -> *const c_char {
    static VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr() as *const c_char
}
