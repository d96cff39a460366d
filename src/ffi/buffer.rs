//! Boundary buffer export.
//!
//! Composed messages cross the C boundary as `(pointer, length)` pairs.
//! The crate allocates and copies; the caller owns the result and must
//! release it with [`qw_free_buffer`]. The exported buffer shares no
//! storage with anything inside the crate.

use std::os::raw::c_char;
use std::ptr;

/// Hand `bytes` to the caller as an owned buffer.
///
/// # Safety
///
/// `data` and `out_len` must be writable pointers.
pub(crate) unsafe fn export(bytes: Vec<u8>, data: *mut *mut c_char, out_len: *mut usize) {
    let boxed = bytes.into_boxed_slice();
    *out_len = boxed.len();
    *data = Box::into_raw(boxed) as *mut c_char;
}

/// Signal "no output" with a null buffer and zero length.
///
/// # Safety
///
/// `data` and `out_len` must be writable pointers.
pub(crate) unsafe fn export_empty(data: *mut *mut c_char, out_len: *mut usize) {
    *data = ptr::null_mut();
    *out_len = 0;
}

/// Release a buffer previously returned by a compose export.
///
/// # Safety
///
/// `data` must be null or a `(data, len)` pair returned by this
/// library and not previously freed.
#[no_mangle]
pub unsafe extern "C" fn qw_free_buffer(data: *mut c_char, len: usize) {
    if !data.is_null() {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
            data as *mut u8,
            len,
        )));
    }
}
