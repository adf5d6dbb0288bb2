//! C FFI bindings for the egress visualization state buffer.
//!
//! Exposes a C-compatible API for rendering hosts that load the buffer
//! as a shared library. This is the only crate in the workspace that
//! may contain `unsafe` code, and every `unsafe` block is a pointer
//! deref or copy justified by the caller contract documented on its
//! entry point.
//!
//! # Conventions
//!
//! - All fallible functions return an `i32` [`EgressStatus`] code:
//!   `Ok` = 0, errors negative.
//! - Out-pointers are written on success only; a caller can
//!   sentinel-initialise them and trust the sentinel on error.
//! - Every entry point runs inside `ffi_guard!`, which converts a
//!   Rust panic into `Panicked` (-128) instead of unwinding into C.
//!   The panic message is retrievable via [`egress_last_panic_message`].
//!
//! [`EgressStatus`]: status::EgressStatus

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

/// Wrap an FFI entry point body in `catch_unwind`.
///
/// The body must evaluate to `i32`. A panic inside it is recorded via
/// `record_panic` and converted into `EgressStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(status) => status,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $crate::status::EgressStatus::Panicked as i32
            }
        }
    };
}

/// Like `ffi_guard!`, for entry points that return a value instead of
/// a status code. A caught panic is recorded and `$default` returned.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $default
            }
        }
    };
}

/// Lock a mutex inside an `ffi_guard!` body, reporting a poisoned
/// mutex as `InternalError` instead of unwrapping.
///
/// Evaluates to the guard on success; early-returns the status code on
/// poison, so it may only be used where the enclosing body yields `i32`.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::EgressStatus::InternalError as i32,
        }
    };
}

pub mod buffer;
mod handle;
pub mod status;

pub use buffer::EgressBufferInfo;
pub use status::EgressStatus;

thread_local! {
    /// Message of the most recent panic caught by `ffi_guard!` on
    /// this thread. Overwritten by each caught panic, never cleared.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Store a caught panic payload's message for later retrieval.
///
/// `panic!` with a literal carries `&str`; `panic!` with a format
/// string carries `String`; anything else gets a placeholder.
pub(crate) fn record_panic(payload: &(dyn Any + Send)) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic payload of unknown type".to_string()
    };
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Retrieve the message of the most recent panic caught on this thread.
///
/// Copies up to `buf_len` bytes of UTF-8 (not NUL-terminated) into
/// `buf` and returns the full message length in bytes. Pass a null
/// `buf` to query the length first. Returns 0 when no panic has been
/// caught on this thread.
///
/// Panic messages are stored per thread: call this from the thread
/// that received the `Panicked` status.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_last_panic_message(buf: *mut c_char, buf_len: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let len = msg.len().min(i32::MAX as usize) as i32;
        if !buf.is_null() && buf_len > 0 {
            let n = msg.len().min(buf_len);
            // SAFETY: buf points to buf_len writable bytes per caller contract.
            unsafe {
                std::ptr::copy_nonoverlapping(msg.as_ptr(), buf as *mut u8, n);
            }
        }
        len
    })
}

#[cfg(test)]
mod tests {
    use crate::status::EgressStatus;

    #[test]
    fn guard_converts_panic_to_status() {
        crate::LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        let status = ffi_guard!({
            panic!("literal panic message");
        });
        assert_eq!(status, EgressStatus::Panicked as i32);
    }

    #[test]
    fn guard_or_returns_default_on_panic() {
        let value: f32 = ffi_guard_or!(-1.5, {
            panic!("direct accessor panic");
        });
        assert_eq!(value, -1.5);
    }

    #[test]
    fn guard_passes_through_normal_result() {
        let status = ffi_guard!({ EgressStatus::Ok as i32 });
        assert_eq!(status, EgressStatus::Ok as i32);
    }

    #[test]
    fn caught_panic_leaves_buffers_usable() {
        let mut handle: u64 = 0;
        let status = crate::buffer::egress_buffer_create(4, 4, 1, &mut handle);
        assert_eq!(status, EgressStatus::Ok as i32);

        let _ = ffi_guard!({
            panic!("host callback blew up");
        });

        // The caught panic must not take the handle table down with it.
        let mut time = f64::NAN;
        let status = crate::buffer::egress_sim_time_get(handle, &mut time);
        assert_eq!(status, EgressStatus::Ok as i32);
        assert_eq!(time, 0.0);
        assert_eq!(
            crate::buffer::egress_buffer_destroy(handle),
            EgressStatus::Ok as i32
        );
    }

    #[test]
    fn panic_message_is_retrievable() {
        crate::LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        let _ = ffi_guard!({
            panic!("message for retrieval test");
        });

        // Length query with null buf.
        let len = crate::egress_last_panic_message(std::ptr::null_mut(), 0);
        assert!(len > 0);

        let mut buf = vec![0u8; (len as usize) + 8];
        let len2 = crate::egress_last_panic_message(
            buf.as_mut_ptr() as *mut std::ffi::c_char,
            buf.len(),
        );
        assert_eq!(len, len2, "length must be consistent between calls");
        let msg = std::str::from_utf8(&buf[..len2 as usize]).unwrap();
        assert_eq!(msg, "message for retrieval test");
    }

    #[test]
    fn panic_message_truncates_to_small_buffer() {
        crate::LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        let _ = ffi_guard!({
            panic!("0123456789");
        });

        let mut buf = [0u8; 4];
        let len =
            crate::egress_last_panic_message(buf.as_mut_ptr() as *mut std::ffi::c_char, buf.len());
        // Full length reported, only buf_len bytes written.
        assert_eq!(len, 10);
        assert_eq!(&buf, b"0123");
    }

    #[test]
    fn formatted_panic_payload_is_captured() {
        crate::LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        let code = 7;
        let _ = ffi_guard!({
            panic!("failure code {code}");
        });
        let mut buf = [0u8; 64];
        let len =
            crate::egress_last_panic_message(buf.as_mut_ptr() as *mut std::ffi::c_char, buf.len());
        let msg = std::str::from_utf8(&buf[..len as usize]).unwrap();
        assert_eq!(msg, "failure code 7");
    }

    #[test]
    fn no_panic_means_zero_length() {
        crate::LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        assert_eq!(
            crate::egress_last_panic_message(std::ptr::null_mut(), 0),
            0
        );
    }
}
