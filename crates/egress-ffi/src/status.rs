//! Status codes returned by every fallible FFI entry point.

use egress_core::UpdateError;
use egress_state::ConfigError;

/// Result of an FFI call, returned as `i32` across the C boundary.
///
/// `Ok` is zero; every failure is negative, so `status < 0` is a
/// sufficient error check on the C side. The numeric values are part
/// of the ABI and must never change.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EgressStatus {
    /// The call succeeded.
    Ok = 0,
    /// The buffer handle does not refer to a live buffer.
    InvalidHandle = -1,
    /// A pointer argument was null or otherwise unusable.
    InvalidArgument = -2,
    /// Buffer creation was given non-positive dimensions or a negative
    /// agent count.
    ConfigError = -3,
    /// An update payload slice had the wrong length for the buffer's
    /// shape.
    SizeMismatch = -4,
    /// An agent ID or cell coordinate was outside the buffer's range.
    OutOfRange = -5,
    /// A caller-provided output buffer is too small for the data.
    BufferTooSmall = -6,
    /// Internal state was unusable (e.g. a poisoned lock).
    InternalError = -7,
    /// The call panicked; see
    /// [`egress_last_panic_message`](crate::egress_last_panic_message).
    Panicked = -128,
}

impl From<&ConfigError> for EgressStatus {
    fn from(_: &ConfigError) -> Self {
        EgressStatus::ConfigError
    }
}

impl From<&UpdateError> for EgressStatus {
    fn from(err: &UpdateError) -> Self {
        match err {
            UpdateError::SizeMismatch { .. } => EgressStatus::SizeMismatch,
        }
    }
}
