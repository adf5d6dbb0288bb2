//! Error types shared across the egress workspace.

use std::error::Error;
use std::fmt;

/// Which input slice of an update failed length validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateInput {
    /// Interleaved `[x0, y0, x1, y1, ...]` agent positions.
    Positions,
    /// Per-agent evacuated flags.
    Evacuated,
    /// Row-major congestion grid.
    Congestion,
}

impl fmt::Display for UpdateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positions => write!(f, "positions"),
            Self::Evacuated => write!(f, "evacuated"),
            Self::Congestion => write!(f, "congestion"),
        }
    }
}

/// Errors from applying an update to a state buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateError {
    /// An input slice length does not match the buffer's configured
    /// shape. Nothing was copied: the previously published frame stays
    /// intact and readable.
    SizeMismatch {
        /// The offending input slice.
        input: UpdateInput,
        /// Length implied by the buffer configuration.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch {
                input,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{input} input has length {actual}, expected {expected}"
                )
            }
        }
    }
}

impl Error for UpdateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mismatch_display_names_the_input() {
        let err = UpdateError::SizeMismatch {
            input: UpdateInput::Positions,
            expected: 6,
            actual: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains("positions"));
        assert!(msg.contains('6'));
        assert!(msg.contains('4'));
    }

    #[test]
    fn update_error_is_std_error() {
        fn takes_error(_: &dyn Error) {}
        takes_error(&UpdateError::SizeMismatch {
            input: UpdateInput::Congestion,
            expected: 100,
            actual: 99,
        });
    }
}
