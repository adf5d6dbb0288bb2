//! Buffer configuration, validation, and error types.
//!
//! [`BufferConfig`] carries the raw dimensions a host supplies, signed
//! the way they arrive across a C boundary. [`BufferConfig::validate`]
//! checks them and converts to the unsigned internal [`BufferShape`]
//! exactly once; everything downstream works with the validated shape.

use std::error::Error;
use std::fmt;

use egress_core::GridDims;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`BufferConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid width is zero or negative.
    NonPositiveWidth {
        /// The rejected value.
        value: i32,
    },
    /// Grid height is zero or negative.
    NonPositiveHeight {
        /// The rejected value.
        value: i32,
    },
    /// Agent count is negative.
    NegativeAgentCount {
        /// The rejected value.
        value: i32,
    },
    /// `width * height` exceeds `u32::MAX` cells.
    CellCountOverflow {
        /// The value that overflowed.
        value: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveWidth { value } => {
                write!(f, "grid width must be positive, got {value}")
            }
            Self::NonPositiveHeight { value } => {
                write!(f, "grid height must be positive, got {value}")
            }
            Self::NegativeAgentCount { value } => {
                write!(f, "agent count must be non-negative, got {value}")
            }
            Self::CellCountOverflow { value } => {
                write!(f, "cell count {value} exceeds u32::MAX")
            }
        }
    }
}

impl Error for ConfigError {}

// ── BufferConfig ───────────────────────────────────────────────────

/// Configuration for a [`StateBuffer`](crate::StateBuffer).
///
/// Fields are signed because this is what hosts naturally pass across
/// the C boundary; negative and zero values are caught by
/// [`BufferConfig::validate`] rather than trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Congestion grid width in cells.
    pub width: i32,
    /// Congestion grid height in cells.
    pub height: i32,
    /// Number of agents tracked by the buffer. Zero is valid.
    pub agent_count: i32,
}

impl BufferConfig {
    /// Create a configuration. Validation happens in
    /// [`BufferConfig::validate`], not here.
    pub fn new(width: i32, height: i32, agent_count: i32) -> Self {
        Self {
            width,
            height,
            agent_count,
        }
    }

    /// Validate all structural invariants and convert to the internal
    /// shape.
    ///
    /// Checks, in order: width positive, height positive, agent count
    /// non-negative, total cell count fits in `u32`.
    pub fn validate(&self) -> Result<BufferShape, ConfigError> {
        if self.width <= 0 {
            return Err(ConfigError::NonPositiveWidth { value: self.width });
        }
        if self.height <= 0 {
            return Err(ConfigError::NonPositiveHeight { value: self.height });
        }
        if self.agent_count < 0 {
            return Err(ConfigError::NegativeAgentCount {
                value: self.agent_count,
            });
        }
        let dims = GridDims::new(self.width as u32, self.height as u32);
        if u32::try_from(dims.cell_count()).is_err() {
            return Err(ConfigError::CellCountOverflow {
                value: dims.cell_count(),
            });
        }
        Ok(BufferShape {
            dims,
            agent_count: self.agent_count as usize,
        })
    }
}

/// The validated internal shape of a buffer.
///
/// Produced only by [`BufferConfig::validate`]; holding one is proof
/// that the dimensions passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferShape {
    /// Congestion grid dimensions.
    pub dims: GridDims,
    /// Number of agents.
    pub agent_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_valid_config_succeeds() {
        let shape = BufferConfig::new(10, 10, 3).validate().unwrap();
        assert_eq!(shape.dims, GridDims::new(10, 10));
        assert_eq!(shape.agent_count, 3);
    }

    #[test]
    fn validate_zero_agents_succeeds() {
        let shape = BufferConfig::new(4, 4, 0).validate().unwrap();
        assert_eq!(shape.agent_count, 0);
    }

    #[test]
    fn validate_zero_width_fails() {
        match BufferConfig::new(0, 10, 3).validate() {
            Err(ConfigError::NonPositiveWidth { value: 0 }) => {}
            other => panic!("expected NonPositiveWidth, got {other:?}"),
        }
    }

    #[test]
    fn validate_negative_width_fails() {
        match BufferConfig::new(-5, 10, 3).validate() {
            Err(ConfigError::NonPositiveWidth { value: -5 }) => {}
            other => panic!("expected NonPositiveWidth, got {other:?}"),
        }
    }

    #[test]
    fn validate_zero_height_fails() {
        match BufferConfig::new(10, 0, 3).validate() {
            Err(ConfigError::NonPositiveHeight { value: 0 }) => {}
            other => panic!("expected NonPositiveHeight, got {other:?}"),
        }
    }

    #[test]
    fn validate_negative_agent_count_fails() {
        match BufferConfig::new(10, 10, -1).validate() {
            Err(ConfigError::NegativeAgentCount { value: -1 }) => {}
            other => panic!("expected NegativeAgentCount, got {other:?}"),
        }
    }

    #[test]
    fn validate_cell_count_overflow_fails() {
        // 100_000 * 100_000 = 1e10 cells, above u32::MAX.
        match BufferConfig::new(100_000, 100_000, 0).validate() {
            Err(ConfigError::CellCountOverflow { value }) => {
                assert_eq!(value, 10_000_000_000);
            }
            other => panic!("expected CellCountOverflow, got {other:?}"),
        }
    }

    #[test]
    fn validate_width_checked_before_height() {
        // Both invalid: the width error wins.
        match BufferConfig::new(0, 0, -1).validate() {
            Err(ConfigError::NonPositiveWidth { .. }) => {}
            other => panic!("expected NonPositiveWidth, got {other:?}"),
        }
    }

    #[test]
    fn config_error_display_names_the_value() {
        let err = ConfigError::NegativeAgentCount { value: -7 };
        let msg = format!("{err}");
        assert!(msg.contains("agent count"));
        assert!(msg.contains("-7"));
    }
}
