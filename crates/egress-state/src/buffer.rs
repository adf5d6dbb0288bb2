//! The double-buffered state store.

use egress_core::{Generation, GridDims, UpdateError, UpdateInput};

use crate::bank::StateBank;
use crate::config::{BufferConfig, ConfigError};
use crate::frame::{Frame, OwnedFrame};

/// One simulation tick's payload.
///
/// Borrowed views into host-owned arrays; nothing is retained after
/// [`StateBuffer::apply`] returns.
#[derive(Clone, Copy, Debug)]
pub struct StateUpdate<'a> {
    /// Simulation time in seconds.
    pub time: f64,
    /// Interleaved `[x0, y0, x1, y1, ...]`; length `2 * agent_count`.
    pub positions: &'a [f32],
    /// Per-agent flags, nonzero meaning evacuated; length `agent_count`.
    pub evacuated: &'a [u8],
    /// Row-major congestion grid; length `width * height`. Values are
    /// copied verbatim — the buffer never clamps or interprets them.
    pub congestion: &'a [f32],
}

/// Double-buffered store for one evacuation visualization.
///
/// The writer side is `&mut self` ([`StateBuffer::apply`],
/// [`StateBuffer::reset`]), so exactly one writer exists at compile
/// time and no frame can be alive across an update. `apply` stages into
/// the back bank and publishes by swapping, which keeps the published
/// bank immutable between publishes — a reader never sees a
/// half-written tick even when the buffer sits behind a lock shared
/// with other threads.
///
/// Dimensions and agent count are fixed from construction until drop.
/// Both banks are allocated up front; `apply` and `reset` never
/// allocate.
pub struct StateBuffer {
    /// State bank A.
    bank_a: StateBank,
    /// State bank B.
    bank_b: StateBank,
    /// Which bank stages the next update (false = A, true = B).
    b_is_staging: bool,
    /// Congestion grid shape, fixed at construction.
    dims: GridDims,
    /// Number of agents, fixed at construction.
    agent_count: usize,
    /// Publish counter; equals the number of updates applied since
    /// construction or the last reset.
    generation: Generation,
    /// The configuration the buffer was built from.
    config: BufferConfig,
}

impl StateBuffer {
    /// Create a buffer from a configuration.
    ///
    /// Validates the configuration, then allocates both banks zeroed:
    /// every agent at the origin with its flag clear, every cell `0.0`,
    /// time `0.0`. The published frame is readable immediately.
    pub fn new(config: BufferConfig) -> Result<Self, ConfigError> {
        let shape = config.validate()?;
        let bank = StateBank::zeroed(shape.agent_count, shape.dims.cell_count());
        Ok(Self {
            bank_a: bank.clone(),
            bank_b: bank,
            b_is_staging: false,
            dims: shape.dims,
            agent_count: shape.agent_count,
            generation: Generation(0),
            config,
        })
    }

    /// Validate and publish one tick's worth of state.
    ///
    /// All three input lengths are checked before anything is copied;
    /// on a mismatch the buffer is untouched and the previously
    /// published frame stays readable. On success the staged bank
    /// becomes the published bank and the generation advances.
    ///
    /// Returns the generation of the newly published frame.
    pub fn apply(&mut self, update: StateUpdate<'_>) -> Result<Generation, UpdateError> {
        check_len(
            UpdateInput::Positions,
            self.agent_count * 2,
            update.positions.len(),
        )?;
        check_len(
            UpdateInput::Evacuated,
            self.agent_count,
            update.evacuated.len(),
        )?;
        check_len(
            UpdateInput::Congestion,
            self.dims.cell_count(),
            update.congestion.len(),
        )?;

        let staging = if self.b_is_staging {
            &mut self.bank_b
        } else {
            &mut self.bank_a
        };
        staging.stage(
            update.time,
            update.positions,
            update.evacuated,
            update.congestion,
        );

        // Swap roles: the staged bank becomes the published bank.
        self.b_is_staging = !self.b_is_staging;
        self.generation = Generation(self.generation.0 + 1);
        Ok(self.generation)
    }

    /// Borrowed read-only view of the published bank.
    pub fn frame(&self) -> Frame<'_> {
        Frame::new(self.published_bank(), self.dims, self.generation)
    }

    /// Owned, thread-safe copy of the published bank.
    ///
    /// Unlike [`StateBuffer::frame`], the returned [`OwnedFrame`] clones
    /// the published data and can cross thread boundaries; later updates
    /// to this buffer do not affect it. This is the one
    /// post-construction operation that allocates.
    pub fn owned_frame(&self) -> OwnedFrame {
        OwnedFrame::new(self.published_bank().clone(), self.dims, self.generation)
    }

    /// Restore the post-construction state in place.
    ///
    /// Dimensions and agent count are untouched; both banks are zeroed
    /// and the generation restarts from zero. Nothing is reallocated.
    pub fn reset(&mut self) {
        self.bank_a.reset();
        self.bank_b.reset();
        self.b_is_staging = false;
        self.generation = Generation(0);
    }

    /// The configuration this buffer was built from.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Congestion grid shape.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Number of agents tracked by the buffer.
    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    /// Publish counter; equals the number of updates applied since
    /// construction or the last [`StateBuffer::reset`].
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Heap bytes held by both banks.
    pub fn memory_bytes(&self) -> usize {
        self.bank_a.memory_bytes() + self.bank_b.memory_bytes()
    }

    fn published_bank(&self) -> &StateBank {
        if self.b_is_staging {
            &self.bank_a
        } else {
            &self.bank_b
        }
    }
}

fn check_len(input: UpdateInput, expected: usize, actual: usize) -> Result<(), UpdateError> {
    if expected == actual {
        Ok(())
    } else {
        Err(UpdateError::SizeMismatch {
            input,
            expected,
            actual,
        })
    }
}
