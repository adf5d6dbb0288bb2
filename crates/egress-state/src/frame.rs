//! Read-only frame views over the published bank.
//!
//! [`Frame`] borrows from a [`crate::StateBuffer`] and is the primary
//! query interface for render loops. [`OwnedFrame`] clones the
//! published data for use across thread boundaries. Both implement
//! [`FrameAccess`], where the point-query policy lives.

use egress_core::{Agent, FrameAccess, Generation, GridDims};

use crate::bank::StateBank;

/// A read-only view of the published bank.
///
/// # Lifetime
///
/// `'a` is the borrow of the `StateBuffer`. Because updates take
/// `&mut self` on the buffer, no frame can be alive across an `apply`
/// — the data under a frame never changes.
pub struct Frame<'a> {
    /// The published bank.
    bank: &'a StateBank,
    /// Congestion grid shape.
    dims: GridDims,
    /// Publish counter at view creation.
    generation: Generation,
}

impl<'a> Frame<'a> {
    /// Create a new frame view.
    pub(crate) fn new(bank: &'a StateBank, dims: GridDims, generation: Generation) -> Self {
        Self {
            bank,
            dims,
            generation,
        }
    }
}

impl FrameAccess for Frame<'_> {
    fn time(&self) -> f64 {
        self.bank.time
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn dims(&self) -> GridDims {
        self.dims
    }

    fn agent_count(&self) -> usize {
        self.bank.agents.len()
    }

    fn agents(&self) -> &[Agent] {
        &self.bank.agents
    }

    fn congestion(&self) -> &[f32] {
        &self.bank.congestion
    }
}

/// An owned, thread-safe copy of a published frame.
///
/// Unlike [`Frame`], which borrows from the `StateBuffer`, this type
/// owns a clone of the bank. That makes it `Send + Sync`, so a host can
/// hand it to a render or IO thread while the simulation thread keeps
/// applying updates.
///
/// Created by [`crate::StateBuffer::owned_frame`].
pub struct OwnedFrame {
    /// Cloned bank data.
    bank: StateBank,
    /// Congestion grid shape.
    dims: GridDims,
    /// Publish counter at the time of the copy.
    generation: Generation,
}

// Compile-time assertion: OwnedFrame must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<OwnedFrame>();
};

impl OwnedFrame {
    /// Create a new owned frame from cloned bank data.
    pub(crate) fn new(bank: StateBank, dims: GridDims, generation: Generation) -> Self {
        Self {
            bank,
            dims,
            generation,
        }
    }
}

impl FrameAccess for OwnedFrame {
    fn time(&self) -> f64 {
        self.bank.time
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn dims(&self) -> GridDims {
        self.dims
    }

    fn agent_count(&self) -> usize {
        self.bank.agents.len()
    }

    fn agents(&self) -> &[Agent] {
        &self.bank.agents
    }

    fn congestion(&self) -> &[f32] {
        &self.bank.congestion
    }
}
