//! Read-side contract for published frames.

use crate::agent::Agent;
use crate::grid::GridDims;
use crate::id::{AgentId, Generation};

/// Read-only access to a published frame.
///
/// Implemented by the borrowed and owned frame types in `egress-state`.
/// Hosts and the FFI layer read through this trait, so the point-query
/// policy is defined once here rather than per implementation:
///
/// - Agent lookups report a miss (`None`) and write nothing.
/// - Cell lookups return a `0.0` sentinel on a miss.
///
/// The asymmetry matches what rendering hosts expect: an unknown agent
/// ID means the draw call keeps its previous transform, while sampling
/// past the grid edge reads as empty space.
pub trait FrameAccess {
    /// Simulation time of the published frame, in seconds.
    fn time(&self) -> f64;

    /// Publish counter at the time this frame was published.
    fn generation(&self) -> Generation;

    /// Congestion grid shape.
    fn dims(&self) -> GridDims;

    /// Number of agents. Fixed for the buffer's lifetime.
    fn agent_count(&self) -> usize;

    /// All agents in index order; length equals [`FrameAccess::agent_count`].
    fn agents(&self) -> &[Agent];

    /// The full congestion grid, row-major, `width * height` cells.
    fn congestion(&self) -> &[f32];

    /// Look up one agent by ID.
    ///
    /// Returns `None` when `id` is outside `0..agent_count`.
    fn agent(&self, id: AgentId) -> Option<Agent> {
        self.agents().get(id.0 as usize).copied()
    }

    /// Congestion at `(x, y)`, or `0.0` when the coordinate is out of
    /// bounds.
    ///
    /// A stored `0.0` and an out-of-bounds probe are indistinguishable
    /// here; callers that need to tell them apart should check
    /// [`GridDims::contains`] first or index [`FrameAccess::congestion`]
    /// directly.
    fn congestion_at(&self, x: i32, y: i32) -> f32 {
        match self.dims().index(x, y) {
            Some(i) => self.congestion()[i],
            None => 0.0,
        }
    }

    /// Number of agents whose evacuated flag is set.
    fn evacuated_count(&self) -> usize {
        self.agents().iter().filter(|a| a.evacuated).count()
    }
}
