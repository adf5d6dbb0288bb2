//! Core types and traits for the egress visualization state buffer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the strongly-typed identifiers, the per-agent and grid records, the
//! shared error types, and the [`FrameAccess`] read contract used
//! throughout the egress workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod error;
pub mod grid;
pub mod id;
pub mod traits;

// Public re-exports for the primary API surface.
pub use agent::Agent;
pub use error::{UpdateError, UpdateInput};
pub use grid::GridDims;
pub use id::{AgentId, Generation};
pub use traits::FrameAccess;
