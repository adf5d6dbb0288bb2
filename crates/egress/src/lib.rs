//! Egress: a double-buffered visualization state layer for evacuation
//! simulations.
//!
//! A simulation engine pushes one state update per tick — agent
//! positions, evacuation flags, and a congestion map — and a renderer
//! reads the most recently published tick at its own frame rate,
//! always seeing a complete tick and never a half-written one.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the Egress sub-crates. For most users, adding `egress` as a
//! single dependency is sufficient. C hosts should link the
//! `egress-ffi` cdylib instead.
//!
//! # Quick start
//!
//! ```rust
//! use egress::prelude::*;
//!
//! // A 10x10 grid tracking three agents.
//! let mut buffer = StateBuffer::new(BufferConfig::new(10, 10, 3)).unwrap();
//!
//! // One simulation tick: interleaved positions, evacuation flags,
//! // and a row-major congestion map.
//! let mut congestion = vec![0.0f32; 100];
//! congestion[55] = 5.0;
//! buffer
//!     .apply(StateUpdate {
//!         time: 1.0,
//!         positions: &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0],
//!         evacuated: &[0, 0, 0],
//!         congestion: &congestion,
//!     })
//!     .unwrap();
//!
//! // Render-side queries against the published tick.
//! let frame = buffer.frame();
//! let agent = frame.agent(AgentId(0)).unwrap();
//! assert_eq!((agent.x, agent.y, agent.evacuated), (1.0, 1.0, false));
//! assert_eq!(frame.congestion_at(5, 5), 5.0);
//! assert_eq!(frame.congestion_at(9, 9), 0.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `egress-core` | IDs, agent records, grid dimensions, core traits |
//! | [`state`] | `egress-state` | Double-buffered `StateBuffer`, frames, configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`egress-core`).
///
/// Contains [`types::Agent`], [`types::GridDims`], error types, and the
/// [`types::FrameAccess`] trait implemented by every frame view.
pub use egress_core as types;

/// Double-buffered state storage (`egress-state`).
///
/// Most users only need [`state::StateBuffer`], [`state::StateUpdate`],
/// and the frame views — they are also available in the [`prelude`].
pub use egress_state as state;

/// Common imports for typical Egress usage.
///
/// ```rust
/// use egress::prelude::*;
/// ```
///
/// This imports the most frequently used types: the buffer and its
/// configuration, update and frame types, core IDs, and the frame
/// access trait.
pub mod prelude {
    // State buffer and frame views
    pub use egress_state::{Frame, OwnedFrame, StateBuffer, StateUpdate};

    // Configuration
    pub use egress_state::{BufferConfig, BufferShape, ConfigError};

    // Core types and traits
    pub use egress_core::{Agent, AgentId, FrameAccess, Generation, GridDims};

    // Errors
    pub use egress_core::{UpdateError, UpdateInput};
}
