//! Double-buffered state store for evacuation visualization.
//!
//! The host's simulation loop pushes one [`StateUpdate`] per tick; its
//! render loop reads through [`Frame`] point queries many times per
//! drawn frame. [`StateBuffer`] keeps two complete state banks and
//! publishes by swapping them, so a reader never observes a
//! half-written tick.
//!
//! ```text
//! StateBuffer
//! ├── StateBank A  ←─── staging (even generations) / published (odd)
//! ├── StateBank B  ←─── published (even generations) / staging (odd)
//! ├── GridDims + agent count (fixed at construction)
//! └── Generation (publish counter)
//! ```
//!
//! The lifecycle per tick is:
//! 1. `apply(update)` — validate all lengths, overwrite the staging
//!    bank, swap banks, advance the generation
//! 2. `frame()` — borrow the published bank for point queries
//!
//! Both banks are allocated at construction; the update path never
//! allocates or frees.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod bank;
pub mod buffer;
pub mod config;
pub mod frame;

// Public re-exports for the primary API surface.
pub use buffer::{StateBuffer, StateUpdate};
pub use config::{BufferConfig, BufferShape, ConfigError};
pub use frame::{Frame, OwnedFrame};
