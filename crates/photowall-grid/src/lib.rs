//! Photowall grid orchestration.
//!
//! Builds on `photowall-foundation`'s pure algorithms to drive a real
//! rendering surface:
//! - [`GridSpec`] - recognized settings with the library defaults
//! - [`RenderSurface`] - the opaque surface items materialize into
//! - [`PhotoGrid`] - the controller owning state, items, and listeners
//! - [`GridItem`] and its variants - per-item materialization lifecycle
//!
//! # Example
//!
//! ```rust,ignore
//! let grid = PhotoGrid::new(records, GridSpec::default(), surface, scheduler);
//! grid.enable();
//! // ... host forwards scroll/resize events through the surface ...
//! grid.disable();
//! ```

pub mod config;
pub mod controller;
pub mod item;
pub mod surface;

pub use config::*;
pub use controller::*;
pub use item::*;
pub use surface::*;

// The foundation types that appear in this crate's public API.
pub use photowall_foundation::{
    compute_justified_layout, Geometry, GridState, ItemRecord, JustifiedLayout, ResizeCoalescer,
    RowLayoutConfig, Scheduler, ScrollDirection, TimerId, TransitionSpec, VisibilityWindow,
};
