//! Justified layout system for Photowall.
//!
//! This module provides the two pure algorithms at the heart of the grid
//! plus the state they consult:
//! - [`compute_justified_layout`] - row-packing layout from aspect ratios
//! - [`VisibilityWindow`] - scroll-direction-aware load/unload window
//! - [`GridState`] - per-grid scroll, transition, and frame-guard state
//!
//! # Example
//!
//! ```rust,ignore
//! let layout = compute_justified_layout(&ratios, &RowLayoutConfig {
//!     container_width: 1000.0,
//!     spacing: 8.0,
//!     min_aspect_ratio: 5.0,
//!     transition: TransitionSpec::None,
//! });
//! ```

mod grid_state;
mod item_data;
mod row_layout;
mod visibility;

pub use grid_state::*;
pub use item_data::*;
pub use row_layout::*;
pub use visibility::*;
