//! Testing utilities for Photowall.
//!
//! Drives the full grid pipeline without a real rendering surface:
//! [`FakeSurface`] records every node-tree mutation and lets tests fire
//! load/click/scroll/resize events; [`ManualScheduler`] makes frames and
//! timeouts explicit; [`GridTestRule`] wires both to a [`PhotoGrid`].
//!
//! [`PhotoGrid`]: photowall_grid::PhotoGrid

mod fake_surface;
mod grid_test_rule;
mod manual_scheduler;

pub use fake_surface::*;
pub use grid_test_rule::*;
pub use manual_scheduler::*;
