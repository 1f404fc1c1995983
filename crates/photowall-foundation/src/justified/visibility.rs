//! Viewport visibility policy.
//!
//! Decides which items should be materialized on the rendering surface
//! based on the scroll position and an asymmetric pair of preload buffers:
//! the buffer ahead of travel (primary) is typically larger, since that is
//! where the user is heading; the buffer behind (secondary) is just big
//! enough to avoid an immediate re-fetch on direction reversal.

use super::grid_state::ScrollDirection;

/// The vertical band of content, in container-relative coordinates, whose
/// items should be materialized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityWindow {
    /// Smallest visible container-relative y.
    pub lower: f32,
    /// Largest visible container-relative y.
    pub upper: f32,
}

impl VisibilityWindow {
    /// Computes the window for the current scroll state.
    ///
    /// `scroll_offset` is the scroll surface's offset, `container_offset`
    /// the grid container's page offset within it, and `viewport_height`
    /// the visible height of the scroll surface.
    pub fn compute(
        scroll_offset: f32,
        container_offset: f32,
        viewport_height: f32,
        direction: ScrollDirection,
        primary_buffer: f32,
        secondary_buffer: f32,
    ) -> Self {
        let (buffer_top, buffer_bottom) = match direction {
            ScrollDirection::Down => (secondary_buffer, primary_buffer),
            ScrollDirection::Up => (primary_buffer, secondary_buffer),
        };
        Self {
            lower: scroll_offset - container_offset - buffer_top,
            upper: scroll_offset - container_offset + viewport_height + buffer_bottom,
        }
    }

    /// Returns whether an item spanning `[translate_y, translate_y + height]`
    /// intersects the window.
    ///
    /// The comparisons are strict: an item whose bottom edge sits exactly on
    /// `lower` (or whose top edge sits exactly on `upper`) still intersects.
    pub fn contains(&self, translate_y: f32, height: f32) -> bool {
        !(translate_y + height < self.lower || translate_y > self.upper)
    }
}
