//! Per-grid mutable state.
//!
//! Provides [`GridState`], the state holder consulted by the layout and
//! visibility passes: last known window width, scroll offsets and derived
//! direction, the time-boxed transitioning window, total content height,
//! and the in-flight-frame guard.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Direction of vertical scroll travel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Towards smaller offsets. Also the tie-break for unchanged offsets.
    Up,
    /// Towards larger offsets. The initial direction of a fresh grid.
    #[default]
    Down,
}

/// State object shared between the grid controller and its passes.
///
/// Cloning shares the underlying state. Single-threaded; interior
/// mutability via `RefCell`.
#[derive(Clone)]
pub struct GridState {
    inner: Rc<RefCell<GridStateInner>>,
}

struct GridStateInner {
    /// Last known window (or scroll-surface) width.
    window_width: f32,

    /// Latest observed scroll offset.
    latest_scroll_offset: f32,

    /// Previous observed scroll offset, kept only to derive direction.
    previous_scroll_offset: f32,

    /// Direction derived from the last two offsets.
    scroll_direction: ScrollDirection,

    /// Minimum row aspect ratio used by the last layout pass.
    last_min_aspect_ratio: Option<f32>,

    /// Whether layout changes are currently animated rather than snapped.
    transitioning: bool,

    /// The aspect-ratio threshold whose change triggered the transition.
    transition_trigger_ratio: Option<f32>,

    /// Backstop deadline for the transitioning window. The controller's
    /// timeout normally clears the flag first; the deadline covers a
    /// timeout that never fires.
    transition_deadline: Option<Instant>,

    /// Total content height from the last layout pass.
    total_height: f32,

    /// Guard ensuring at most one visibility-application pass is pending
    /// per animation frame.
    visibility_pass_pending: bool,
}

impl GridState {
    /// Creates state for a grid whose surface currently reports `window_width`.
    pub fn new(window_width: f32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(GridStateInner {
                window_width,
                latest_scroll_offset: 0.0,
                previous_scroll_offset: 0.0,
                scroll_direction: ScrollDirection::default(),
                last_min_aspect_ratio: None,
                transitioning: false,
                transition_trigger_ratio: None,
                transition_deadline: None,
                total_height: 0.0,
                visibility_pass_pending: false,
            })),
        }
    }

    /// Returns the last known window width.
    pub fn window_width(&self) -> f32 {
        self.inner.borrow().window_width
    }

    /// Updates the last known window width (resize pass).
    pub fn set_window_width(&self, width: f32) {
        self.inner.borrow_mut().window_width = width;
    }

    /// Records a new scroll offset and derives the travel direction.
    ///
    /// A strictly greater offset means `Down`; anything else, including an
    /// unchanged offset, resolves to `Up` (deliberate tie-break).
    pub fn record_scroll_offset(&self, offset: f32) -> ScrollDirection {
        let mut inner = self.inner.borrow_mut();
        inner.previous_scroll_offset = inner.latest_scroll_offset;
        inner.latest_scroll_offset = offset;
        inner.scroll_direction = if offset > inner.previous_scroll_offset {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        inner.scroll_direction
    }

    /// Overwrites both stored offsets without deriving a direction.
    ///
    /// Used when (re)activating against a surface that may have scrolled
    /// while the grid was detached.
    pub fn sync_scroll_offset(&self, offset: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.previous_scroll_offset = offset;
        inner.latest_scroll_offset = offset;
    }

    /// Returns the latest observed scroll offset.
    pub fn latest_scroll_offset(&self) -> f32 {
        self.inner.borrow().latest_scroll_offset
    }

    /// Returns the current scroll direction.
    pub fn scroll_direction(&self) -> ScrollDirection {
        self.inner.borrow().scroll_direction
    }

    /// Records the minimum aspect ratio used by a layout pass.
    ///
    /// Returns `true` when a previous value existed and differed, which is
    /// the trigger for the transitioning window.
    pub fn observe_min_aspect_ratio(&self, ratio: f32) -> bool {
        let mut inner = self.inner.borrow_mut();
        let changed = matches!(inner.last_min_aspect_ratio, Some(previous) if previous != ratio);
        inner.last_min_aspect_ratio = Some(ratio);
        changed
    }

    /// Opens the transitioning window for `window` from now.
    pub fn begin_transition(&self, trigger_ratio: f32, window: Duration) {
        let mut inner = self.inner.borrow_mut();
        inner.transitioning = true;
        inner.transition_trigger_ratio = Some(trigger_ratio);
        inner.transition_deadline = Some(Instant::now() + window);
    }

    /// Closes the transitioning window.
    pub fn end_transition(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.transitioning = false;
        inner.transition_trigger_ratio = None;
        inner.transition_deadline = None;
    }

    /// Returns whether layout changes should currently be animated.
    pub fn is_transitioning(&self) -> bool {
        let inner = self.inner.borrow();
        inner.transitioning
            && inner
                .transition_deadline
                .map_or(true, |deadline| Instant::now() < deadline)
    }

    /// Returns the aspect-ratio threshold that triggered the current
    /// transition, if one is open.
    pub fn transition_trigger_ratio(&self) -> Option<f32> {
        self.inner.borrow().transition_trigger_ratio
    }

    /// Returns the total content height from the last layout pass.
    pub fn total_height(&self) -> f32 {
        self.inner.borrow().total_height
    }

    /// Stores the total content height computed by a layout pass.
    pub fn set_total_height(&self, height: f32) {
        self.inner.borrow_mut().total_height = height;
    }

    /// Attempts to claim the per-frame visibility pass slot.
    ///
    /// Returns `true` when no pass was pending; the caller must schedule
    /// exactly one application pass and release the slot with
    /// [`GridState::finish_visibility_pass`] when it runs.
    pub fn try_begin_visibility_pass(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.visibility_pass_pending {
            false
        } else {
            inner.visibility_pass_pending = true;
            true
        }
    }

    /// Releases the per-frame visibility pass slot.
    pub fn finish_visibility_pass(&self) {
        self.inner.borrow_mut().visibility_pass_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GridState::new(1280.0);
        assert_eq!(state.window_width(), 1280.0);
        assert_eq!(state.latest_scroll_offset(), 0.0);
        assert_eq!(state.scroll_direction(), ScrollDirection::Down);
        assert!(!state.is_transitioning());
    }

    #[test]
    fn test_direction_from_offsets() {
        let state = GridState::new(1280.0);
        assert_eq!(state.record_scroll_offset(100.0), ScrollDirection::Down);
        assert_eq!(state.record_scroll_offset(250.0), ScrollDirection::Down);
        assert_eq!(state.record_scroll_offset(120.0), ScrollDirection::Up);
    }

    #[test]
    fn test_direction_tie_break_is_up() {
        let state = GridState::new(1280.0);
        state.record_scroll_offset(100.0);
        // Equal offset resolves to Up.
        assert_eq!(state.record_scroll_offset(100.0), ScrollDirection::Up);
    }

    #[test]
    fn test_min_aspect_ratio_change_detection() {
        let state = GridState::new(1900.0);
        // First observation: no previous value, no trigger.
        assert!(!state.observe_min_aspect_ratio(5.0));
        // Unchanged: no trigger.
        assert!(!state.observe_min_aspect_ratio(5.0));
        // Changed: trigger.
        assert!(state.observe_min_aspect_ratio(2.0));
    }

    #[test]
    fn test_transition_window() {
        let state = GridState::new(1280.0);
        state.begin_transition(2.0, Duration::from_secs(60));
        assert!(state.is_transitioning());
        assert_eq!(state.transition_trigger_ratio(), Some(2.0));

        state.end_transition();
        assert!(!state.is_transitioning());
        assert_eq!(state.transition_trigger_ratio(), None);
    }

    #[test]
    fn test_transition_deadline_backstop() {
        let state = GridState::new(1280.0);
        // A zero-length window expires immediately even though the flag is
        // still set; the deadline covers a lost clear timeout.
        state.begin_transition(2.0, Duration::ZERO);
        assert!(!state.is_transitioning());
    }

    #[test]
    fn test_visibility_pass_guard() {
        let state = GridState::new(1280.0);
        assert!(state.try_begin_visibility_pass());
        // Second claim within the same frame is rejected.
        assert!(!state.try_begin_visibility_pass());

        state.finish_visibility_pass();
        assert!(state.try_begin_visibility_pass());
    }
}
