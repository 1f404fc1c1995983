//! The grid controller.
//!
//! Owns the configuration, the ordered item collection, and the per-grid
//! state; wires scroll and (coalesced) resize notifications to the layout
//! and visibility passes; and exposes the enable/disable lifecycle.
//!
//! Scroll handling is frame-coalesced: any burst of scroll notifications
//! within one frame schedules exactly one visibility-application pass,
//! which reads the latest state at frame time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use photowall_foundation::{
    compute_justified_layout, GridState, ItemRecord, ResizeCoalescer, RowLayoutConfig, Scheduler,
    TimerId, TransitionSpec, VisibilityWindow,
};

use crate::config::{GridSpec, Scroller};
use crate::item::{default_item_factory, GridItem, ItemContext};
use crate::surface::{ListenerId, RenderSurface, SurfaceNode};

/// A justified, lazily materialized photo grid.
///
/// Construction resolves the container and builds the item collection but
/// attaches nothing; [`PhotoGrid::enable`] runs the first layout and
/// visibility passes and subscribes to scroll/resize notifications.
pub struct PhotoGrid {
    inner: Rc<GridInner>,
}

struct GridInner {
    spec: Rc<GridSpec>,
    surface: Rc<dyn RenderSurface>,
    scheduler: Rc<dyn Scheduler>,
    state: GridState,
    items: RefCell<Vec<Box<dyn GridItem>>>,
    container: Option<SurfaceNode>,
    scroller_node: Option<SurfaceNode>,
    coalescer: ResizeCoalescer,
    enabled: Cell<bool>,
    scroll_listener: Cell<Option<ListenerId>>,
    resize_listener: Cell<Option<ListenerId>>,
    resize_subscription: Cell<Option<u64>>,
    transition_timer: Cell<Option<TimerId>>,
}

impl PhotoGrid {
    /// Builds a grid over `records` against the given surface and
    /// scheduler.
    pub fn new(
        records: Vec<ItemRecord>,
        spec: GridSpec,
        surface: Rc<dyn RenderSurface>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let spec = Rc::new(spec);

        let container = surface.find_container(&spec.container_id);
        if container.is_none() {
            // Degraded mode: downstream surface operations against the
            // missing container fail loudly at their point of use.
            log::error!(
                "photowall: could not find container element \"{}\"",
                spec.container_id
            );
        }
        let scroller_node = match &spec.scroller {
            Scroller::Viewport => None,
            Scroller::Element(id) => {
                let node = surface.find_container(id);
                if node.is_none() {
                    log::warn!("photowall: could not find scroller element \"{}\"", id);
                }
                node
            }
        };

        let initial_width = match scroller_node {
            Some(node) => surface.node_width(node),
            None => surface.viewport_width(),
        };
        let state = GridState::new(initial_width);

        let ctx = ItemContext {
            surface: Rc::clone(&surface),
            scheduler: Rc::clone(&scheduler),
            spec: Rc::clone(&spec),
            state: state.clone(),
            container,
        };
        let factory = spec.item_factory.clone().unwrap_or_else(default_item_factory);
        let items: Vec<Box<dyn GridItem>> = (0..records.len())
            .map(|index| factory(&ctx, &records, index))
            .collect();

        let coalescer = ResizeCoalescer::new(Rc::clone(&scheduler));

        Self {
            inner: Rc::new(GridInner {
                spec,
                surface,
                scheduler,
                state,
                items: RefCell::new(items),
                container,
                scroller_node,
                coalescer,
                enabled: Cell::new(false),
                scroll_listener: Cell::new(None),
                resize_listener: Cell::new(None),
                resize_subscription: Cell::new(None),
                transition_timer: Cell::new(None),
            }),
        }
    }

    /// Activates the grid: immediate layout and visibility passes, then
    /// scroll and debounced-resize subscriptions. Calling it while already
    /// enabled is a no-op.
    pub fn enable(&self) {
        let inner = &self.inner;
        if inner.enabled.get() {
            return;
        }
        inner.enabled.set(true);

        // The surface may have been scrolled while we were disabled.
        inner
            .state
            .sync_scroll_offset(inner.surface.scroll_offset(inner.scroller_node));

        GridInner::compute_layout(inner);
        GridInner::apply_visibility(inner);

        let weak = Rc::downgrade(inner);
        let scroll_listener = inner.surface.add_scroll_listener(
            inner.scroller_node,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    GridInner::handle_scroll(&inner);
                }
            }),
        );
        inner.scroll_listener.set(Some(scroll_listener));

        let weak = Rc::downgrade(inner);
        let subscription = inner.coalescer.subscribe(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                GridInner::handle_resize(&inner);
            }
        }));
        inner.resize_subscription.set(Some(subscription));

        // Raw resize events only feed the coalescer; the relayout runs on
        // the coalesced flush.
        let weak = Rc::downgrade(inner);
        let resize_listener = inner.surface.add_resize_listener(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.coalescer.notify();
            }
        }));
        inner.resize_listener.set(Some(resize_listener));
    }

    /// Deactivates the grid: removes exactly the listeners [`PhotoGrid::enable`]
    /// registered. Materialized items stay on the page.
    pub fn disable(&self) {
        let inner = &self.inner;
        if !inner.enabled.get() {
            return;
        }
        inner.enabled.set(false);

        if let Some(id) = inner.scroll_listener.take() {
            inner.surface.remove_scroll_listener(id);
        }
        if let Some(id) = inner.resize_listener.take() {
            inner.surface.remove_resize_listener(id);
        }
        if let Some(id) = inner.resize_subscription.take() {
            inner.coalescer.unsubscribe(id);
        }
    }

    /// Whether the grid is currently listening for scroll/resize.
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// The grid's shared state (scroll, direction, transition window).
    pub fn state(&self) -> GridState {
        self.inner.state.clone()
    }

    /// Total content height from the last layout pass.
    pub fn total_content_height(&self) -> f32 {
        self.inner.state.total_height()
    }

    /// Number of items in the collection.
    pub fn item_count(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Runs `f` over every item, in sequence order.
    pub fn with_items<R>(&self, f: impl FnOnce(&[Box<dyn GridItem>]) -> R) -> R {
        f(&self.inner.items.borrow())
    }
}

impl GridInner {
    fn current_width(&self) -> f32 {
        match self.scroller_node {
            Some(node) => self.surface.node_width(node),
            None => self.surface.viewport_width(),
        }
    }

    fn current_viewport_height(&self) -> f32 {
        match self.scroller_node {
            Some(node) => self.surface.node_height(node),
            None => self.surface.viewport_height(),
        }
    }

    /// Full layout pass: recompute the minimum aspect ratio, open the
    /// transitioning window on a change, run the row packer, and store the
    /// resulting geometry on every item.
    fn compute_layout(inner: &Rc<GridInner>) {
        let width = inner.state.window_width();
        let min_aspect_ratio = (inner.spec.get_min_aspect_ratio)(width);
        if inner.state.observe_min_aspect_ratio(min_aspect_ratio) {
            Self::open_transition_window(inner, min_aspect_ratio);
        }

        let transition = if inner.state.is_transitioning() {
            TransitionSpec::Ease {
                duration: Duration::from_millis(inner.spec.transition_speed_ms),
            }
        } else {
            TransitionSpec::None
        };

        let container_width = inner
            .container
            .map(|container| inner.surface.node_width(container))
            .unwrap_or(width);
        let ratios: Vec<f32> = inner
            .items
            .borrow()
            .iter()
            .map(|item| item.aspect_ratio())
            .collect();
        let layout = compute_justified_layout(
            &ratios,
            &RowLayoutConfig {
                container_width,
                spacing: inner.spec.space_between_images,
                min_aspect_ratio,
                transition,
            },
        );

        for (item, geometry) in inner.items.borrow().iter().zip(layout.geometries) {
            item.update_geometry(geometry);
        }
        inner.state.set_total_height(layout.total_height);
        if let Some(container) = inner.container {
            inner
                .surface
                .set_container_height(container, layout.total_height);
        }
    }

    /// Opens (or extends) the transitioning window and schedules its
    /// clearing timeout. The timeout is an approximation: CSS transitions
    /// emit no reliable cross-item completion signal.
    fn open_transition_window(inner: &Rc<GridInner>, trigger_ratio: f32) {
        let window = inner.spec.transition_window();
        inner.state.begin_transition(trigger_ratio, window);

        if let Some(timer) = inner.transition_timer.take() {
            inner.scheduler.clear_timeout(timer);
        }
        let weak = Rc::downgrade(inner);
        let timer = inner.scheduler.set_timeout(
            window,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.transition_timer.set(None);
                    inner.state.end_transition();
                }
            }),
        );
        inner.transition_timer.set(Some(timer));
    }

    fn handle_scroll(inner: &Rc<GridInner>) {
        let offset = inner.surface.scroll_offset(inner.scroller_node);
        inner.state.record_scroll_offset(offset);

        if inner.state.try_begin_visibility_pass() {
            let weak = Rc::downgrade(inner);
            inner.scheduler.request_frame(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    // Release the guard before applying so scrolls arriving
                    // during the pass can schedule the next frame.
                    inner.state.finish_visibility_pass();
                    Self::apply_visibility(&inner);
                }
            }));
        }
    }

    fn handle_resize(inner: &Rc<GridInner>) {
        inner.state.set_window_width(inner.current_width());
        Self::compute_layout(inner);
        Self::apply_visibility(inner);
    }

    /// Applies the visibility window to every item, in collection order.
    fn apply_visibility(inner: &Rc<GridInner>) {
        let container_offset = inner
            .container
            .map(|container| inner.surface.page_offset(container))
            .unwrap_or(0.0);
        let window = VisibilityWindow::compute(
            inner.state.latest_scroll_offset(),
            container_offset,
            inner.current_viewport_height(),
            inner.state.scroll_direction(),
            inner.spec.primary_image_buffer_height,
            inner.spec.secondary_image_buffer_height,
        );

        for item in inner.items.borrow().iter() {
            let geometry = item.geometry();
            if window.contains(geometry.translate_y, geometry.height) {
                item.materialize();
            } else {
                item.dematerialize();
            }
        }
    }
}

impl Drop for GridInner {
    fn drop(&mut self) {
        if let Some(id) = self.scroll_listener.take() {
            self.surface.remove_scroll_listener(id);
        }
        if let Some(id) = self.resize_listener.take() {
            self.surface.remove_resize_listener(id);
        }
        if let Some(id) = self.resize_subscription.take() {
            self.coalescer.unsubscribe(id);
        }
        if let Some(timer) = self.transition_timer.take() {
            self.scheduler.clear_timeout(timer);
        }
        for item in self.items.borrow().iter() {
            item.dematerialize();
        }
    }
}
