//! Test rule wiring a grid to the fake surface and manual scheduler.

use std::rc::Rc;
use std::time::Duration;

use photowall_foundation::ItemRecord;
use photowall_grid::{GridSpec, PhotoGrid, RenderSurface, SurfaceNode};

use crate::fake_surface::FakeSurface;
use crate::manual_scheduler::ManualScheduler;

/// Owns a [`PhotoGrid`] plus the fakes it runs against, with driver
/// methods for the events a host page would deliver.
pub struct GridTestRule {
    pub surface: Rc<FakeSurface>,
    pub scheduler: Rc<ManualScheduler>,
    /// The grid root registered under the spec's container id.
    pub container: SurfaceNode,
    pub grid: PhotoGrid,
}

impl GridTestRule {
    /// Builds a grid over `records`, registering the spec's container on a
    /// fresh fake surface first.
    pub fn new(records: Vec<ItemRecord>, spec: GridSpec) -> Self {
        let surface = Rc::new(FakeSurface::new());
        let container = surface.register_container(&spec.container_id);
        let scheduler = Rc::new(ManualScheduler::new());
        let grid = PhotoGrid::new(
            records,
            spec,
            Rc::clone(&surface) as Rc<dyn RenderSurface>,
            Rc::clone(&scheduler) as Rc<dyn photowall_grid::Scheduler>,
        );
        Self {
            surface,
            scheduler,
            container,
            grid,
        }
    }

    /// Scrolls the surface to `offset` and delivers the scroll event.
    pub fn scroll_to(&self, offset: f32) {
        self.surface.set_scroll_offset(offset);
        self.surface.emit_scroll();
    }

    /// Resizes the viewport and delivers the resize event. The coalesced
    /// relayout still needs a [`GridTestRule::pump_frame`].
    pub fn resize_viewport(&self, width: f32, height: f32) {
        self.surface.set_viewport(width, height);
        self.surface.emit_resize();
    }

    /// Runs one scheduler frame.
    pub fn pump_frame(&self) {
        self.scheduler.run_frame();
    }

    /// Advances the virtual clock (deferred attaches, transition clears).
    pub fn advance(&self, delta: Duration) {
        self.scheduler.advance(delta);
    }

    /// Figure nodes currently attached to the grid root, in tree order.
    pub fn attached_figures(&self) -> Vec<SurfaceNode> {
        self.surface.children_of(self.container)
    }

    /// Number of items reporting themselves materialized.
    pub fn materialized_count(&self) -> usize {
        self.grid.with_items(|items| {
            items.iter().filter(|item| item.is_materialized()).count()
        })
    }
}
