//! The base progressive image item.
//!
//! Materialization inserts the cached figure node and, after a short
//! deliberate delay, attaches a low-resolution placeholder and the
//! full-resolution asset. The delay absorbs rapid scroll-then-unscroll
//! without wasted fetches; the attach callback re-checks that the item is
//! still materialized, and load notifications verify the asset is still
//! owned before styling it, so a notification arriving after eviction
//! touches nothing.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use photowall_foundation::{Geometry, ItemRecord, TimerId};

use super::{GridItem, ItemContext};
use crate::surface::SurfaceNode;

/// Shared implementation behind every image item variant.
pub(crate) struct ImageCore {
    filename: String,
    aspect_ratio: f32,
    ctx: ItemContext,
    inner: Rc<RefCell<CoreInner>>,
}

#[derive(Default)]
struct CoreInner {
    geometry: Geometry,
    materialized: bool,
    /// The figure node is created once and reused across
    /// materializations; removal only detaches it.
    figure: Option<SurfaceNode>,
    thumbnail: Option<SurfaceNode>,
    full_image: Option<SurfaceNode>,
    attach_timer: Option<TimerId>,
}

impl ImageCore {
    pub(crate) fn new(ctx: ItemContext, record: &ItemRecord) -> Self {
        Self {
            filename: record.filename.clone(),
            aspect_ratio: record.aspect_ratio,
            ctx,
            inner: Rc::new(RefCell::new(CoreInner::default())),
        }
    }

    pub(crate) fn identifier(&self) -> &str {
        &self.filename
    }

    pub(crate) fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub(crate) fn geometry(&self) -> Geometry {
        self.inner.borrow().geometry.clone()
    }

    pub(crate) fn is_materialized(&self) -> bool {
        self.inner.borrow().materialized
    }

    pub(crate) fn update_geometry(&self, geometry: Geometry) {
        let mut inner = self.inner.borrow_mut();
        inner.geometry = geometry;
        if inner.materialized {
            if let Some(figure) = inner.figure {
                self.ctx.surface.set_geometry(figure, &inner.geometry);
            }
        }
    }

    /// Materializes the item, running `decorate` the first time the figure
    /// node is created so variants can add their overlay nodes.
    pub(crate) fn materialize_with(&self, decorate: Option<&dyn Fn(&ItemContext, SurfaceNode)>) {
        if self.inner.borrow().materialized {
            return;
        }

        let figure = self.ensure_figure(decorate);
        let surface = &self.ctx.surface;
        {
            let mut inner = self.inner.borrow_mut();
            inner.materialized = true;
            surface.set_geometry(figure, &inner.geometry);
        }
        if let Some(container) = self.ctx.container {
            surface.append_child(container, figure);
        }

        let delay = Duration::from_millis(self.ctx.spec.deferred_attach_delay_ms);
        let ctx = self.ctx.clone();
        let filename = self.filename.clone();
        let weak = Rc::downgrade(&self.inner);
        let timer = self.ctx.scheduler.set_timeout(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    attach_assets(&ctx, &filename, &inner);
                }
            }),
        );
        self.inner.borrow_mut().attach_timer = Some(timer);
    }

    pub(crate) fn dematerialize(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(timer) = inner.attach_timer.take() {
            self.ctx.scheduler.clear_timeout(timer);
        }

        let surface = &self.ctx.surface;
        // Clear sources before detaching so in-flight fetches abort.
        if let Some(thumbnail) = inner.thumbnail.take() {
            surface.clear_image_source(thumbnail);
            surface.remove_node(thumbnail);
        }
        if let Some(full_image) = inner.full_image.take() {
            surface.clear_image_source(full_image);
            surface.remove_node(full_image);
        }
        if inner.materialized {
            inner.materialized = false;
            if let Some(figure) = inner.figure {
                surface.remove_node(figure);
            }
        }
    }

    fn ensure_figure(&self, decorate: Option<&dyn Fn(&ItemContext, SurfaceNode)>) -> SurfaceNode {
        if let Some(figure) = self.inner.borrow().figure {
            return figure;
        }

        let spec = &self.ctx.spec;
        let surface = &self.ctx.surface;
        let figure =
            surface.create_node(&spec.figure_tag, &format!("{}-figure", spec.class_prefix));
        if let Some(handler) = spec.on_click.clone() {
            let filename = self.filename.clone();
            surface.on_click(figure, Box::new(move || handler(&filename)));
        }
        if let Some(decorate) = decorate {
            decorate(&self.ctx, figure);
        }
        self.inner.borrow_mut().figure = Some(figure);
        figure
    }
}

/// Deferred asset attachment, run from the scheduler timeout.
fn attach_assets(ctx: &ItemContext, filename: &str, inner: &Rc<RefCell<CoreInner>>) {
    let mut guard = inner.borrow_mut();
    guard.attach_timer = None;
    // Fast scroll may have evicted the item before the delay elapsed.
    if !guard.materialized {
        return;
    }
    let Some(figure) = guard.figure else {
        return;
    };

    let spec = &ctx.spec;
    let surface = &ctx.surface;

    if guard.thumbnail.is_none() {
        let node = surface.create_node("img", &format!("{}-thumbnail", spec.class_prefix));
        surface.set_image_source(node, &(spec.url_for_size)(filename, spec.thumbnail_size));
        register_loaded_styling(ctx, inner, node, AssetKind::Thumbnail);
        surface.append_child(figure, node);
        guard.thumbnail = Some(node);
    }

    if guard.full_image.is_none() {
        let size = (spec.get_image_size)(ctx.state.window_width());
        let node = surface.create_node("img", &format!("{}-full", spec.class_prefix));
        surface.set_image_source(node, &(spec.url_for_size)(filename, size));
        register_loaded_styling(ctx, inner, node, AssetKind::Full);
        surface.append_child(figure, node);
        guard.full_image = Some(node);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Thumbnail,
    Full,
}

fn register_loaded_styling(
    ctx: &ItemContext,
    inner: &Rc<RefCell<CoreInner>>,
    node: SurfaceNode,
    kind: AssetKind,
) {
    let loaded_class = format!("{}-loaded", ctx.spec.class_prefix);
    let surface = Rc::clone(&ctx.surface);
    let weak = Rc::downgrade(inner);
    ctx.surface.on_load(
        node,
        Box::new(move || {
            // The notification can arrive after eviction; only style the
            // asset if it is still the one we own.
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let owned = {
                let guard = inner.borrow();
                match kind {
                    AssetKind::Thumbnail => guard.thumbnail == Some(node),
                    AssetKind::Full => guard.full_image == Some(node),
                }
            };
            if owned {
                surface.add_class(node, &loaded_class);
            }
        }),
    );
}

/// The plain image unit: figure node, placeholder asset, full asset.
pub struct ProgressiveImage {
    core: ImageCore,
}

impl ProgressiveImage {
    pub fn new(ctx: ItemContext, record: ItemRecord) -> Self {
        Self {
            core: ImageCore::new(ctx, &record),
        }
    }
}

impl GridItem for ProgressiveImage {
    fn identifier(&self) -> &str {
        self.core.identifier()
    }

    fn aspect_ratio(&self) -> f32 {
        self.core.aspect_ratio()
    }

    fn geometry(&self) -> Geometry {
        self.core.geometry()
    }

    fn update_geometry(&self, geometry: Geometry) {
        self.core.update_geometry(geometry);
    }

    fn materialize(&self) {
        self.core.materialize_with(None);
    }

    fn dematerialize(&self) {
        self.core.dematerialize();
    }

    fn is_materialized(&self) -> bool {
        self.core.is_materialized()
    }
}
