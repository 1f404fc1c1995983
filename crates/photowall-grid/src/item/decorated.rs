//! Decorated item variants.
//!
//! Presentational extensions layered on top of the base image unit. The
//! overlay nodes are created once, alongside the figure, and travel with
//! it across materializations.

use photowall_foundation::{Geometry, ItemRecord};

use super::progressive::ImageCore;
use super::{GridItem, ItemContext};
use crate::surface::SurfaceNode;

/// Image with a caption overlay.
pub struct CaptionedImage {
    core: ImageCore,
    caption: String,
}

impl CaptionedImage {
    pub fn new(ctx: ItemContext, record: ItemRecord) -> Self {
        let caption = record.caption.clone().unwrap_or_default();
        Self {
            core: ImageCore::new(ctx, &record),
            caption,
        }
    }

    fn decorate(&self, ctx: &ItemContext, figure: SurfaceNode) {
        let surface = &ctx.surface;
        let node = surface.create_node(
            "figcaption",
            &format!("{}-caption", ctx.spec.class_prefix),
        );
        surface.set_text(node, &self.caption);
        surface.append_child(figure, node);
    }
}

impl GridItem for CaptionedImage {
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
        self.core
            .materialize_with(Some(&|ctx: &ItemContext, figure| self.decorate(ctx, figure)));
    }

    fn dematerialize(&self) {
        self.core.dematerialize();
    }

    fn is_materialized(&self) -> bool {
        self.core.is_materialized()
    }
}

/// Image that opens a named group with a headline element.
pub struct GroupedImage {
    core: ImageCore,
    group: String,
}

impl GroupedImage {
    pub fn new(ctx: ItemContext, record: ItemRecord) -> Self {
        let group = record.group.clone().unwrap_or_default();
        Self {
            core: ImageCore::new(ctx, &record),
            group,
        }
    }

    fn decorate(&self, ctx: &ItemContext, figure: SurfaceNode) {
        let surface = &ctx.surface;
        let node = surface.create_node(
            "header",
            &format!("{}-group-title", ctx.spec.class_prefix),
        );
        surface.set_text(node, &self.group);
        surface.append_child(figure, node);
    }
}

impl GridItem for GroupedImage {
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
        self.core
            .materialize_with(Some(&|ctx: &ItemContext, figure| self.decorate(ctx, figure)));
    }

    fn dematerialize(&self) {
        self.core.dematerialize();
    }

    fn is_materialized(&self) -> bool {
        self.core.is_materialized()
    }
}
