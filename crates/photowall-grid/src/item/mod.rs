//! Visual item lifecycle.
//!
//! A grid item's on-page materialization is created and destroyed
//! repeatedly as visibility changes, independent of its geometry. The
//! [`GridItem`] capability trait covers that lifecycle; variants are
//! selected through an injected [`ItemFactory`] rather than inheritance:
//! - [`ProgressiveImage`] - the base image unit
//! - [`CaptionedImage`] - base plus a caption overlay
//! - [`GroupedImage`] - base plus a group headline

mod decorated;
mod progressive;

pub use decorated::*;
pub use progressive::*;

use std::rc::Rc;

use photowall_foundation::{Geometry, GridState, ItemRecord, Scheduler};

use crate::config::GridSpec;
use crate::surface::{RenderSurface, SurfaceNode};

/// One grid entry's materialize/dematerialize behavior against the
/// rendering surface.
///
/// All operations are safe to repeat: materializing a materialized item
/// and dematerializing an absent one are no-ops.
pub trait GridItem {
    /// Stable identifier (the record's filename).
    fn identifier(&self) -> &str;

    /// Aspect ratio consumed by the layout pass.
    fn aspect_ratio(&self) -> f32;

    /// Current computed geometry.
    fn geometry(&self) -> Geometry;

    /// Stores geometry from a layout pass, restyling the on-page node if
    /// one exists.
    fn update_geometry(&self, geometry: Geometry);

    /// Inserts the item's container node into the grid root and schedules
    /// the deferred asset attach.
    fn materialize(&self);

    /// Clears asset sources (aborting in-flight fetches) and removes the
    /// container node. Safe to call on an item that never materialized.
    fn dematerialize(&self);

    /// Whether the item currently exists on the page.
    fn is_materialized(&self) -> bool;
}

/// Shared handles every item needs to talk to the outside world.
#[derive(Clone)]
pub struct ItemContext {
    /// The rendering surface items insert themselves into.
    pub surface: Rc<dyn RenderSurface>,
    /// Frame/timeout source for deferred attachment.
    pub scheduler: Rc<dyn Scheduler>,
    /// The grid's immutable settings.
    pub spec: Rc<GridSpec>,
    /// The grid's mutable state (consulted for the last window width).
    pub state: GridState,
    /// The grid root, if it resolved.
    pub container: Option<SurfaceNode>,
}

/// Builds the item for `records[index]`. The whole record list is passed
/// so factories can look at neighbors (group boundaries).
pub type ItemFactory = Rc<dyn Fn(&ItemContext, &[ItemRecord], usize) -> Box<dyn GridItem>>;

/// The default factory: a grouped image at each group boundary, a
/// captioned image for records carrying a caption, and the plain
/// progressive image otherwise.
pub fn default_item_factory() -> ItemFactory {
    Rc::new(|ctx, records, index| {
        let record = records[index].clone();
        let starts_group = record.group.is_some()
            && (index == 0 || records[index - 1].group != record.group);
        if starts_group {
            Box::new(GroupedImage::new(ctx.clone(), record))
        } else if record.caption.is_some() {
            Box::new(CaptionedImage::new(ctx.clone(), record))
        } else {
            Box::new(ProgressiveImage::new(ctx.clone(), record))
        }
    })
}
