//! Rendering surface abstraction.
//!
//! The grid writes geometry into an opaque surface and never assumes a
//! real DOM: hosts implement [`RenderSurface`] over whatever node tree
//! they have (a browser document, a test double, ...). Nodes are plain
//! integer handles; removing a node detaches it from its parent but the
//! handle stays valid and the node can be re-appended later.

use photowall_foundation::Geometry;

/// Handle to one node on the rendering surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceNode(pub u64);

/// Handle to a registered scroll or resize listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The rendering surface the grid materializes items into.
///
/// Callback contract: load callbacks are invoked at most once; no callback
/// is ever invoked synchronously from inside its registration call. All
/// methods are called from the single host thread.
pub trait RenderSurface {
    /// Looks up a pre-existing element by its identifier (the grid root or
    /// a designated scroll surface).
    fn find_container(&self, container_id: &str) -> Option<SurfaceNode>;

    /// Creates a detached node with the given tag and class attribute.
    fn create_node(&self, tag: &str, class: &str) -> SurfaceNode;

    /// Appends `child` to `parent`, re-attaching it if it was detached.
    fn append_child(&self, parent: SurfaceNode, child: SurfaceNode);

    /// Detaches `node` from its parent. The handle remains valid.
    fn remove_node(&self, node: SurfaceNode);

    /// Adds a class to the node's class attribute.
    fn add_class(&self, node: SurfaceNode, class: &str);

    /// Sets the node's text content (captions, group headlines).
    fn set_text(&self, node: SurfaceNode, text: &str);

    /// Writes an item geometry into the node's style attributes: width,
    /// height, a 2D translation, and the transition spec.
    fn set_geometry(&self, node: SurfaceNode, geometry: &Geometry);

    /// Writes the grid's total content height onto the root node.
    fn set_container_height(&self, node: SurfaceNode, height: f32);

    /// Starts (or re-targets) an asynchronous asset fetch by assigning the
    /// node's resource locator.
    fn set_image_source(&self, node: SurfaceNode, url: &str);

    /// Clears the node's resource locator, aborting an in-flight fetch.
    fn clear_image_source(&self, node: SurfaceNode);

    /// Registers a one-shot completion notification for the node's asset.
    fn on_load(&self, node: SurfaceNode, callback: Box<dyn FnOnce()>);

    /// Registers a click notification for the node.
    fn on_click(&self, node: SurfaceNode, callback: Box<dyn Fn()>);

    /// Current scroll offset of the given scroll surface (`None` = the
    /// default window-like surface).
    fn scroll_offset(&self, scroller: Option<SurfaceNode>) -> f32;

    /// Width of the default window-like surface.
    fn viewport_width(&self) -> f32;

    /// Visible height of the default window-like surface.
    fn viewport_height(&self) -> f32;

    /// Layout width of an element node.
    fn node_width(&self, node: SurfaceNode) -> f32;

    /// Layout height of an element node.
    fn node_height(&self, node: SurfaceNode) -> f32;

    /// Vertical offset of `node` within the page / scroll content.
    fn page_offset(&self, node: SurfaceNode) -> f32;

    /// Subscribes to scroll notifications from the given scroll surface.
    fn add_scroll_listener(
        &self,
        scroller: Option<SurfaceNode>,
        callback: Box<dyn Fn()>,
    ) -> ListenerId;

    /// Removes a scroll listener. Unknown ids are ignored.
    fn remove_scroll_listener(&self, id: ListenerId);

    /// Subscribes to window resize notifications.
    fn add_resize_listener(&self, callback: Box<dyn Fn()>) -> ListenerId;

    /// Removes a resize listener. Unknown ids are ignored.
    fn remove_resize_listener(&self, id: ListenerId);
}
