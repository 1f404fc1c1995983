//! A recording fake rendering surface.
//!
//! Keeps an in-memory node tree, records every mutation as a
//! [`SurfaceOp`], and lets tests fire the asynchronous notifications a
//! real surface would deliver: asset load completion, clicks, scroll and
//! resize events.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use photowall_foundation::Geometry;
use photowall_grid::{ListenerId, RenderSurface, SurfaceNode};

/// One recorded surface mutation, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Append { parent: SurfaceNode, child: SurfaceNode },
    Remove { node: SurfaceNode },
    SetGeometry { node: SurfaceNode },
    SetContainerHeight { node: SurfaceNode, height: f32 },
    SetSource { node: SurfaceNode, url: String },
    ClearSource { node: SurfaceNode },
    AddClass { node: SurfaceNode, class: String },
    SetText { node: SurfaceNode, text: String },
}

#[derive(Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    parent: Option<SurfaceNode>,
    children: Vec<SurfaceNode>,
    geometry: Option<Geometry>,
    container_height: Option<f32>,
    image_source: Option<String>,
    text: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    page_offset: f32,
    load_callback: Option<Box<dyn FnOnce()>>,
    click_callback: Option<Rc<dyn Fn()>>,
}

#[derive(Default)]
struct FakeSurfaceInner {
    nodes: HashMap<u64, NodeData>,
    containers: HashMap<String, SurfaceNode>,
    next_node_id: u64,
    next_listener_id: u64,
    scroll_listeners: Vec<(ListenerId, Rc<dyn Fn()>)>,
    resize_listeners: Vec<(ListenerId, Rc<dyn Fn()>)>,
    scroll_offset: f32,
    viewport_width: f32,
    viewport_height: f32,
    ops: Vec<SurfaceOp>,
}

/// In-memory [`RenderSurface`] double.
pub struct FakeSurface {
    inner: RefCell<FakeSurfaceInner>,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSurface {
    /// Creates a surface with a 1280x800 viewport at scroll offset 0.
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(FakeSurfaceInner {
                viewport_width: 1280.0,
                viewport_height: 800.0,
                ..FakeSurfaceInner::default()
            }),
        }
    }

    /// Creates an element and registers it under `container_id` so
    /// [`RenderSurface::find_container`] resolves it.
    pub fn register_container(&self, container_id: &str) -> SurfaceNode {
        let mut inner = self.inner.borrow_mut();
        let node = Self::allocate_node(&mut inner, "div", "");
        inner.containers.insert(container_id.to_string(), node);
        node
    }

    pub fn set_viewport(&self, width: f32, height: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.viewport_width = width;
        inner.viewport_height = height;
    }

    pub fn set_scroll_offset(&self, offset: f32) {
        self.inner.borrow_mut().scroll_offset = offset;
    }

    pub fn set_node_width(&self, node: SurfaceNode, width: f32) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(&node.0) {
            data.width = Some(width);
        }
    }

    pub fn set_node_height(&self, node: SurfaceNode, height: f32) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(&node.0) {
            data.height = Some(height);
        }
    }

    pub fn set_node_page_offset(&self, node: SurfaceNode, offset: f32) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(&node.0) {
            data.page_offset = offset;
        }
    }

    /// Delivers a scroll notification to every registered listener.
    pub fn emit_scroll(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self
            .inner
            .borrow()
            .scroll_listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Delivers a resize notification to every registered listener.
    pub fn emit_resize(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self
            .inner
            .borrow()
            .resize_listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Fires the node's load notification, if one is registered.
    /// Returns whether a callback ran.
    pub fn fire_load(&self, node: SurfaceNode) -> bool {
        let callback = self
            .inner
            .borrow_mut()
            .nodes
            .get_mut(&node.0)
            .and_then(|data| data.load_callback.take());
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Fires the node's click notification, if one is registered.
    pub fn fire_click(&self, node: SurfaceNode) {
        let callback = self
            .inner
            .borrow()
            .nodes
            .get(&node.0)
            .and_then(|data| data.click_callback.clone());
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.inner.borrow().scroll_listeners.len()
    }

    pub fn resize_listener_count(&self) -> usize {
        self.inner.borrow().resize_listeners.len()
    }

    /// Every recorded mutation, in call order.
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.inner.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.inner.borrow_mut().ops.clear();
    }

    pub fn tag_of(&self, node: SurfaceNode) -> Option<String> {
        self.inner.borrow().nodes.get(&node.0).map(|data| data.tag.clone())
    }

    pub fn classes_of(&self, node: SurfaceNode) -> Vec<String> {
        self.inner
            .borrow()
            .nodes
            .get(&node.0)
            .map(|data| data.classes.clone())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: SurfaceNode, class: &str) -> bool {
        self.classes_of(node).iter().any(|c| c == class)
    }

    pub fn image_source_of(&self, node: SurfaceNode) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(&node.0)
            .and_then(|data| data.image_source.clone())
    }

    pub fn geometry_of(&self, node: SurfaceNode) -> Option<Geometry> {
        self.inner
            .borrow()
            .nodes
            .get(&node.0)
            .and_then(|data| data.geometry.clone())
    }

    pub fn text_of(&self, node: SurfaceNode) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(&node.0)
            .and_then(|data| data.text.clone())
    }

    pub fn container_height_of(&self, node: SurfaceNode) -> Option<f32> {
        self.inner
            .borrow()
            .nodes
            .get(&node.0)
            .and_then(|data| data.container_height)
    }

    pub fn children_of(&self, node: SurfaceNode) -> Vec<SurfaceNode> {
        self.inner
            .borrow()
            .nodes
            .get(&node.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    /// Whether the node is attached, directly or transitively, to a
    /// registered container.
    pub fn is_attached(&self, node: SurfaceNode) -> bool {
        let inner = self.inner.borrow();
        let roots: Vec<SurfaceNode> = inner.containers.values().copied().collect();
        let mut current = node;
        loop {
            if roots.contains(&current) {
                return true;
            }
            match inner.nodes.get(&current.0).and_then(|data| data.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn allocate_node(inner: &mut FakeSurfaceInner, tag: &str, class: &str) -> SurfaceNode {
        inner.next_node_id += 1;
        let node = SurfaceNode(inner.next_node_id);
        let mut data = NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        };
        if !class.is_empty() {
            data.classes.push(class.to_string());
        }
        inner.nodes.insert(node.0, data);
        node
    }

    fn detach(inner: &mut FakeSurfaceInner, node: SurfaceNode) {
        let parent = inner.nodes.get(&node.0).and_then(|data| data.parent);
        if let Some(parent) = parent {
            if let Some(parent_data) = inner.nodes.get_mut(&parent.0) {
                parent_data.children.retain(|child| *child != node);
            }
        }
        if let Some(data) = inner.nodes.get_mut(&node.0) {
            data.parent = None;
        }
    }
}

impl RenderSurface for FakeSurface {
    fn find_container(&self, container_id: &str) -> Option<SurfaceNode> {
        self.inner.borrow().containers.get(container_id).copied()
    }

    fn create_node(&self, tag: &str, class: &str) -> SurfaceNode {
        let mut inner = self.inner.borrow_mut();
        Self::allocate_node(&mut inner, tag, class)
    }

    fn append_child(&self, parent: SurfaceNode, child: SurfaceNode) {
        let mut inner = self.inner.borrow_mut();
        Self::detach(&mut inner, child);
        if let Some(data) = inner.nodes.get_mut(&child.0) {
            data.parent = Some(parent);
        }
        if let Some(parent_data) = inner.nodes.get_mut(&parent.0) {
            parent_data.children.push(child);
        }
        inner.ops.push(SurfaceOp::Append { parent, child });
    }

    fn remove_node(&self, node: SurfaceNode) {
        let mut inner = self.inner.borrow_mut();
        Self::detach(&mut inner, node);
        inner.ops.push(SurfaceOp::Remove { node });
    }

    fn add_class(&self, node: SurfaceNode, class: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(data) = inner.nodes.get_mut(&node.0) {
            data.classes.push(class.to_string());
        }
        inner.ops.push(SurfaceOp::AddClass {
            node,
            class: class.to_string(),
        });
    }

    fn set_text(&self, node: SurfaceNode, text: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(data) = inner.nodes.get_mut(&node.0) {
            data.text = Some(text.to_string());
        }
        inner.ops.push(SurfaceOp::SetText {
            node,
            text: text.to_string(),
        });
    }

    fn set_geometry(&self, node: SurfaceNode, geometry: &Geometry) {
        let mut inner = self.inner.borrow_mut();
        if let Some(data) = inner.nodes.get_mut(&node.0) {
            data.geometry = Some(geometry.clone());
        }
        inner.ops.push(SurfaceOp::SetGeometry { node });
    }

    fn set_container_height(&self, node: SurfaceNode, height: f32) {
        let mut inner = self.inner.borrow_mut();
        if let Some(data) = inner.nodes.get_mut(&node.0) {
            data.container_height = Some(height);
        }
        inner.ops.push(SurfaceOp::SetContainerHeight { node, height });
    }

    fn set_image_source(&self, node: SurfaceNode, url: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(data) = inner.nodes.get_mut(&node.0) {
            data.image_source = Some(url.to_string());
        }
        inner.ops.push(SurfaceOp::SetSource {
            node,
            url: url.to_string(),
        });
    }

    fn clear_image_source(&self, node: SurfaceNode) {
        let mut inner = self.inner.borrow_mut();
        if let Some(data) = inner.nodes.get_mut(&node.0) {
            data.image_source = None;
        }
        inner.ops.push(SurfaceOp::ClearSource { node });
    }

    fn on_load(&self, node: SurfaceNode, callback: Box<dyn FnOnce()>) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(&node.0) {
            data.load_callback = Some(callback);
        }
    }

    fn on_click(&self, node: SurfaceNode, callback: Box<dyn Fn()>) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(&node.0) {
            data.click_callback = Some(Rc::from(callback));
        }
    }

    fn scroll_offset(&self, _scroller: Option<SurfaceNode>) -> f32 {
        self.inner.borrow().scroll_offset
    }

    fn viewport_width(&self) -> f32 {
        self.inner.borrow().viewport_width
    }

    fn viewport_height(&self) -> f32 {
        self.inner.borrow().viewport_height
    }

    fn node_width(&self, node: SurfaceNode) -> f32 {
        let inner = self.inner.borrow();
        inner
            .nodes
            .get(&node.0)
            .and_then(|data| data.width)
            .unwrap_or(inner.viewport_width)
    }

    fn node_height(&self, node: SurfaceNode) -> f32 {
        let inner = self.inner.borrow();
        inner
            .nodes
            .get(&node.0)
            .and_then(|data| data.height)
            .unwrap_or(inner.viewport_height)
    }

    fn page_offset(&self, node: SurfaceNode) -> f32 {
        self.inner
            .borrow()
            .nodes
            .get(&node.0)
            .map(|data| data.page_offset)
            .unwrap_or(0.0)
    }

    fn add_scroll_listener(
        &self,
        _scroller: Option<SurfaceNode>,
        callback: Box<dyn Fn()>,
    ) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_listener_id += 1;
        let id = ListenerId(inner.next_listener_id);
        inner.scroll_listeners.push((id, Rc::from(callback)));
        id
    }

    fn remove_scroll_listener(&self, id: ListenerId) {
        self.inner
            .borrow_mut()
            .scroll_listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn add_resize_listener(&self, callback: Box<dyn Fn()>) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_listener_id += 1;
        let id = ListenerId(inner.next_listener_id);
        inner.resize_listeners.push((id, Rc::from(callback)));
        id
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        self.inner
            .borrow_mut()
            .resize_listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }
}
