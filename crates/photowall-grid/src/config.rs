//! Grid configuration.
//!
//! [`GridSpec`] collects every recognized option with the library's
//! defaults; callers override what they need through the consuming
//! builder methods and the result is immutable once handed to the grid.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::item::ItemFactory;

/// Window width to minimum row aspect ratio.
pub type MinAspectRatioFn = Rc<dyn Fn(f32) -> f32>;

/// Window width to full-resolution asset size.
pub type ImageSizeFn = Rc<dyn Fn(f32) -> u32>;

/// (identifier, size) to resource locator.
pub type UrlForSizeFn = Rc<dyn Fn(&str, u32) -> String>;

/// Click notification, invoked with the clicked item's identifier.
pub type ClickHandler = Rc<dyn Fn(&str)>;

/// Which surface the grid scrolls within.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Scroller {
    /// The default window-like surface.
    #[default]
    Viewport,
    /// A designated scroll element, looked up by identifier.
    Element(String),
}

/// Immutable-after-construction grid settings.
#[derive(Clone)]
pub struct GridSpec {
    /// Identifier of the grid root element on the surface.
    pub container_id: String,
    /// Scroll surface the grid listens to and measures against.
    pub scroller: Scroller,
    /// Prefix for every class the grid writes.
    pub class_prefix: String,
    /// Tag name used for item container nodes.
    pub figure_tag: String,
    /// Spacing between items (and rows), in pixels.
    pub space_between_images: f32,
    /// Duration of position transitions, in milliseconds.
    pub transition_speed_ms: u64,
    /// Preload buffer in the direction of travel, in pixels.
    pub primary_image_buffer_height: f32,
    /// Preload buffer opposite the direction of travel, in pixels.
    pub secondary_image_buffer_height: f32,
    /// Size used for the low-resolution placeholder asset.
    pub thumbnail_size: u32,
    /// Delay before a materialized item attaches its assets, absorbing
    /// rapid scroll-then-unscroll without wasted fetches. Milliseconds.
    pub deferred_attach_delay_ms: u64,
    /// The transitioning window is `transition_speed_ms` times this
    /// factor; an approximation, since CSS transitions emit no reliable
    /// cross-item completion signal.
    pub transition_timeout_factor: f32,
    /// Window width to minimum row aspect ratio.
    pub get_min_aspect_ratio: MinAspectRatioFn,
    /// Window width to full-resolution asset size.
    pub get_image_size: ImageSizeFn,
    /// (identifier, size) to resource locator.
    pub url_for_size: UrlForSizeFn,
    /// Optional click notification.
    pub on_click: Option<ClickHandler>,
    /// Optional item-factory override for custom item variants.
    pub item_factory: Option<ItemFactory>,
    /// Unrecognized settings, passed through un-validated for factory
    /// overrides and other extensions to consume.
    pub extensions: IndexMap<String, String>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            container_id: "photowall".into(),
            scroller: Scroller::Viewport,
            class_prefix: "photowall".into(),
            figure_tag: "figure".into(),
            space_between_images: 8.0,
            transition_speed_ms: 500,
            primary_image_buffer_height: 1000.0,
            secondary_image_buffer_height: 300.0,
            thumbnail_size: 20,
            deferred_attach_delay_ms: 100,
            transition_timeout_factor: 1.5,
            get_min_aspect_ratio: Rc::new(|width| {
                if width <= 640.0 {
                    2.0
                } else if width <= 1280.0 {
                    4.0
                } else if width <= 1920.0 {
                    5.0
                } else {
                    6.0
                }
            }),
            get_image_size: Rc::new(|width| {
                if width <= 640.0 {
                    100
                } else if width <= 1920.0 {
                    250
                } else {
                    500
                }
            }),
            url_for_size: Rc::new(|filename, size| format!("/img/{}/{}", size, filename)),
            on_click: None,
            item_factory: None,
            extensions: IndexMap::new(),
        }
    }
}

impl GridSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = id.into();
        self
    }

    pub fn scroller(mut self, scroller: Scroller) -> Self {
        self.scroller = scroller;
        self
    }

    pub fn class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn figure_tag(mut self, tag: impl Into<String>) -> Self {
        self.figure_tag = tag.into();
        self
    }

    pub fn space_between_images(mut self, pixels: f32) -> Self {
        self.space_between_images = pixels;
        self
    }

    pub fn transition_speed_ms(mut self, milliseconds: u64) -> Self {
        self.transition_speed_ms = milliseconds;
        self
    }

    pub fn primary_image_buffer_height(mut self, pixels: f32) -> Self {
        self.primary_image_buffer_height = pixels;
        self
    }

    pub fn secondary_image_buffer_height(mut self, pixels: f32) -> Self {
        self.secondary_image_buffer_height = pixels;
        self
    }

    pub fn thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = size;
        self
    }

    pub fn deferred_attach_delay_ms(mut self, milliseconds: u64) -> Self {
        self.deferred_attach_delay_ms = milliseconds;
        self
    }

    pub fn transition_timeout_factor(mut self, factor: f32) -> Self {
        self.transition_timeout_factor = factor;
        self
    }

    pub fn get_min_aspect_ratio(mut self, f: impl Fn(f32) -> f32 + 'static) -> Self {
        self.get_min_aspect_ratio = Rc::new(f);
        self
    }

    pub fn get_image_size(mut self, f: impl Fn(f32) -> u32 + 'static) -> Self {
        self.get_image_size = Rc::new(f);
        self
    }

    pub fn url_for_size(mut self, f: impl Fn(&str, u32) -> String + 'static) -> Self {
        self.url_for_size = Rc::new(f);
        self
    }

    pub fn on_click(mut self, handler: impl Fn(&str) + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    pub fn item_factory(mut self, factory: ItemFactory) -> Self {
        self.item_factory = Some(factory);
        self
    }

    /// Records a pass-through extension setting.
    pub fn extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// Duration of the transitioning window: transition speed times the
    /// timeout factor.
    pub fn transition_window(&self) -> std::time::Duration {
        let millis = self.transition_speed_ms as f32 * self.transition_timeout_factor;
        std::time::Duration::from_millis(millis.max(0.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = GridSpec::default();
        assert_eq!(spec.space_between_images, 8.0);
        assert_eq!(spec.primary_image_buffer_height, 1000.0);
        assert_eq!(spec.secondary_image_buffer_height, 300.0);
        assert_eq!(spec.thumbnail_size, 20);
        assert_eq!((spec.url_for_size)("cat.jpg", 250), "/img/250/cat.jpg");
    }

    #[test]
    fn test_default_width_policies() {
        let spec = GridSpec::default();
        assert_eq!((spec.get_min_aspect_ratio)(500.0), 2.0);
        assert_eq!((spec.get_min_aspect_ratio)(1000.0), 4.0);
        assert_eq!((spec.get_min_aspect_ratio)(1900.0), 5.0);
        assert_eq!((spec.get_min_aspect_ratio)(2500.0), 6.0);
        assert_eq!((spec.get_image_size)(500.0), 100);
        assert_eq!((spec.get_image_size)(1900.0), 250);
        assert_eq!((spec.get_image_size)(2500.0), 500);
    }

    #[test]
    fn test_builder_overrides() {
        let spec = GridSpec::new()
            .container_id("wall")
            .space_between_images(4.0)
            .transition_speed_ms(250)
            .extension("theme", "dark");
        assert_eq!(spec.container_id, "wall");
        assert_eq!(spec.space_between_images, 4.0);
        assert_eq!(spec.transition_window(), std::time::Duration::from_millis(375));
        assert_eq!(spec.extensions.get("theme").map(String::as_str), Some("dark"));
    }
}
