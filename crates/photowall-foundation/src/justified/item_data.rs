//! Input records and computed geometry for grid items.

use std::time::Duration;

/// CSS-transition annotation carried by every computed [`Geometry`].
///
/// `None` is the explicit no-op value; `Ease` requests an eased transform
/// transition of the given duration so items animate to new positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TransitionSpec {
    /// No transition; geometry changes are applied instantly.
    #[default]
    None,
    /// Eased transition over `duration`.
    Ease {
        /// Duration of the transition.
        duration: Duration,
    },
}

/// Computed pixel geometry for a single grid item.
///
/// Assigned by the layout pass and overwritten (never recreated) on every
/// subsequent pass. Whether the item is currently on the rendering surface
/// is tracked separately; geometry exists for every item at all times.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    /// Item width in pixels.
    pub width: f32,
    /// Item height in pixels (equal to its row's height).
    pub height: f32,
    /// Horizontal offset from the container's left edge.
    pub translate_x: f32,
    /// Vertical offset from the container's top edge.
    pub translate_y: f32,
    /// Transition annotation sourced from the grid's transition state.
    pub transition: TransitionSpec,
}

/// One caller-supplied grid entry.
///
/// `filename` doubles as the stable identifier handed to the resource
/// locator and click notifications. `caption` and `group` are pass-through
/// extension fields consumed by the decorated item variants.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemRecord {
    /// Stable identifier / filename of the image.
    pub filename: String,
    /// Aspect ratio as width / height. Must be positive for sane layouts.
    pub aspect_ratio: f32,
    /// Optional caption rendered as an overlay by the captioned item variant.
    pub caption: Option<String>,
    /// Optional group name; the first record of each run of equal group
    /// names gets a group headline.
    pub group: Option<String>,
}

impl ItemRecord {
    /// Creates a record with no decoration fields.
    pub fn new(filename: impl Into<String>, aspect_ratio: f32) -> Self {
        Self {
            filename: filename.into(),
            aspect_ratio,
            caption: None,
            group: None,
        }
    }

    /// Sets the caption extension field.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Sets the group extension field.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}
