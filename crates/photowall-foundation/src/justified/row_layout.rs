//! Core row-packing algorithm for the justified grid.
//!
//! Turns a flat, ordered list of aspect ratios into justified rows with
//! explicit pixel geometry. Pure and deterministic: identical inputs
//! produce identical outputs, and nothing here touches the rendering
//! surface.

use smallvec::SmallVec;

use super::item_data::{Geometry, TransitionSpec};

/// Replacement value for non-finite or non-positive aspect ratios.
///
/// Degenerate ratios would otherwise produce negative or NaN geometry;
/// they are substituted with this very-tall-portrait value and reported
/// through a single `log::warn!` per pass.
pub const MIN_ASPECT_RATIO_FLOOR: f32 = 0.1;

/// Configuration for one layout pass.
#[derive(Clone, Debug)]
pub struct RowLayoutConfig {
    /// Pixel width of the grid container.
    pub container_width: f32,

    /// Spacing between items, in pixels. Also used between rows.
    pub spacing: f32,

    /// Minimum aspect-ratio sum a row must reach before it closes.
    /// Higher values pack more items per row and produce shorter rows.
    pub min_aspect_ratio: f32,

    /// Transition annotation stamped onto every produced geometry.
    /// Sourced from the grid's transition state, not computed here.
    pub transition: TransitionSpec,
}

/// Result of one layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JustifiedLayout {
    /// One geometry per input aspect ratio, in input order.
    pub geometries: Vec<Geometry>,

    /// Total content height in pixels, without a trailing gap.
    pub total_height: f32,
}

/// Packs `aspect_ratios` into justified rows and returns the geometry for
/// every item plus the grid's total height.
///
/// Walks items in sequence order, accumulating a running aspect-ratio sum.
/// A row closes when the sum reaches `min_aspect_ratio` or at the end of
/// the list. On close the row's ratio is clamped up to at least the
/// minimum, so a short trailing row is not stretched absurdly tall; the
/// trailing items are instead enlarged/cropped to the clamped ratio, which
/// is accepted behavior.
///
/// Row height is `(container_width - spacing * (n - 1)) / row_ratio`; each
/// item's width is `row_height * aspect_ratio`, placed at a running
/// horizontal cursor, with rows stacked at a running vertical cursor.
pub fn compute_justified_layout(
    aspect_ratios: &[f32],
    config: &RowLayoutConfig,
) -> JustifiedLayout {
    if !config.container_width.is_finite() || config.container_width <= 0.0 {
        log::warn!(
            "justified layout: degenerate container width {}, producing empty layout",
            config.container_width
        );
        return JustifiedLayout::default();
    }

    let mut geometries = Vec::with_capacity(aspect_ratios.len());
    let mut row: SmallVec<[f32; 8]> = SmallVec::new();
    let mut row_ratio_sum = 0.0f32;
    let mut translate_y = 0.0f32;
    let mut warned_degenerate = false;

    for (index, &raw_ratio) in aspect_ratios.iter().enumerate() {
        let ratio = sanitize_aspect_ratio(raw_ratio, &mut warned_degenerate);
        row.push(ratio);
        row_ratio_sum += ratio;

        let at_end = index == aspect_ratios.len() - 1;
        if row_ratio_sum >= config.min_aspect_ratio || at_end {
            // Clamp up so a short trailing row keeps a bounded height.
            let row_ratio = row_ratio_sum.max(config.min_aspect_ratio);
            let interior_spacing = config.spacing * (row.len() - 1) as f32;
            let row_height = (config.container_width - interior_spacing) / row_ratio;

            let mut translate_x = 0.0f32;
            for &item_ratio in &row {
                let width = row_height * item_ratio;
                geometries.push(Geometry {
                    width,
                    height: row_height,
                    translate_x,
                    translate_y,
                    transition: config.transition.clone(),
                });
                translate_x += width + config.spacing;
            }

            translate_y += row_height + config.spacing;
            row.clear();
            row_ratio_sum = 0.0;
        }
    }

    JustifiedLayout {
        geometries,
        // The last row contributes no trailing gap.
        total_height: (translate_y - config.spacing).max(0.0),
    }
}

fn sanitize_aspect_ratio(raw: f32, warned: &mut bool) -> f32 {
    if raw.is_finite() && raw > 0.0 {
        return raw;
    }
    if !*warned {
        log::warn!(
            "justified layout: replacing degenerate aspect ratio {} with {}",
            raw,
            MIN_ASPECT_RATIO_FLOOR
        );
        *warned = true;
    }
    MIN_ASPECT_RATIO_FLOOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop_config() -> RowLayoutConfig {
        RowLayoutConfig {
            container_width: 1000.0,
            spacing: 8.0,
            min_aspect_ratio: 5.0,
            transition: TransitionSpec::None,
        }
    }

    #[test]
    fn test_empty_input() {
        let layout = compute_justified_layout(&[], &desktop_config());
        assert!(layout.geometries.is_empty());
        assert_eq!(layout.total_height, 0.0);
    }

    #[test]
    fn test_row_packing_scenario() {
        // First row accumulates until the sum reaches 5:
        // 1.777 + 1.5 + 1.777 + 1.777 = 6.831 closes row 1 with 4 items.
        // The remaining 2 items (1 + 2.4 = 3.4) form the trailing row,
        // clamped up to ratio 5.
        let ratios = [1.777, 1.5, 1.777, 1.777, 1.0, 2.4];
        let layout = compute_justified_layout(&ratios, &desktop_config());

        assert_eq!(layout.geometries.len(), 6);

        let row1_height = layout.geometries[0].height;
        for geometry in &layout.geometries[..4] {
            assert_eq!(geometry.height, row1_height);
            assert_eq!(geometry.translate_y, 0.0);
        }
        let expected_row1 = (1000.0 - 8.0 * 3.0) / 6.831;
        assert!((row1_height - expected_row1).abs() < 1e-3);

        // Trailing row is clamped to the minimum ratio of 5.
        let row2_height = layout.geometries[4].height;
        let expected_row2 = (1000.0 - 8.0) / 5.0;
        assert!((row2_height - expected_row2).abs() < 1e-3);
        for geometry in &layout.geometries[4..] {
            assert_eq!(geometry.translate_y, row1_height + 8.0);
        }

        assert!((layout.total_height - (row1_height + 8.0 + row2_height)).abs() < 1e-3);
    }

    #[test]
    fn test_full_rows_fill_container_width() {
        let config = desktop_config();
        let ratios = [1.2, 0.8, 1.777, 1.5, 0.9, 1.1, 2.0, 1.3, 0.7, 1.6, 1.4];
        let layout = compute_justified_layout(&ratios, &config);

        // Group produced geometries back into rows by translate_y.
        let mut index = 0;
        while index < layout.geometries.len() {
            let row_y = layout.geometries[index].translate_y;
            let mut row_end = index;
            while row_end < layout.geometries.len()
                && layout.geometries[row_end].translate_y == row_y
            {
                row_end += 1;
            }
            let row = &layout.geometries[index..row_end];
            let ratio_sum: f32 = ratios[index..row_end].iter().sum();
            let width_sum: f32 = row.iter().map(|g| g.width).sum();
            let interior = config.spacing * (row.len() - 1) as f32;

            if ratio_sum >= config.min_aspect_ratio {
                // Closed by threshold: the row exactly fills the container,
                // within a rounding tolerance of 1px per item.
                assert!(
                    (width_sum + interior - config.container_width).abs() < row.len() as f32,
                    "row at y={} fills {} of {}",
                    row_y,
                    width_sum + interior,
                    config.container_width
                );
            } else {
                // Clamped trailing row: underfills by construction.
                assert!(width_sum + interior < config.container_width);
            }
            index = row_end;
        }
    }

    #[test]
    fn test_height_grows_per_completed_row() {
        let config = desktop_config();
        // Three items of 1.777 sum to 5.331, closing one row at a time.
        let heights: Vec<f32> = [3, 6, 9, 12]
            .iter()
            .map(|&n| {
                let ratios = vec![1.777f32; n];
                compute_justified_layout(&ratios, &config).total_height
            })
            .collect();

        for pair in heights.windows(2) {
            assert!(pair[1] > pair[0], "height must grow per appended row");
        }
    }

    #[test]
    fn test_idempotent() {
        let ratios = [1.777, 1.5, 0.9, 2.4, 1.0];
        let config = desktop_config();
        let first = compute_justified_layout(&ratios, &config);
        let second = compute_justified_layout(&ratios, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_trailing_item_is_clamped() {
        let layout = compute_justified_layout(&[1.0], &desktop_config());
        assert_eq!(layout.geometries.len(), 1);

        // End-of-list closes the row; ratio 1 is clamped to 5.
        let geometry = &layout.geometries[0];
        assert_eq!(geometry.height, 1000.0 / 5.0);
        assert_eq!(geometry.width, geometry.height * 1.0);
        assert_eq!(layout.total_height, geometry.height);
    }

    #[test]
    fn test_degenerate_ratios_are_replaced() {
        let layout =
            compute_justified_layout(&[f32::NAN, -2.0, 0.0, 1.5], &desktop_config());
        assert_eq!(layout.geometries.len(), 4);
        for geometry in &layout.geometries {
            assert!(geometry.width.is_finite() && geometry.width > 0.0);
            assert!(geometry.height.is_finite() && geometry.height > 0.0);
        }
    }

    #[test]
    fn test_degenerate_container_width() {
        let mut config = desktop_config();
        config.container_width = 0.0;
        let layout = compute_justified_layout(&[1.0, 2.0], &config);
        assert_eq!(layout, JustifiedLayout::default());
    }

    #[test]
    fn test_transition_passes_through() {
        let mut config = desktop_config();
        config.transition = TransitionSpec::Ease {
            duration: std::time::Duration::from_millis(500),
        };
        let layout = compute_justified_layout(&[1.0, 2.0], &config);
        for geometry in &layout.geometries {
            assert_eq!(geometry.transition, config.transition);
        }
    }
}
