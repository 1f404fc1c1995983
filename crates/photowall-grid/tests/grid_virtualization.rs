//! End-to-end virtualization behavior: materialization windows, scroll
//! eviction, frame coalescing, and the deferred-attachment race.

use std::time::Duration;

use photowall_grid::{GridSpec, ItemRecord, TransitionSpec};
use photowall_testing::{GridTestRule, SurfaceOp};

/// `count` square images named img0.jpg, img1.jpg, ...
fn square_records(count: usize) -> Vec<ItemRecord> {
    (0..count)
        .map(|index| ItemRecord::new(format!("img{}.jpg", index), 1.0))
        .collect()
}

/// Default surface is 1280x800: min aspect ratio 4, so unit-ratio items
/// pack 4 per row with row height (1280 - 24) / 4 = 314.
fn rule_with_rows() -> GridTestRule {
    let rule = GridTestRule::new(square_records(40), GridSpec::default());
    rule.grid.enable();
    rule
}

#[test]
fn test_enable_materializes_window_and_sets_height() {
    let rule = rule_with_rows();

    // 10 rows of height 314 with 9 gaps of 8.
    let expected_height = 10.0 * 314.0 + 9.0 * 8.0;
    assert!((rule.grid.total_content_height() - expected_height).abs() < 1e-3);
    assert_eq!(
        rule.surface.container_height_of(rule.container),
        Some(rule.grid.total_content_height())
    );

    // Initial window (direction down): [-300, 1800]; rows at y = 0, 322,
    // ..., 1610 intersect, so 6 rows of 4 items are live.
    assert_eq!(rule.materialized_count(), 24);
    assert_eq!(rule.attached_figures().len(), 24);
}

#[test]
fn test_scroll_evicts_behind_and_materializes_ahead() {
    let rule = rule_with_rows();

    rule.scroll_to(2000.0);
    rule.pump_frame();

    // Window (down): [1700, 3800]; rows 5..=9 intersect.
    assert_eq!(rule.materialized_count(), 20);
    rule.grid.with_items(|items| {
        assert!(!items[0].is_materialized());
        assert!(items[39].is_materialized());
    });
}

#[test]
fn test_scroll_burst_coalesces_to_one_frame() {
    let rule = rule_with_rows();
    rule.surface.clear_ops();

    for offset in [400.0, 800.0, 1200.0, 1600.0, 2000.0] {
        rule.scroll_to(offset);
    }
    // Five synchronous notifications, one scheduled application pass.
    assert_eq!(rule.scheduler.pending_frames(), 1);

    rule.pump_frame();
    assert_eq!(rule.scheduler.pending_frames(), 0);
    // The pass used the latest offset (2000): rows 5..=9 live.
    assert_eq!(rule.materialized_count(), 20);

    // The guard resets: a fresh scroll schedules a fresh frame.
    rule.scroll_to(2100.0);
    assert_eq!(rule.scheduler.pending_frames(), 1);
}

#[test]
fn test_visibility_pass_is_idempotent_on_surface() {
    let rule = rule_with_rows();

    // Two tiny downward scrolls that keep the same rows in the window:
    // the second pass re-decides every item identically and must not
    // touch the node tree.
    rule.scroll_to(5.0);
    rule.pump_frame();
    rule.surface.clear_ops();

    rule.scroll_to(6.0);
    rule.pump_frame();

    let churn: Vec<SurfaceOp> = rule
        .surface
        .ops()
        .into_iter()
        .filter(|op| matches!(op, SurfaceOp::Append { .. } | SurfaceOp::Remove { .. }))
        .collect();
    assert_eq!(churn, Vec::new());
}

#[test]
fn test_deferred_attach_loads_thumbnail_then_full() {
    let rule = rule_with_rows();

    // Before the delay elapses nothing is fetched.
    let figure = rule.attached_figures()[0];
    assert!(rule.surface.children_of(figure).is_empty());

    rule.advance(Duration::from_millis(100));
    let children = rule.surface.children_of(figure);
    assert_eq!(children.len(), 2);

    let thumbnail = children[0];
    let full = children[1];
    assert_eq!(
        rule.surface.image_source_of(thumbnail).as_deref(),
        Some("/img/20/img0.jpg")
    );
    // 1280 wide viewport resolves to the 250 asset size.
    assert_eq!(
        rule.surface.image_source_of(full).as_deref(),
        Some("/img/250/img0.jpg")
    );

    // Each asset styles itself on its own completion notification.
    assert!(rule.surface.fire_load(thumbnail));
    assert!(rule.surface.has_class(thumbnail, "photowall-loaded"));
    assert!(!rule.surface.has_class(full, "photowall-loaded"));
    assert!(rule.surface.fire_load(full));
    assert!(rule.surface.has_class(full, "photowall-loaded"));
}

#[test]
fn test_fast_scroll_cancels_deferred_attach() {
    let rule = rule_with_rows();
    rule.surface.clear_ops();

    // Evict everything before the attach delay elapses.
    rule.scroll_to(50_000.0);
    rule.pump_frame();
    rule.advance(Duration::from_millis(200));

    let fetches: Vec<SurfaceOp> = rule
        .surface
        .ops()
        .into_iter()
        .filter(|op| matches!(op, SurfaceOp::SetSource { .. }))
        .collect();
    assert_eq!(fetches, Vec::new());
    assert_eq!(rule.materialized_count(), 0);
}

#[test]
fn test_late_load_notification_after_eviction_is_inert() {
    let rule = rule_with_rows();
    rule.advance(Duration::from_millis(100));

    let figure = rule.attached_figures()[0];
    let thumbnail = rule.surface.children_of(figure)[0];

    // Evict the item; its sources are cleared before detachment.
    rule.scroll_to(50_000.0);
    rule.pump_frame();
    assert!(!rule.surface.is_attached(figure));
    assert_eq!(rule.surface.image_source_of(thumbnail), None);

    // The fetch completion arrives late: nothing is styled, nothing is
    // re-inserted, nothing panics.
    rule.surface.clear_ops();
    rule.surface.fire_load(thumbnail);
    assert!(!rule.surface.has_class(thumbnail, "photowall-loaded"));
    assert!(!rule.surface.is_attached(figure));
    assert_eq!(rule.surface.ops(), Vec::new());
}

#[test]
fn test_eviction_clears_sources_before_removal() {
    let rule = rule_with_rows();
    rule.advance(Duration::from_millis(100));

    let figure = rule.attached_figures()[0];
    let thumbnail = rule.surface.children_of(figure)[0];
    rule.surface.clear_ops();

    rule.scroll_to(50_000.0);
    rule.pump_frame();

    let ops = rule.surface.ops();
    let clear_position = ops
        .iter()
        .position(|op| *op == SurfaceOp::ClearSource { node: thumbnail })
        .expect("thumbnail source must be cleared");
    let remove_position = ops
        .iter()
        .position(|op| *op == SurfaceOp::Remove { node: figure })
        .expect("figure must be removed");
    assert!(clear_position < remove_position);
}

#[test]
fn test_geometry_updates_restyle_live_figures() {
    let rule = rule_with_rows();
    let figure = rule.attached_figures()[0];
    let before = rule.surface.geometry_of(figure).expect("figure is styled");
    assert_eq!(before.transition, TransitionSpec::None);

    // A narrower surface re-packs into shorter rows and restyles live
    // figures in place.
    rule.resize_viewport(700.0, 800.0);
    rule.pump_frame();

    let after = rule.surface.geometry_of(figure).expect("figure is styled");
    assert!(after.height < before.height);
}
