//! End-to-end scenarios: container → regions → drag release → settle →
//! layout → frame.

use pip_core::{
    ContainerRegions, Dimension, Edge, Edges, FlingConfig, Hints, Insets, Layout, LayoutGuides,
    PercentLayoutGuide, Rect, RegionConfig, Size, SnapContext, Vector, clamp_velocity,
    derive_layout, plan_settle,
};

const EPS: f64 = 1e-9;

fn regions(config: &RegionConfig) -> ContainerRegions {
    ContainerRegions::compute(Rect::new(0.0, 0.0, 300.0, 600.0), Insets::ZERO, config)
}

#[test]
fn corner_frame_snaps_to_leading_bottom() {
    let config = RegionConfig {
        snap_edges: Edges::LEFT | Edges::BOTTOM,
        ..RegionConfig::default()
    };
    let ctx = SnapContext::new(&regions(&config), &config);
    let layout = derive_layout(Rect::new(10.0, 500.0, 160.0, 90.0), &ctx, Hints::NONE);
    assert_eq!(layout, Layout::new(None, Some(0.0), Some(0.0), None, None).unwrap());
}

#[test]
fn frame_past_right_collapse_boundary_collapses() {
    let config = RegionConfig {
        snap_edges: Edges::all(),
        collapse_edges: Edges::RIGHT,
        collapse_insets: Insets::new(0.0, 0.0, 0.0, 40.0),
        ..RegionConfig::default()
    };
    let regions = regions(&config);
    let ctx = SnapContext::new(&regions, &config);
    // Center at x = 280, beyond collapse max_x = 260.
    let frame = Rect::new(200.0, 100.0, 160.0, 90.0);
    let layout = derive_layout(frame, &ctx, Hints::NONE);
    assert_eq!(layout.collapse_edge(), Some(Edge::Right));
    assert_eq!(layout.top(), Some(0.0));
    assert_eq!(layout.leading(), None);
    assert_eq!(layout.trailing(), None);
}

#[test]
fn quarter_width_guide() {
    let mut guide = PercentLayoutGuide::new(Dimension::Width, Rect::new(0.0, 0.0, 400.0, 50.0));
    guide.set_percent(0.25).unwrap();
    let frame = guide.frame();
    assert!((frame.width - 200.0).abs() < EPS);
    assert!((frame.mid_x() - 200.0).abs() < EPS);
}

#[test]
fn fast_fling_is_capped() {
    assert_eq!(
        clamp_velocity(Vector::new(3000.0, 0.0), 2000.0),
        Vector::new(2000.0, 0.0)
    );
}

#[test]
fn fling_settles_on_far_side_and_round_trips_through_guides() {
    let config = RegionConfig {
        snap_edges: Edges::all(),
        snap_insets: Insets::all(8.0),
        ..RegionConfig::default()
    };
    let regions = regions(&config);
    let ctx = SnapContext::new(&regions, &config);
    let size = Size::new(120.0, 80.0);
    let frame = Rect::new(20.0, 300.0, size.width, size.height);

    let plan = plan_settle(Vector::new(1800.0, -300.0), frame, &ctx, &FlingConfig::default());
    let settled = frame.with_center(plan.settle_point);
    assert!((settled.max_x() - regions.snap().max_x()).abs() < EPS);

    let layout = derive_layout(settled, &ctx, Hints::NONE);
    assert_eq!(layout.trailing(), Some(0.0));

    let mut guides = LayoutGuides::new(&regions);
    let resolved = guides.resolve_frame(&layout, size).unwrap();
    assert!((resolved.x - settled.x).abs() < EPS);
    assert!((resolved.y - settled.y).abs() < EPS);
}

#[test]
fn expand_then_collapse_hint_cycle() {
    let config = RegionConfig {
        snap_edges: Edges::all(),
        collapse_edges: Edges::LEFT | Edges::RIGHT,
        collapse_insets: Insets::new(0.0, 40.0, 0.0, 40.0),
        ..RegionConfig::default()
    };
    let regions = regions(&config);
    let ctx = SnapContext::new(&regions, &config);
    let size = Size::new(100.0, 60.0);
    let frame = Rect::new(10.0, 20.0, size.width, size.height);
    let mut guides = LayoutGuides::new(&regions);

    let collapsed = derive_layout(frame, &ctx, Hints::COLLAPSE);
    assert_eq!(collapsed.collapse_edge(), Some(Edge::Left));
    let docked = guides.resolve_frame(&collapsed, size).unwrap();
    assert!((docked.max_x() - 40.0).abs() < EPS);

    let expanded = derive_layout(docked, &ctx, Hints::EXPAND);
    assert!(!expanded.is_collapsed());
    assert_eq!(expanded.leading(), Some(0.0));
    let shown = guides.resolve_frame(&expanded, size).unwrap();
    assert!((shown.x - 0.0).abs() < EPS);
}
