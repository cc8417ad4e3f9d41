#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pip_core::{Edges, FlingConfig, Rect, SnapContext, Vector, plan_settle};

#[derive(Debug, Arbitrary)]
struct Input {
    snap: (u16, u16, u16, u16),
    collapse_inset: u8,
    snap_edges: u8,
    collapse_edges: u8,
    frame: (i16, i16, u16, u16),
    velocity: (f64, f64),
}

fuzz_target!(|input: Input| {
    let snap = Rect::new(
        f64::from(input.snap.0),
        f64::from(input.snap.1),
        f64::from(input.snap.2.max(1)),
        f64::from(input.snap.3.max(1)),
    );
    let inset = f64::from(input.collapse_inset);
    let collapse = Rect::new(
        snap.x + inset,
        snap.y + inset,
        (snap.width - 2.0 * inset).max(0.0),
        (snap.height - 2.0 * inset).max(0.0),
    );
    let ctx = SnapContext {
        snap,
        collapse,
        snap_edges: Edges::from_bits_truncate(input.snap_edges),
        collapse_edges: Edges::from_bits_truncate(input.collapse_edges),
    };
    let frame = Rect::new(
        f64::from(input.frame.0),
        f64::from(input.frame.1),
        f64::from(input.frame.2.max(1)),
        f64::from(input.frame.3.max(1)),
    );
    let fling = FlingConfig::default();

    let plan = plan_settle(Vector::new(input.velocity.0, input.velocity.1), frame, &ctx, &fling);
    assert!(plan.velocity.max_abs() <= fling.max_velocity);
    assert!(plan.settle_point.x.is_finite() && plan.settle_point.y.is_finite());

    // The settle center keeps at least part of the window over the snap region.
    let (hw, hh) = (frame.width / 2.0, frame.height / 2.0);
    let slack = 1e-6;
    assert!(plan.settle_point.x >= snap.min_x() - hw - slack);
    assert!(plan.settle_point.x <= snap.max_x() + hw + slack);
    assert!(plan.settle_point.y >= snap.min_y() - hh - slack);
    assert!(plan.settle_point.y <= snap.max_y() + hh + slack);
});
