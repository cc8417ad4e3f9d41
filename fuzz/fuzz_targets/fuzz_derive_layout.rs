#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pip_core::{Edges, Hints, Layout, LayoutGuides, Rect, Size, SnapContext, derive_layout};
use pip_core::{ContainerRegions, Insets, RegionConfig};

#[derive(Debug, Arbitrary)]
struct Input {
    bounds: (f32, f32, f32, f32),
    safe: (u8, u8, u8, u8),
    snap_inset: u8,
    collapse_inset: u8,
    snap_edges: u8,
    collapse_edges: u8,
    frame: (f32, f32, f32, f32),
    snap_hint: Option<bool>,
    collapse_hint: Option<bool>,
}

fn finite(v: f32) -> f64 {
    if v.is_finite() { f64::from(v).clamp(-1.0e6, 1.0e6) } else { 0.0 }
}

fn positive(v: f32) -> f64 {
    finite(v).abs().max(1.0)
}

fuzz_target!(|input: Input| {
    let bounds = Rect::new(
        finite(input.bounds.0),
        finite(input.bounds.1),
        positive(input.bounds.2),
        positive(input.bounds.3),
    );
    let safe = Insets::new(
        f64::from(input.safe.0),
        f64::from(input.safe.1),
        f64::from(input.safe.2),
        f64::from(input.safe.3),
    );
    let config = RegionConfig {
        snap_edges: Edges::from_bits_truncate(input.snap_edges),
        collapse_edges: Edges::from_bits_truncate(input.collapse_edges),
        snap_insets: Insets::all(f64::from(input.snap_inset)),
        collapse_insets: Insets::all(f64::from(input.collapse_inset)),
    };
    let regions = ContainerRegions::compute(bounds, safe, &config);
    let ctx = SnapContext::new(&regions, &config);
    let frame = Rect::new(
        finite(input.frame.0),
        finite(input.frame.1),
        positive(input.frame.2),
        positive(input.frame.3),
    );
    let hints = Hints {
        snap: input.snap_hint,
        collapse: input.collapse_hint,
    };

    let layout = derive_layout(frame, &ctx, hints);
    assert!(
        Layout::new(
            layout.top(),
            layout.leading(),
            layout.bottom(),
            layout.trailing(),
            layout.collapse_edge(),
        )
        .is_ok(),
        "derived layout failed validation: {layout:?}"
    );
    if let Some(edge) = layout.collapse_edge() {
        assert!(config.collapse_edges.has(edge));
    }

    // Resolving the layout must never panic and keeps the window's size.
    let mut guides = LayoutGuides::new(&regions);
    let resolved = guides
        .resolve_frame(&layout, Size::new(frame.width, frame.height))
        .expect("derived fractions are in range");
    assert_eq!(resolved.width, frame.width);
    assert_eq!(resolved.height, frame.height);
});
