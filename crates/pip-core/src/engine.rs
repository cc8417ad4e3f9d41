#![forbid(unsafe_code)]

//! Geometry engine: pixel frame to [`Layout`].
//!
//! [`derive_layout`] answers "given where the window is right now, which
//! normalized layout describes it?". Each axis is decided independently:
//!
//! 1. The half of the snap region holding the frame's center picks the edge
//!    (`top` vs `bottom`, `left` vs `right`) that anchors this axis.
//! 2. A priority-ordered rule chain, where every rule only applies if the
//!    edge is enabled in the relevant edge set:
//!    - collapse hint `true`, collapse-enabled: collapse onto the edge
//!    - collapse hint `false`, collapse-enabled: flush at 0
//!    - snap hint `true`, snap-enabled: flush at 0
//!    - snap hint `false`, snap-enabled: free fraction
//!    - center past the collapse region on this edge, collapse-enabled: collapse
//!    - snap-enabled: flush at 0
//!    - otherwise: free fraction
//!
//! The free fraction is the frame's distance from the snap region's edge,
//! clamped so the frame stays inside the region, divided by the region's
//! extent.
//!
//! The vertical axis is decided first. If it collapses, the horizontal axis
//! skips its collapse rules: a layout docks on at most one edge.

use crate::edge::Edge;
use crate::geometry::{Axis, Rect};
use crate::layout::{Anchor, Layout};
use crate::region::SnapContext;

/// Explicit snap/collapse requests overriding boundary inference.
///
/// `None` leaves the decision to the frame's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hints {
    pub snap: Option<bool>,
    pub collapse: Option<bool>,
}

impl Hints {
    /// Natural settling: no overrides.
    pub const NONE: Self = Self {
        snap: None,
        collapse: None,
    };

    /// Force a collapse onto the nearest collapse-enabled edge.
    pub const COLLAPSE: Self = Self {
        snap: None,
        collapse: Some(true),
    };

    /// Force the window fully on-screen.
    pub const EXPAND: Self = Self {
        snap: None,
        collapse: Some(false),
    };
}

/// Decision for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
enum AxisPlacement {
    Anchored(Anchor),
    Collapsed(Edge),
}

/// Derive the layout that best describes `frame`.
pub fn derive_layout(frame: Rect, ctx: &SnapContext, hints: Hints) -> Layout {
    let vertical = place_axis(Axis::Vertical, frame, ctx, hints, true);
    let horizontal = place_axis(
        Axis::Horizontal,
        frame,
        ctx,
        hints,
        !matches!(vertical, AxisPlacement::Collapsed(_)),
    );

    let (vertical_anchor, horizontal_anchor, collapse_edge) = match (vertical, horizontal) {
        (AxisPlacement::Anchored(v), AxisPlacement::Anchored(h)) => (Some(v), Some(h), None),
        (AxisPlacement::Collapsed(edge), AxisPlacement::Anchored(h)) => (None, Some(h), Some(edge)),
        (AxisPlacement::Anchored(v), AxisPlacement::Collapsed(edge)) => (Some(v), None, Some(edge)),
        // Excluded by `allow_collapse`; fall back to anchoring the vertical axis.
        (AxisPlacement::Collapsed(_), AxisPlacement::Collapsed(edge)) => {
            let v = Anchor {
                edge: Edge::pair(Axis::Vertical).0,
                fraction: 0.0,
            };
            (Some(v), None, Some(edge))
        }
    };

    // Every branch above produces one placement per axis with fractions
    // in [0, 1], so validation cannot fail.
    Layout::from_anchors(vertical_anchor, horizontal_anchor, collapse_edge)
        .unwrap_or_default()
}

fn place_axis(
    axis: Axis,
    frame: Rect,
    ctx: &SnapContext,
    hints: Hints,
    allow_collapse: bool,
) -> AxisPlacement {
    let (near, far) = Edge::pair(axis);
    let center = frame.mid(axis);
    let edge = if center < ctx.snap.mid(axis) { near } else { far };

    let collapse_enabled = ctx.collapse_edges.has(edge);
    let can_collapse = allow_collapse && collapse_enabled;
    let can_snap = ctx.snap_edges.has(edge);

    let flush = AxisPlacement::Anchored(Anchor {
        edge,
        fraction: 0.0,
    });
    let free = || {
        AxisPlacement::Anchored(Anchor {
            edge,
            fraction: free_fraction(axis, edge, frame, ctx.snap),
        })
    };

    if hints.collapse == Some(true) && can_collapse {
        AxisPlacement::Collapsed(edge)
    } else if hints.collapse == Some(false) && collapse_enabled {
        flush
    } else if hints.snap == Some(true) && can_snap {
        flush
    } else if hints.snap == Some(false) && can_snap {
        free()
    } else if can_collapse && crossed_collapse_boundary(axis, edge, center, ctx.collapse) {
        AxisPlacement::Collapsed(edge)
    } else if can_snap {
        flush
    } else {
        free()
    }
}

/// Whether `center` lies past the collapse region on `edge`.
#[inline]
pub(crate) fn crossed_collapse_boundary(axis: Axis, edge: Edge, center: f64, collapse: Rect) -> bool {
    if edge.is_near() {
        center < collapse.min(axis)
    } else {
        center > collapse.max(axis)
    }
}

/// Distance of `frame` from the snap region's `edge` as a fraction of the
/// region's extent, clamped so that the frame stays inside the region.
pub fn free_fraction(axis: Axis, edge: Edge, frame: Rect, snap: Rect) -> f64 {
    let extent = snap.extent(axis);
    if !(extent > 0.0) {
        return 0.0;
    }
    let distance = if edge.is_near() {
        frame.min(axis) - snap.min(axis)
    } else {
        snap.max(axis) - frame.max(axis)
    };
    let max_distance = (extent - frame.extent(axis)).max(0.0);
    let fraction = distance.min(max_distance).max(0.0) / extent;
    fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edges;

    const EPS: f64 = 1e-9;

    fn ctx(snap_edges: Edges, collapse_edges: Edges) -> SnapContext {
        SnapContext {
            snap: Rect::new(0.0, 0.0, 300.0, 600.0),
            collapse: Rect::new(40.0, 40.0, 220.0, 520.0),
            snap_edges,
            collapse_edges,
        }
    }

    #[test]
    fn bottom_left_snaps_flush() {
        let frame = Rect::new(10.0, 500.0, 160.0, 90.0);
        let layout = derive_layout(frame, &ctx(Edges::LEFT | Edges::BOTTOM, Edges::empty()), Hints::NONE);
        assert_eq!(layout.leading(), Some(0.0));
        assert_eq!(layout.bottom(), Some(0.0));
        assert_eq!(layout.top(), None);
        assert_eq!(layout.trailing(), None);
        assert_eq!(layout.collapse_edge(), None);
    }

    #[test]
    fn collapse_on_right_keeps_vertical_anchor() {
        // Center x = 280 > collapse max x 260.
        let frame = Rect::new(200.0, 100.0, 160.0, 90.0);
        let layout = derive_layout(frame, &ctx(Edges::TOP, Edges::RIGHT), Hints::NONE);
        assert_eq!(layout.collapse_edge(), Some(Edge::Right));
        assert_eq!(layout.top(), Some(0.0));
        assert_eq!(layout.leading(), None);
        assert_eq!(layout.trailing(), None);
    }

    #[test]
    fn free_axis_uses_clamped_fraction() {
        let frame = Rect::new(30.0, 120.0, 100.0, 100.0);
        let layout = derive_layout(frame, &ctx(Edges::empty(), Edges::empty()), Hints::NONE);
        assert!((layout.top().unwrap() - 120.0 / 600.0).abs() < EPS);
        assert!((layout.leading().unwrap() - 30.0 / 300.0).abs() < EPS);
    }

    #[test]
    fn far_edge_fraction_measures_from_far_side() {
        let frame = Rect::new(180.0, 400.0, 100.0, 100.0);
        let layout = derive_layout(frame, &ctx(Edges::empty(), Edges::empty()), Hints::NONE);
        assert!((layout.bottom().unwrap() - 100.0 / 600.0).abs() < EPS);
        assert!((layout.trailing().unwrap() - 20.0 / 300.0).abs() < EPS);
    }

    #[test]
    fn fraction_clamps_outside_frames() {
        let frame = Rect::new(-50.0, -20.0, 100.0, 100.0);
        let layout = derive_layout(frame, &ctx(Edges::empty(), Edges::empty()), Hints::NONE);
        assert_eq!(layout.top(), Some(0.0));
        assert_eq!(layout.leading(), Some(0.0));
    }

    #[test]
    fn oversized_frame_fraction_is_zero() {
        let frame = Rect::new(-10.0, 10.0, 400.0, 100.0);
        let layout = derive_layout(frame, &ctx(Edges::empty(), Edges::empty()), Hints::NONE);
        assert!(layout.leading().or(layout.trailing()).unwrap().abs() < EPS);
    }

    #[test]
    fn collapse_hint_true_collapses_enabled_edge() {
        let frame = Rect::new(100.0, 50.0, 100.0, 100.0);
        let layout = derive_layout(frame, &ctx(Edges::all(), Edges::TOP), Hints::COLLAPSE);
        assert_eq!(layout.collapse_edge(), Some(Edge::Top));
        assert!(layout.leading().is_some() || layout.trailing().is_some());
    }

    #[test]
    fn collapse_hint_false_expands_collapsed_window() {
        // Past the collapse boundary on the right.
        let frame = Rect::new(250.0, 100.0, 100.0, 100.0);
        let c = ctx(Edges::empty(), Edges::RIGHT);
        assert_eq!(derive_layout(frame, &c, Hints::NONE).collapse_edge(), Some(Edge::Right));

        let expanded = derive_layout(frame, &c, Hints::EXPAND);
        assert_eq!(expanded.collapse_edge(), None);
        assert_eq!(expanded.trailing(), Some(0.0));
    }

    #[test]
    fn snap_hint_false_frees_snap_edge() {
        let frame = Rect::new(30.0, 120.0, 100.0, 100.0);
        let hints = Hints {
            snap: Some(false),
            collapse: None,
        };
        let layout = derive_layout(frame, &ctx(Edges::all(), Edges::empty()), hints);
        assert!((layout.leading().unwrap() - 0.1).abs() < EPS);
        assert!((layout.top().unwrap() - 0.2).abs() < EPS);
    }

    #[test]
    fn snap_hint_true_forces_flush() {
        let frame = Rect::new(30.0, 120.0, 100.0, 100.0);
        let hints = Hints {
            snap: Some(true),
            collapse: None,
        };
        let layout = derive_layout(frame, &ctx(Edges::LEFT, Edges::empty()), hints);
        assert_eq!(layout.leading(), Some(0.0));
        // Top is not snap-enabled, so it stays free.
        assert!((layout.top().unwrap() - 0.2).abs() < EPS);
    }

    #[test]
    fn hint_precedes_boundary_crossing() {
        // Past the collapse boundary on the left; the snap hint is checked
        // before the boundary crossing.
        let frame = Rect::new(-60.0, 200.0, 100.0, 100.0);
        let hints = Hints {
            snap: Some(false),
            collapse: None,
        };
        let c = ctx(Edges::LEFT, Edges::LEFT);
        let layout = derive_layout(frame, &c, hints);
        assert_eq!(layout.collapse_edge(), None);
        assert_eq!(layout.leading(), Some(0.0));
    }

    #[test]
    fn only_one_axis_collapses() {
        // Past the collapse region at the top-left corner.
        let frame = Rect::new(-60.0, -60.0, 100.0, 100.0);
        let layout = derive_layout(frame, &ctx(Edges::all(), Edges::all()), Hints::NONE);
        assert_eq!(layout.collapse_edge(), Some(Edge::Top));
        assert_eq!(layout.leading(), Some(0.0));
    }

    #[test]
    fn degenerate_region_yields_zero_fraction() {
        let c = SnapContext {
            snap: Rect::new(0.0, 0.0, 0.0, 0.0),
            collapse: Rect::new(0.0, 0.0, 0.0, 0.0),
            snap_edges: Edges::empty(),
            collapse_edges: Edges::empty(),
        };
        let layout = derive_layout(Rect::new(5.0, 5.0, 10.0, 10.0), &c, Hints::NONE);
        assert_eq!(layout.bottom(), Some(0.0));
        assert_eq!(layout.trailing(), Some(0.0));
    }

    #[test]
    fn idempotent_for_fixed_inputs() {
        let frame = Rect::new(77.0, 311.0, 120.0, 68.0);
        let c = ctx(Edges::LEFT, Edges::RIGHT);
        assert_eq!(
            derive_layout(frame, &c, Hints::NONE),
            derive_layout(frame, &c, Hints::NONE)
        );
    }
}
