#![forbid(unsafe_code)]

//! Fling physics: release velocity to settle point.
//!
//! On gesture release the window is projected forward as if it decelerated
//! uniformly to rest ([`project_stop_point`]), then the projected point is
//! snapped or collapsed according to the edge configuration
//! ([`resolve_settle_point`]). [`plan_settle`] runs the whole pipeline,
//! including the velocity cap.
//!
//! # Deceleration model
//!
//! For each axis the deceleration distance is the distance from the snap
//! region's center to the furthest position the window's center can take:
//! `region_extent / 2 - frame_extent / 2`. The rate on that axis is
//! `(reference_speed - 1) / distance`; a fling at `reference_speed` roughly
//! carries the window from the middle to the edge.
//!
//! An axis with a snap-enabled edge uses its own rate. An axis without one
//! borrows the larger of the two rates so that a diagonal fling does not
//! glide further on the unconstrained axis.
//!
//! A zero (or negative) distance means the window already spans the region
//! on that axis; it gets no displacement.

use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::engine::crossed_collapse_boundary;
use crate::geometry::{Axis, Point, Rect, Vector, clamp_between};
use crate::region::SnapContext;

/// Default reference speed, in points per second.
pub const DEFAULT_DECELERATION_REFERENCE_SPEED: f64 = 1000.0;

/// Default velocity cap, in points per second.
pub const DEFAULT_MAX_VELOCITY: f64 = 2000.0;

/// Tunables for fling projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlingConfig {
    /// Release speed that carries a window from the region's center to its edge.
    pub deceleration_reference_speed: f64,
    /// Cap on the larger velocity component.
    pub max_velocity: f64,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            deceleration_reference_speed: DEFAULT_DECELERATION_REFERENCE_SPEED,
            max_velocity: DEFAULT_MAX_VELOCITY,
        }
    }
}

/// Result of solving one gesture release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlePlan {
    /// Release velocity after the cap.
    pub velocity: Vector,
    /// Where the window would come to rest without snapping.
    pub stop_point: Point,
    /// Center the window should settle at.
    pub settle_point: Point,
}

/// Cap `velocity` so that its larger component does not exceed `max`.
///
/// Both components are scaled by the same factor, so the direction is kept.
/// Non-finite components are treated as zero.
pub fn clamp_velocity(velocity: Vector, max: f64) -> Vector {
    let sanitize = |v: f64| if v.is_finite() { v } else { 0.0 };
    let velocity = Vector::new(sanitize(velocity.dx), sanitize(velocity.dy));
    if !(max > 0.0) {
        return Vector::ZERO;
    }
    let m = velocity.max_abs();
    if m > max {
        velocity.scale(max / m)
    } else {
        velocity
    }
}

/// Deceleration rate on `axis`, or `None` if the frame spans the region.
fn axis_rate(axis: Axis, reference_speed: f64, frame: Rect, snap: Rect) -> Option<f64> {
    let distance = snap.extent(axis) / 2.0 - frame.extent(axis) / 2.0;
    if !(distance > 0.0) {
        return None;
    }
    let rate = (reference_speed - 1.0) / distance;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Project where the window's center would come to rest.
pub fn project_stop_point(
    velocity: Vector,
    reference_speed: f64,
    frame: Rect,
    ctx: &SnapContext,
) -> Point {
    let rx = axis_rate(Axis::Horizontal, reference_speed, frame, ctx.snap);
    let ry = axis_rate(Axis::Vertical, reference_speed, frame, ctx.snap);
    let r_max = match (rx, ry) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (one, other) => one.or(other),
    };

    let displacement = |axis: Axis, own: Option<f64>| {
        let Some(own) = own else {
            return 0.0;
        };
        let rate = if ctx.snap_edges.touches_axis(axis) {
            own
        } else {
            r_max.unwrap_or(own)
        };
        axis.of_vector(velocity) / rate
    };

    frame.center().offset(Vector::new(
        displacement(Axis::Horizontal, rx),
        displacement(Axis::Vertical, ry),
    ))
}

/// Snap or collapse a projected stop point into the final settle point.
///
/// Per axis, first match wins:
///
/// 1. center past the collapse region on a collapse-enabled edge: the
///    window's inner edge rests on the collapse boundary
/// 2. center in the near half and the near edge is snap-enabled: flush near
/// 3. center in the far half and the far edge is snap-enabled: flush far
/// 4. frame overshooting the snap region on either side: flush on that side
/// 5. otherwise the center is clamped so the frame stays in the snap region
///
/// The vertical axis is resolved first; if it collapses, the horizontal axis
/// skips rule 1. The returned center always lies within
/// `[snap_min - extent / 2, snap_max + extent / 2]` on both axes.
pub fn resolve_settle_point(stop_point: Point, frame: Rect, ctx: &SnapContext) -> Point {
    let (y, collapsed) = resolve_axis(Axis::Vertical, stop_point, frame, ctx, true);
    let (x, _) = resolve_axis(Axis::Horizontal, stop_point, frame, ctx, !collapsed);
    Point::new(x, y)
}

fn resolve_axis(
    axis: Axis,
    stop_point: Point,
    frame: Rect,
    ctx: &SnapContext,
    allow_collapse: bool,
) -> (f64, bool) {
    let (near, far) = Edge::pair(axis);
    let half = frame.extent(axis) / 2.0;
    let center = axis.of_point(stop_point);
    let (snap, collapse) = (ctx.snap, ctx.collapse);
    let collapses = |edge: Edge| {
        allow_collapse
            && ctx.collapse_edges.has(edge)
            && crossed_collapse_boundary(axis, edge, center, collapse)
    };

    let (target, collapsed) = if collapses(near) {
        (collapse.min(axis) - half, true)
    } else if collapses(far) {
        (collapse.max(axis) + half, true)
    } else if center < snap.mid(axis) && ctx.snap_edges.has(near) {
        (snap.min(axis) + half, false)
    } else if center >= snap.mid(axis) && ctx.snap_edges.has(far) {
        (snap.max(axis) - half, false)
    } else if center - half <= snap.min(axis) {
        (snap.min(axis) + half, false)
    } else if center + half > snap.max(axis) {
        (snap.max(axis) - half, false)
    } else {
        (
            clamp_between(center, snap.min(axis) + half, snap.max(axis) - half),
            false,
        )
    };

    let bounded = clamp_between(target, snap.min(axis) - half, snap.max(axis) + half);
    (bounded, collapsed)
}

/// Solve a gesture release: cap the velocity, project, then snap.
pub fn plan_settle(
    release_velocity: Vector,
    frame: Rect,
    ctx: &SnapContext,
    fling: &FlingConfig,
) -> SettlePlan {
    let velocity = clamp_velocity(release_velocity, fling.max_velocity);
    let stop_point = project_stop_point(velocity, fling.deceleration_reference_speed, frame, ctx);
    let settle_point = resolve_settle_point(stop_point, frame, ctx);
    SettlePlan {
        velocity,
        stop_point,
        settle_point,
    }
}
