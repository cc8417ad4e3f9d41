#![forbid(unsafe_code)]

//! The floating window state machine.
//!
//! A [`FloatingWindow`] is either resting at a [`Layout`], following a drag,
//! or gliding to a settle point:
//!
//! ```text
//!            begin_drag                end_drag
//!   Resting ───────────▶ Dragging ──────────────▶ Settling
//!      ▲                    ▲                        │
//!      │                    └──── begin_drag ────────┤
//!      └──────────── tick: spring at rest ───────────┘
//! ```
//!
//! # Invariants
//!
//! 1. At most one settle simulation exists; starting a drag, expanding,
//!    collapsing, or a container change drops it.
//! 2. While resting, `frame` is exactly the layout resolved against the
//!    current regions.
//! 3. Settling never leaves the window without a layout: when the spring
//!    rests the final frame is converted back into one.
//! 4. A glide lasts at most [`MAX_GLIDE`]. A spring still moving by then
//!    is cut short and the window lands on the settle point.

use std::time::Duration;

use pip_core::animation::Animation;
use pip_core::animation::spring::Spring2;
use pip_core::{
    ContainerRegions, Hints, Insets, Layout, LayoutGuides, Point, Rect, RegionConfig, SettlePlan,
    Size, SnapContext, Vector, derive_layout, plan_settle,
};
use tracing::{debug, debug_span, trace};

use crate::config::FloatingConfig;
use crate::error::Result;

/// Longest a fling glide may run before the window is placed on its target.
pub const MAX_GLIDE: Duration = Duration::from_secs(4);

#[derive(Debug, Clone)]
enum Motion {
    Resting(Layout),
    Dragging,
    Settling { spring: Spring2, elapsed: Duration },
}

/// Geometry and gesture state of the floating window.
#[derive(Debug, Clone)]
pub struct FloatingWindow {
    config: FloatingConfig,
    region_config: RegionConfig,
    regions: ContainerRegions,
    guides: LayoutGuides,
    frame: Rect,
    motion: Motion,
}

impl FloatingWindow {
    /// A window of `size` placed at `layout` inside the given container.
    pub fn new(
        config: FloatingConfig,
        bounds: Rect,
        safe_insets: Insets,
        size: Size,
        layout: Layout,
    ) -> Result<Self> {
        let region_config = config.region_config();
        let regions = ContainerRegions::compute(bounds, safe_insets, &region_config);
        let mut guides = LayoutGuides::new(&regions);
        let frame = guides.resolve_frame(&layout, size)?;
        Ok(Self {
            config,
            region_config,
            regions,
            guides,
            frame,
            motion: Motion::Resting(layout),
        })
    }

    #[inline]
    pub fn config(&self) -> &FloatingConfig {
        &self.config
    }

    #[inline]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    #[inline]
    pub fn regions(&self) -> &ContainerRegions {
        &self.regions
    }

    /// The layout the window rests at, or `None` while it moves.
    pub fn layout(&self) -> Option<Layout> {
        match &self.motion {
            Motion::Resting(layout) => Some(*layout),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.motion, Motion::Dragging)
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.motion, Motion::Settling { .. })
    }

    /// Center the current glide is heading for.
    pub fn settle_target(&self) -> Option<Point> {
        match &self.motion {
            Motion::Settling { spring, .. } => Some(spring.target()),
            _ => None,
        }
    }

    pub fn snap_context(&self) -> SnapContext {
        SnapContext::new(&self.regions, &self.region_config)
    }

    /// Whether `point` falls on the window. Everything else passes through.
    pub fn hit_test(&self, point: Point) -> bool {
        self.frame.contains(point)
    }

    /// The layout that best describes the current frame.
    pub fn adaptive_layout(&self, hints: Hints) -> Layout {
        derive_layout(self.frame, &self.snap_context(), hints)
    }

    /// Rest at `layout`, dropping any drag or glide.
    pub fn apply_layout(&mut self, layout: Layout) -> Result<()> {
        self.frame = self.guides.resolve_frame(&layout, self.frame.size())?;
        self.motion = Motion::Resting(layout);
        Ok(())
    }

    /// Resize the window, keeping its layout (or its center while moving).
    pub fn set_size(&mut self, size: Size) -> Result<()> {
        match &self.motion {
            Motion::Resting(layout) => {
                let layout = *layout;
                self.frame = self.guides.resolve_frame(&layout, size)?;
            }
            _ => self.frame = Rect::from_center(self.frame.center(), size),
        }
        Ok(())
    }

    /// Take the window from direct input. Stops any glide in place.
    pub fn begin_drag(&mut self) {
        if self.is_settling() {
            debug!(frame = ?self.frame, "settle interrupted by drag");
        }
        self.motion = Motion::Dragging;
    }

    /// Move by the translation since the previous drag event.
    pub fn drag_by(&mut self, translation: Vector) {
        if !self.is_dragging() {
            self.begin_drag();
        }
        self.frame = self.frame.offset(translation);
    }

    /// Release the drag with `velocity` and start gliding to the settle point.
    pub fn end_drag(&mut self, velocity: Vector) -> SettlePlan {
        let _span = debug_span!("pip.end_drag", vx = velocity.dx, vy = velocity.dy).entered();
        let plan = plan_settle(
            velocity,
            self.frame,
            &self.snap_context(),
            &self.config.fling_config(),
        );
        debug!(
            stop = ?plan.stop_point,
            settle = ?plan.settle_point,
            "settle planned"
        );
        let spring = Spring2::new(self.frame.center(), plan.settle_point, plan.velocity)
            .with_params(self.config.spring_strength, self.config.resistance);
        self.motion = Motion::Settling {
            spring,
            elapsed: Duration::ZERO,
        };
        plan
    }

    /// Advance the glide by `dt`.
    ///
    /// Returns the layout the window came to rest at, once.
    pub fn tick(&mut self, dt: Duration) -> Result<Option<Layout>> {
        let Motion::Settling { spring, elapsed } = &mut self.motion else {
            return Ok(None);
        };
        spring.tick(dt);
        *elapsed = elapsed.saturating_add(dt);
        let timed_out = *elapsed >= MAX_GLIDE && !spring.is_complete();
        let center = if timed_out {
            spring.target()
        } else {
            spring.position()
        };
        let done = timed_out || spring.is_complete();
        self.frame = self.frame.with_center(center);
        trace!(x = center.x, y = center.y, "settle tick");
        if !done {
            return Ok(None);
        }
        if timed_out {
            debug!(elapsed = ?MAX_GLIDE, "glide cut short");
        }

        let layout = self.adaptive_layout(Hints::NONE);
        self.apply_layout(layout)?;
        debug!(?layout, "window settled");
        Ok(Some(layout))
    }

    /// Bring a docked window fully back on screen.
    pub fn expand(&mut self) -> Result<Layout> {
        self.rest_with(Hints::EXPAND)
    }

    /// Dock the window on the nearest collapse-enabled edge.
    pub fn collapse(&mut self) -> Result<Layout> {
        self.rest_with(Hints::COLLAPSE)
    }

    fn rest_with(&mut self, hints: Hints) -> Result<Layout> {
        let layout = self.adaptive_layout(hints);
        self.apply_layout(layout)?;
        debug!(?layout, ?hints, "layout forced");
        Ok(layout)
    }

    /// Follow a container bounds or safe-area change.
    ///
    /// The frame is first described by a layout in the old regions, then
    /// that layout is resolved in the new ones. Returns `false` if no region
    /// changed.
    pub fn set_container(&mut self, bounds: Rect, safe_insets: Insets) -> Result<bool> {
        let layout = self.adaptive_layout(Hints::NONE);
        if !self.regions.update(bounds, safe_insets, &self.region_config) {
            return Ok(false);
        }
        self.guides.set_regions(&self.regions);
        self.apply_layout(layout)?;
        debug!(?bounds, ?layout, "container changed");
        Ok(true)
    }
}
