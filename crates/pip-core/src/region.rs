#![forbid(unsafe_code)]

//! Container region model.
//!
//! A floating window lives inside a container (usually the screen). Two
//! nested regions are derived from the container's bounds:
//!
//! ```text
//! safe     = bounds   - system safe insets
//! snap     = safe     - snap insets
//! collapse = safe     - collapse insets
//! ```
//!
//! The snap region is where a window's visible edges may rest flush; the
//! collapse region marks how far a window on a collapse-enabled edge must be
//! dragged before it docks partially off-screen. Collapse insets are expected
//! to be at least the snap insets, but this is not enforced.

use serde::{Deserialize, Serialize};

use crate::edge::Edges;
use crate::geometry::{Insets, Rect};

/// Per-window edge and inset configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Edges the window may rest flush against.
    pub snap_edges: Edges,
    /// Edges the window may slide partially past.
    pub collapse_edges: Edges,
    /// How far the snap region sits inside the safe region.
    pub snap_insets: Insets,
    /// How far the collapse region sits inside the safe region.
    pub collapse_insets: Insets,
}

/// Derived regions for one container state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerRegions {
    bounds: Rect,
    safe_insets: Insets,
    safe: Rect,
    snap: Rect,
    collapse: Rect,
}

impl ContainerRegions {
    /// Compute the regions for a container.
    pub fn compute(bounds: Rect, safe_insets: Insets, config: &RegionConfig) -> Self {
        let safe = bounds.inset(safe_insets);
        Self {
            bounds,
            safe_insets,
            safe,
            snap: safe.inset(config.snap_insets),
            collapse: safe.inset(config.collapse_insets),
        }
    }

    /// Recompute after a bounds or safe-inset change (rotation, resize).
    ///
    /// Returns `true` if any derived region changed.
    pub fn update(&mut self, bounds: Rect, safe_insets: Insets, config: &RegionConfig) -> bool {
        let next = Self::compute(bounds, safe_insets, config);
        if next == *self {
            return false;
        }
        *self = next;
        true
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn safe_insets(&self) -> Insets {
        self.safe_insets
    }

    #[inline]
    pub fn safe(&self) -> Rect {
        self.safe
    }

    #[inline]
    pub fn snap(&self) -> Rect {
        self.snap
    }

    #[inline]
    pub fn collapse(&self) -> Rect {
        self.collapse
    }
}

/// Everything the geometry engine and the fling solver need to know about
/// where a window may rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapContext {
    pub snap: Rect,
    pub collapse: Rect,
    pub snap_edges: Edges,
    pub collapse_edges: Edges,
}

impl SnapContext {
    pub fn new(regions: &ContainerRegions, config: &RegionConfig) -> Self {
        Self {
            snap: regions.snap(),
            collapse: regions.collapse(),
            snap_edges: config.snap_edges,
            collapse_edges: config.collapse_edges,
        }
    }
}
