#![forbid(unsafe_code)]

//! Percent layout guides: resolving a [`Layout`] back into a frame.
//!
//! A [`PercentLayoutGuide`] is a rectangle centered on its parent, with one
//! dimension shrunk symmetrically by `percent` from both sides:
//!
//! ```text
//! extent = parent_extent * (1 - 2 * percent)
//! ```
//!
//! `percent = 0` is the full parent, `percent = 0.5` a centered line. A window
//! anchored `top = p` puts its top edge on the top of a height guide with
//! `percent = p` parented on the snap region; `bottom = p` puts its bottom edge
//! on the guide's bottom, and likewise for the width guide.
//!
//! [`LayoutGuides`] bundles the width and height guides with the snap and
//! collapse regions they depend on.

use crate::error::GuideError;
use crate::geometry::{Axis, Rect, Size};
use crate::layout::Layout;
use crate::region::ContainerRegions;

/// The dimension a guide controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Dimension::Width => Axis::Horizontal,
            Dimension::Height => Axis::Vertical,
        }
    }
}

/// A container-relative guide shrunk by a percentage on one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentLayoutGuide {
    dimension: Dimension,
    percent: f64,
    parent: Rect,
}

impl PercentLayoutGuide {
    /// A guide covering the whole of `parent`.
    pub fn new(dimension: Dimension, parent: Rect) -> Self {
        Self {
            dimension,
            percent: 0.0,
            parent,
        }
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    pub fn percent(&self) -> f64 {
        self.percent
    }

    #[inline]
    pub fn parent(&self) -> Rect {
        self.parent
    }

    /// Update the inset percentage.
    ///
    /// Returns `Ok(false)` if `percent` is unchanged.
    pub fn set_percent(&mut self, percent: f64) -> Result<bool, GuideError> {
        if percent == self.percent {
            return Ok(false);
        }
        if !(0.0..=1.0).contains(&percent) {
            return Err(GuideError::InvalidPercent { value: percent });
        }
        self.percent = percent;
        Ok(true)
    }

    /// Rebind to a new parent region.
    pub fn set_parent(&mut self, parent: Rect) {
        self.parent = parent;
    }

    /// The guide's current rectangle.
    pub fn frame(&self) -> Rect {
        let factor = 1.0 - 2.0 * self.percent;
        let center = self.parent.center();
        let size = match self.dimension {
            Dimension::Width => Size::new(self.parent.width * factor, self.parent.height),
            Dimension::Height => Size::new(self.parent.width, self.parent.height * factor),
        };
        Rect::from_center(center, size)
    }
}

/// Width and height guides parented on a container's snap region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGuides {
    snap: Rect,
    collapse: Rect,
    width: PercentLayoutGuide,
    height: PercentLayoutGuide,
}

impl LayoutGuides {
    pub fn new(regions: &ContainerRegions) -> Self {
        Self {
            snap: regions.snap(),
            collapse: regions.collapse(),
            width: PercentLayoutGuide::new(Dimension::Width, regions.snap()),
            height: PercentLayoutGuide::new(Dimension::Height, regions.snap()),
        }
    }

    /// Follow a container change.
    pub fn set_regions(&mut self, regions: &ContainerRegions) {
        self.snap = regions.snap();
        self.collapse = regions.collapse();
        self.width.set_parent(self.snap);
        self.height.set_parent(self.snap);
    }

    #[inline]
    pub fn width_guide(&self) -> &PercentLayoutGuide {
        &self.width
    }

    #[inline]
    pub fn height_guide(&self) -> &PercentLayoutGuide {
        &self.height
    }

    /// Drive the guides from `layout`.
    ///
    /// A collapsed axis keeps its previous percentage.
    pub fn apply(&mut self, layout: &Layout) -> Result<(), GuideError> {
        if let Some(anchor) = layout.anchor(Axis::Vertical) {
            self.height.set_percent(anchor.fraction)?;
        }
        if let Some(anchor) = layout.anchor(Axis::Horizontal) {
            self.width.set_percent(anchor.fraction)?;
        }
        Ok(())
    }

    /// Apply `layout` and return the frame a window of `size` takes under it.
    pub fn resolve_frame(&mut self, layout: &Layout, size: Size) -> Result<Rect, GuideError> {
        self.apply(layout)?;
        let x = self.resolve_axis(layout, Axis::Horizontal, size.width);
        let y = self.resolve_axis(layout, Axis::Vertical, size.height);
        Ok(Rect::new(x, y, size.width, size.height))
    }

    /// Origin of the window on `axis`.
    fn resolve_axis(&self, layout: &Layout, axis: Axis, extent: f64) -> f64 {
        let guide = match axis {
            Axis::Horizontal => self.width.frame(),
            Axis::Vertical => self.height.frame(),
        };
        if let Some(anchor) = layout.anchor(axis) {
            return if anchor.edge.is_near() {
                guide.min(axis)
            } else {
                guide.max(axis) - extent
            };
        }
        match layout.collapse_edge().filter(|edge| edge.axis() == axis) {
            // Docked just outside the collapse region.
            Some(edge) if edge.is_near() => self.collapse.min(axis) - extent,
            Some(_) => self.collapse.max(axis),
            None => self.snap.min(axis),
        }
    }
}
