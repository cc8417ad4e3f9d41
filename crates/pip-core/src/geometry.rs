#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are logical points in the container's coordinate space,
//! origin at top-left, `y` growing downwards.

use serde::{Deserialize, Serialize};

/// A point in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a vector.
    #[inline]
    #[must_use]
    pub fn offset(self, by: Vector) -> Self {
        Self::new(self.x + by.dx, self.y + by.dy)
    }
}

/// A displacement or velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new vector.
    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Multiply both components by `factor`.
    #[inline]
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.dx * factor, self.dy * factor)
    }

    /// Largest absolute component.
    #[inline]
    pub fn max_abs(self) -> f64 {
        self.dx.abs().max(self.dy.abs())
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle of `size` centered on `center`.
    #[inline]
    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (max edges exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Same size, moved so that its center is `center`.
    #[inline]
    #[must_use]
    pub fn with_center(&self, center: Point) -> Rect {
        Rect::from_center(center, self.size())
    }

    /// Translate by a vector.
    #[inline]
    #[must_use]
    pub fn offset(&self, by: Vector) -> Rect {
        Rect::new(self.x + by.dx, self.y + by.dy, self.width, self.height)
    }

    /// Create a new rectangle inside the current one with the given insets.
    ///
    /// Sizes never go negative: an over-inset rectangle collapses to zero
    /// extent at the midpoint of the insets.
    pub fn inset(&self, insets: Insets) -> Rect {
        let width = self.width - insets.horizontal_sum();
        let height = self.height - insets.vertical_sum();
        let (x, width) = if width >= 0.0 {
            (self.x + insets.left, width)
        } else {
            (self.x + insets.left + width / 2.0, 0.0)
        };
        let (y, height) = if height >= 0.0 {
            (self.y + insets.top, height)
        } else {
            (self.y + insets.top + height / 2.0, 0.0)
        };
        Rect::new(x, y, width, height)
    }

    /// Extent along an axis.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Near (left/top) edge coordinate along an axis.
    #[inline]
    pub fn min(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.min_x(),
            Axis::Vertical => self.min_y(),
        }
    }

    /// Far (right/bottom) edge coordinate along an axis.
    #[inline]
    pub fn max(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.max_x(),
            Axis::Vertical => self.max_y(),
        }
    }

    /// Midpoint coordinate along an axis.
    #[inline]
    pub fn mid(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.mid_x(),
            Axis::Vertical => self.mid_y(),
        }
    }
}

/// One of the two screen axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// Component of a point along this axis.
    #[inline]
    pub fn of_point(self, point: Point) -> f64 {
        match self {
            Axis::Horizontal => point.x,
            Axis::Vertical => point.y,
        }
    }

    /// Component of a vector along this axis.
    #[inline]
    pub fn of_vector(self, vector: Vector) -> f64 {
        match self {
            Axis::Horizontal => vector.dx,
            Axis::Vertical => vector.dy,
        }
    }
}

/// Four-sided insets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    /// No insets.
    pub const ZERO: Self = Self::all(0.0);

    /// Create new insets with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            left: val,
            bottom: val,
            right: val,
        }
    }

    /// Create new insets with specific values.
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }

    /// Whether every side is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.top, self.left, self.bottom, self.right]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl std::ops::Add for Insets {
    type Output = Insets;

    fn add(self, rhs: Insets) -> Insets {
        Insets::new(
            self.top + rhs.top,
            self.left + rhs.left,
            self.bottom + rhs.bottom,
            self.right + rhs.right,
        )
    }
}

/// Clamp `value` into the closed range spanned by `a` and `b`, in either order.
#[inline]
pub fn clamp_between(value: f64, a: f64, b: f64) -> f64 {
    value.min(a.max(b)).max(a.min(b))
}
