#![forbid(unsafe_code)]

//! Rectangle edges and edge sets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Axis;

/// A single edge of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Left,
    Bottom,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right];

    /// The axis this edge bounds.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Vertical,
            Edge::Left | Edge::Right => Axis::Horizontal,
        }
    }

    /// Whether this is the near (top/left) edge of its axis.
    #[inline]
    pub const fn is_near(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }

    /// Near and far edge of an axis.
    #[inline]
    pub const fn pair(axis: Axis) -> (Edge, Edge) {
        match axis {
            Axis::Vertical => (Edge::Top, Edge::Bottom),
            Axis::Horizontal => (Edge::Left, Edge::Right),
        }
    }

    /// The opposite edge.
    #[inline]
    pub const fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Left => Edge::Right,
            Edge::Bottom => Edge::Top,
            Edge::Right => Edge::Left,
        }
    }
}

bitflags! {
    /// A set of rectangle edges.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Edges: u8 {
        const TOP = 1 << 0;
        const LEFT = 1 << 1;
        const BOTTOM = 1 << 2;
        const RIGHT = 1 << 3;
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Edges {
    /// Whether the set holds `edge`.
    #[inline]
    pub fn has(self, edge: Edge) -> bool {
        self.contains(Edges::from(edge))
    }

    /// Whether either edge of `axis` is in the set.
    #[inline]
    pub fn touches_axis(self, axis: Axis) -> bool {
        let (near, far) = Edge::pair(axis);
        self.has(near) || self.has(far)
    }
}

impl From<Edge> for Edges {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Top => Edges::TOP,
            Edge::Left => Edges::LEFT,
            Edge::Bottom => Edges::BOTTOM,
            Edge::Right => Edges::RIGHT,
        }
    }
}

impl FromIterator<Edge> for Edges {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Edges::empty(), |acc, edge| acc | Edges::from(edge))
    }
}
