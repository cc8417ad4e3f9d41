#![forbid(unsafe_code)]

//! Normalized, container-relative window layout.
//!
//! A [`Layout`] anchors a floating window inside the snap region with at most
//! one vertical anchor (`top` or `bottom`) and at most one horizontal anchor
//! (`leading` or `trailing`), each a fraction of the snap region's extent on
//! that axis. Alternatively one axis can be replaced by a collapse edge, in
//! which case the window is docked just outside the collapse region on that
//! edge.
//!
//! # Invariants
//!
//! 1. Every present anchor is finite and within `[0, 1]`.
//! 2. Without a collapse edge, exactly one of `top`/`bottom` and exactly one
//!    of `leading`/`trailing` is present.
//! 3. With a collapse edge, both anchors on the collapse edge's axis are
//!    absent and exactly one anchor on the other axis is present.
//!
//! Values are only constructed through [`Layout::new`] or decoding, both of
//! which check these invariants.
//!
//! # Wire format
//!
//! JSON object with optional `top`, `leading`, `bottom`, `trailing` numbers
//! and an optional `collapse_edge` string. Missing fields decode as absent,
//! unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::error::LayoutError;
use crate::geometry::Axis;

/// Where a window sits inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayout", into = "RawLayout")]
pub struct Layout {
    top: Option<f64>,
    leading: Option<f64>,
    bottom: Option<f64>,
    trailing: Option<f64>,
    collapse_edge: Option<Edge>,
}

/// Unchecked serde mirror of [`Layout`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    leading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trailing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collapse_edge: Option<Edge>,
}

impl TryFrom<RawLayout> for Layout {
    type Error = LayoutError;

    fn try_from(raw: RawLayout) -> Result<Self, Self::Error> {
        Layout::new(
            raw.top,
            raw.leading,
            raw.bottom,
            raw.trailing,
            raw.collapse_edge,
        )
    }
}

impl From<Layout> for RawLayout {
    fn from(layout: Layout) -> Self {
        Self {
            top: layout.top,
            leading: layout.leading,
            bottom: layout.bottom,
            trailing: layout.trailing,
            collapse_edge: layout.collapse_edge,
        }
    }
}

/// A single anchor: the edge it measures from and the fraction of the
/// snap region's extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub edge: Edge,
    pub fraction: f64,
}

impl Layout {
    /// Build a layout, checking the invariants.
    pub fn new(
        top: Option<f64>,
        leading: Option<f64>,
        bottom: Option<f64>,
        trailing: Option<f64>,
        collapse_edge: Option<Edge>,
    ) -> Result<Self, LayoutError> {
        for value in [top, leading, bottom, trailing].into_iter().flatten() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(LayoutError::invalid("anchor outside [0, 1]"));
            }
        }

        let vertical = usize::from(top.is_some()) + usize::from(bottom.is_some());
        let horizontal = usize::from(leading.is_some()) + usize::from(trailing.is_some());

        match collapse_edge.map(Edge::axis) {
            None => {
                if vertical != 1 {
                    return Err(LayoutError::invalid(
                        "exactly one of top/bottom must be set",
                    ));
                }
                if horizontal != 1 {
                    return Err(LayoutError::invalid(
                        "exactly one of leading/trailing must be set",
                    ));
                }
            }
            Some(Axis::Vertical) => {
                if vertical != 0 || horizontal != 1 {
                    return Err(LayoutError::invalid(
                        "vertical collapse needs exactly one of leading/trailing and no top/bottom",
                    ));
                }
            }
            Some(Axis::Horizontal) => {
                if horizontal != 0 || vertical != 1 {
                    return Err(LayoutError::invalid(
                        "horizontal collapse needs exactly one of top/bottom and no leading/trailing",
                    ));
                }
            }
        }

        Ok(Self {
            top,
            leading,
            bottom,
            trailing,
            collapse_edge,
        })
    }

    /// Build a layout from one anchor per axis, or a collapse edge plus the
    /// anchor of the other axis.
    pub fn from_anchors(
        vertical: Option<Anchor>,
        horizontal: Option<Anchor>,
        collapse_edge: Option<Edge>,
    ) -> Result<Self, LayoutError> {
        let pick = |anchor: Option<Anchor>, edge: Edge| {
            anchor.filter(|a| a.edge == edge).map(|a| a.fraction)
        };
        if let Some(anchor) = vertical
            && anchor.edge.axis() != Axis::Vertical
        {
            return Err(LayoutError::invalid("vertical anchor on a horizontal edge"));
        }
        if let Some(anchor) = horizontal
            && anchor.edge.axis() != Axis::Horizontal
        {
            return Err(LayoutError::invalid("horizontal anchor on a vertical edge"));
        }
        Self::new(
            pick(vertical, Edge::Top),
            pick(horizontal, Edge::Left),
            pick(vertical, Edge::Bottom),
            pick(horizontal, Edge::Right),
            collapse_edge,
        )
    }

    #[inline]
    pub fn top(&self) -> Option<f64> {
        self.top
    }

    #[inline]
    pub fn leading(&self) -> Option<f64> {
        self.leading
    }

    #[inline]
    pub fn bottom(&self) -> Option<f64> {
        self.bottom
    }

    #[inline]
    pub fn trailing(&self) -> Option<f64> {
        self.trailing
    }

    #[inline]
    pub fn collapse_edge(&self) -> Option<Edge> {
        self.collapse_edge
    }

    /// Whether the window is docked on a collapse edge.
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.collapse_edge.is_some()
    }

    /// The anchor on `axis`, if that axis is not collapsed.
    pub fn anchor(&self, axis: Axis) -> Option<Anchor> {
        let (near, far) = match axis {
            Axis::Vertical => (self.top, self.bottom),
            Axis::Horizontal => (self.leading, self.trailing),
        };
        let (near_edge, far_edge) = Edge::pair(axis);
        near.map(|fraction| Anchor {
            edge: near_edge,
            fraction,
        })
        .or(far.map(|fraction| Anchor {
            edge: far_edge,
            fraction,
        }))
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON, checking the invariants.
    pub fn from_json(data: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(data)?)
    }
}

impl Default for Layout {
    /// Flush against the bottom-trailing corner.
    fn default() -> Self {
        Self {
            top: None,
            leading: None,
            bottom: Some(0.0),
            trailing: Some(0.0),
            collapse_edge: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_bottom_trailing() {
        let layout = Layout::default();
        assert_eq!(layout.bottom(), Some(0.0));
        assert_eq!(layout.trailing(), Some(0.0));
        assert_eq!(layout.collapse_edge(), None);
        assert!(Layout::new(None, None, Some(0.0), Some(0.0), None).is_ok());
    }

    #[test]
    fn rejects_both_vertical_anchors() {
        let err = Layout::new(Some(0.1), Some(0.0), Some(0.2), None, None).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidLayout { .. }));
    }

    #[test]
    fn rejects_missing_horizontal_anchor() {
        assert!(Layout::new(Some(0.1), None, None, None, None).is_err());
    }

    #[test]
    fn rejects_out_of_range_fraction() {
        assert!(Layout::new(Some(1.5), Some(0.0), None, None, None).is_err());
        assert!(Layout::new(Some(-0.1), Some(0.0), None, None, None).is_err());
        assert!(Layout::new(Some(f64::NAN), Some(0.0), None, None, None).is_err());
    }

    #[test]
    fn collapse_requires_single_cross_axis_anchor() {
        assert!(Layout::new(None, None, Some(0.3), None, Some(Edge::Right)).is_ok());
        assert!(Layout::new(None, Some(0.3), None, None, Some(Edge::Top)).is_ok());
        // Anchor on the collapsed axis.
        assert!(Layout::new(None, Some(0.3), None, None, Some(Edge::Right)).is_err());
        // Two anchors.
        assert!(Layout::new(Some(0.1), Some(0.3), None, None, Some(Edge::Right)).is_err());
        // None at all.
        assert!(Layout::new(None, None, None, None, Some(Edge::Left)).is_err());
    }

    #[test]
    fn anchor_lookup() {
        let layout = Layout::new(Some(0.25), None, None, Some(0.5), None).unwrap();
        assert_eq!(
            layout.anchor(Axis::Vertical),
            Some(Anchor {
                edge: Edge::Top,
                fraction: 0.25
            })
        );
        assert_eq!(
            layout.anchor(Axis::Horizontal),
            Some(Anchor {
                edge: Edge::Right,
                fraction: 0.5
            })
        );
    }

    #[test]
    fn from_anchors_rejects_wrong_axis() {
        let bad = Anchor {
            edge: Edge::Left,
            fraction: 0.0,
        };
        assert!(Layout::from_anchors(Some(bad), Some(bad), None).is_err());
    }

    #[test]
    fn json_round_trip() {
        let layout = Layout::new(None, None, Some(0.45), None, Some(Edge::Left)).unwrap();
        let json = layout.to_json().unwrap();
        assert_eq!(json, r#"{"bottom":0.45,"collapse_edge":"left"}"#);
        assert_eq!(Layout::from_json(&json).unwrap(), layout);
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let layout = Layout::from_json(r#"{"top":0.1,"trailing":0.2,"scale":3}"#).unwrap();
        assert_eq!(layout.top(), Some(0.1));
        assert_eq!(layout.trailing(), Some(0.2));
    }

    #[test]
    fn decode_rejects_invalid_combination() {
        let err = Layout::from_json(r#"{"top":0.1,"bottom":0.2,"leading":0}"#).unwrap_err();
        assert!(matches!(err, LayoutError::Decode(_)));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Layout::from_json("not json").is_err());
        assert!(Layout::from_json(r#"{"collapse_edge":"middle","top":0}"#).is_err());
    }
}
