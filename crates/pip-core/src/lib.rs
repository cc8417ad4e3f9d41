#![forbid(unsafe_code)]

//! Core: geometry, layouts, and fling physics for floating windows.
//!
//! # Role in the workspace
//! `pip-core` is the pure layer. It turns container bounds into snap and
//! collapse regions, pixel frames into normalized [`Layout`]s and back, and
//! release velocities into settle points. It holds no state between calls
//! and never logs; `pip-runtime` owns the window state machine built on it.
//!
//! # Primary responsibilities
//! - **Geometry**: [`Rect`], [`Point`], [`Vector`], [`Insets`], [`Edges`].
//! - **Layout**: the validated, serializable anchored position of a window.
//! - **Regions**: safe, snap, and collapse rectangles of a container.
//! - **Engine**: [`derive_layout`], frame to layout with snap/collapse hints.
//! - **Physics**: [`project_stop_point`] and [`resolve_settle_point`].
//! - **Guides**: percent guides that resolve a layout into a frame.
//! - **Animation**: the damped spring that plays the settle glide.

pub mod animation;
pub mod edge;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod guide;
pub mod layout;
pub mod physics;
pub mod region;

pub use edge::{Edge, Edges};
pub use engine::{Hints, derive_layout, free_fraction};
pub use error::{GuideError, LayoutError};
pub use geometry::{Axis, Insets, Point, Rect, Size, Vector};
pub use guide::{Dimension, LayoutGuides, PercentLayoutGuide};
pub use layout::{Anchor, Layout};
pub use physics::{
    FlingConfig, SettlePlan, clamp_velocity, plan_settle, project_stop_point,
    resolve_settle_point,
};
pub use region::{ContainerRegions, RegionConfig, SnapContext};
