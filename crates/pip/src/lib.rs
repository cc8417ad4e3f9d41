#![forbid(unsafe_code)]

//! Floating picture-in-picture public facade crate.
//!
//! Re-exports the geometry and physics of `pip-core` and, with the
//! `runtime` feature (on by default), the window runtime of `pip-runtime`.
//! Most users only need the [`prelude`].

// --- Core re-exports -------------------------------------------------------

pub use pip_core::{
    Axis, ContainerRegions, Edge, Edges, FlingConfig, Hints, Insets, Layout, LayoutError, Point,
    Rect, RegionConfig, SettlePlan, Size, SnapContext, Vector, derive_layout, plan_settle,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use pip_runtime::{
    ContentId, CustomPip, FileLayoutStore, FloatingConfig, FloatingWindow, LayoutStore,
    ManagerEvent, MemoryLayoutStore, PipContent, PipCoordinator, PipDelegate, PipHandle,
    PipVariant, Presentation, Result, RuntimeError, SystemPip, SystemPipBackend, WindowManager,
};

pub use pip_core as core;
#[cfg(feature = "runtime")]
pub use pip_runtime as runtime;

/// Everything needed to float content.
pub mod prelude {
    pub use crate::{Edges, Hints, Insets, Layout, Point, Rect, Size, Vector};

    #[cfg(feature = "runtime")]
    pub use crate::{
        ContentId, CustomPip, FloatingConfig, ManagerEvent, PipContent, PipCoordinator,
        PipDelegate, Presentation, RuntimeError, WindowManager,
    };

    pub use crate::core;
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}
