#![forbid(unsafe_code)]

//! Runtime: the stateful side of floating picture-in-picture windows.
//!
//! # Role in the workspace
//! `pip-runtime` drives the pure geometry of `pip-core` over time. It owns
//! the drag/settle state machine, moves content in and out of the window,
//! persists the last settled layout, and arbitrates between in-app and
//! platform picture-in-picture.
//!
//! # Primary responsibilities
//! - **Window**: [`FloatingWindow`], drag, fling, glide, expand and collapse.
//! - **Manager**: [`WindowManager`], show/replace/remove transitions and
//!   window disposal.
//! - **Variants**: [`CustomPip`], [`SystemPip`] and the [`PipCoordinator`]
//!   that keeps one current.
//! - **Persistence**: [`LayoutStore`] with memory and file backends.
//! - **Config**: [`FloatingConfig`] from TOML or JSON.
//!
//! # How it fits
//! The host forwards pan gestures and container changes, calls
//! [`WindowManager::tick`] once per frame, and draws
//! [`WindowManager::presentations`]. Nothing here spawns threads or owns a
//! clock.

pub mod config;
pub mod delegate;
pub mod error;
pub mod manager;
pub mod store;
pub mod task;
pub mod variant;
pub mod window;

pub use config::{DEFAULT_LAYOUT_KEY, FloatingConfig, default_placeholder_layout};
pub use delegate::{PipDelegate, RecordingDelegate, SharedDelegate, shared};
pub use error::{Result, RuntimeError};
pub use manager::{ContentId, ManagerEvent, PipContent, Presentation, WindowManager};
pub use store::{FileLayoutStore, LayoutStore, MemoryLayoutStore, restore_layout};
pub use task::{Join, JoinPart, TaskToken, TaskTracker};
pub use variant::{CustomPip, PipCoordinator, PipHandle, PipVariant, SystemPip, SystemPipBackend};
pub use window::{FloatingWindow, MAX_GLIDE};
