#![forbid(unsafe_code)]

//! Time-driven animation primitives.
//!
//! The floating window plays its settle glide with a [`spring::Spring2`]; the
//! host drives it by calling [`Animation::tick`] once per frame.

pub mod spring;

use std::time::Duration;

/// A value that advances with wall-clock time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has come to rest.
    fn is_complete(&self) -> bool;
}
