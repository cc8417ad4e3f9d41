#![forbid(unsafe_code)]

//! Damped spring used to glide a released window to its settle point.
//!
//! Each axis follows the damped harmonic oscillator
//!
//!   a = -stiffness × (position - target) - damping × velocity
//!
//! integrated with semi-implicit Euler. A [`Spring2`] runs one [`Spring`] per
//! axis, seeded with the window center and the (clamped) release velocity.
//!
//! # Invariants
//!
//! 1. Stiffness is at least [`MIN_STIFFNESS`], damping is non-negative.
//! 2. A spring at rest stays at rest; a glide to a new point is a new spring.
//! 3. Coming to rest snaps position to the target and zeroes velocity.
//!
//! # Failure Modes
//!
//! - Large `dt`: subdivided into steps of at most 4ms.
//! - Zero damping: the spring oscillates forever and never completes.

use std::time::Duration;

use super::Animation;
use crate::geometry::{Point, Vector};

/// Largest integration step in seconds.
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta (in points) below which a spring may rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.5;

/// Speed (points per second) below which a spring may rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 1.0;

/// Lower bound for stiffness.
pub const MIN_STIFFNESS: f64 = 0.1;

/// Default stiffness of the settle glide.
pub const DEFAULT_STIFFNESS: f64 = 90.0;

/// Default damping of the settle glide.
pub const DEFAULT_DAMPING: f64 = 13.0;

/// A one-dimensional damped spring.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// A spring at `initial` heading for `target`, at rest velocity.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        }
    }

    /// Set stiffness. Clamped to [`MIN_STIFFNESS`].
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = if k.is_finite() { k.max(MIN_STIFFNESS) } else { MIN_STIFFNESS };
        self
    }

    /// Set damping. Clamped to zero.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = if c.is_finite() { c.max(0.0) } else { 0.0 };
        self
    }

    /// Start moving at `velocity`.
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self
    }

    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, subdividing into small steps.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }
}

/// A pair of springs moving a point.
#[derive(Debug, Clone)]
pub struct Spring2 {
    x: Spring,
    y: Spring,
}

impl Spring2 {
    /// A spring from `from` to `to`, launched at `velocity`.
    #[must_use]
    pub fn new(from: Point, to: Point, velocity: Vector) -> Self {
        Self {
            x: Spring::new(from.x, to.x).with_velocity(velocity.dx),
            y: Spring::new(from.y, to.y).with_velocity(velocity.dy),
        }
    }

    /// Set stiffness and damping on both axes.
    #[must_use]
    pub fn with_params(mut self, stiffness: f64, damping: f64) -> Self {
        self.x = self.x.with_stiffness(stiffness).with_damping(damping);
        self.y = self.y.with_stiffness(stiffness).with_damping(damping);
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x.position(), self.y.position())
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> Vector {
        Vector::new(self.x.velocity(), self.y.velocity())
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Point {
        Point::new(self.x.target(), self.y.target())
    }
}

impl Animation for Spring2 {
    fn tick(&mut self, dt: Duration) {
        self.x.advance(dt);
        self.y.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }
}
