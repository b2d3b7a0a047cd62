//! # Tween Driver Seam
//!
//! The per-frame scheduling primitive, kept behind a trait so the engine can
//! run against a host animation system or the bundled [`TickDriver`].
//!
//! ## Contract
//!
//! A driver accepting a [`TweenRequest`] must:
//!
//! 1. Tween the target's geometry from `from` to `to` over `duration`,
//!    applying its interpretation of the easing identifier.
//! 2. Invoke `on_progress` with RAW (un-eased) monotonic progress in [0, 1]
//!    after each geometry write - the engine derives opacity and blur from
//!    raw progress, never from the eased value.
//! 3. Fire `on_complete` exactly once, after progress has reached 1.
//! 4. On [`TweenDriver::cancel`], stop the tween and SUPPRESS a pending
//!    `on_complete`. The engine finalizes cancelled particles itself.
//!
//! [`TickDriver`]: crate::driver::TickDriver

use std::time::Duration;

use thiserror::Error;

use crate::surface::ParticleId;

/// A point in the surface's coordinate space plus a square size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Horizontal position (% of container).
    pub x_pct: f32,
    /// Vertical position (% of container).
    pub y_pct: f32,
    /// Width and height (px).
    pub size_px: f32,
}

/// One tween: a target element, start and end geometry, a clock, an easing.
#[derive(Clone, Debug)]
pub struct TweenRequest {
    /// The element to animate.
    pub target: ParticleId,
    /// Geometry at progress 0.
    pub from: Geometry,
    /// Geometry at progress 1.
    pub to: Geometry,
    /// Wall-clock length of the tween.
    pub duration: Duration,
    /// Easing identifier, opaque at this seam. Drivers map unknown names to
    /// linear rather than failing.
    pub easing: String,
}

/// Callbacks wired into one tween.
pub struct TweenCallbacks {
    /// Invoked once per frame with raw progress in [0, 1], after the
    /// driver's geometry write for that frame.
    pub on_progress: Box<dyn FnMut(f32) + Send>,
    /// Invoked exactly once after progress reaches 1. Suppressed by
    /// cancellation.
    pub on_complete: Box<dyn FnOnce() + Send>,
}

/// Handle for cancelling a started tween.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenTicket(pub u64);

/// Errors a driver can report when starting a tween.
///
/// A started tween is infallible; only startup can fail. The controller
/// treats a startup failure as a particle-level loss that still counts
/// toward run completion, so one bad tween can never hang the join.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TweenError {
    /// The driver needs an async runtime and none is active.
    #[error("no async runtime available to drive the tween")]
    NoRuntime,

    /// The driver refused the tween for an implementation-specific reason.
    #[error("tween rejected: {0}")]
    Rejected(String),
}

/// Interface to the frame scheduler.
pub trait TweenDriver: Send + Sync {
    /// Starts a tween. See the module docs for the full contract.
    ///
    /// # Errors
    ///
    /// [`TweenError`] when the tween cannot start; no callbacks will have
    /// been invoked in that case.
    fn animate(
        &self,
        request: TweenRequest,
        callbacks: TweenCallbacks,
    ) -> Result<TweenTicket, TweenError>;

    /// Force-cancels a tween: geometry stops changing and a pending
    /// `on_complete` is suppressed. Cancelling an already-finished or
    /// unknown ticket is a no-op.
    fn cancel(&self, ticket: TweenTicket);
}
