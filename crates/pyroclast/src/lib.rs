//! # PYROCLAST - The Burst Engine
//!
//! Animates a burst of short-lived particles radiating outward from a single
//! origin, each independently sized, timed, blurred, and faded, resolving
//! when every particle finishes.
//!
//! ## Architecture
//!
//! ```text
//! explode() ──> derive_plan() x N ──> surface.insert() x N
//!                                          │
//!                    TweenDriver ──────────┤  per frame:
//!                    (geometry, easing)    │  opacity -> blur -> user hook
//!                                          │
//!                    on_complete x N ──> count-down latch ──> resolve
//! ```
//!
//! The engine owns the middle of that diagram and nothing else. Actual
//! pixels live behind [`RenderSurface`]; the frame clock lives behind
//! [`TweenDriver`]. Both ship with reference implementations
//! ([`simulation::MemorySurface`], [`TickDriver`]) so the engine runs
//! headless.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pyroclast::{ExplosionController, ExplosionHandle, TickDriver};
//! use pyroclast::simulation::MemorySurface;
//! use pyroclast_core::ExplosionConfig;
//!
//! let surface = MemorySurface::shared();
//! let driver = TickDriver::new(surface.clone());
//! let controller = ExplosionController::new(driver, ExplosionConfig::default())?;
//! controller.attach_surface(surface);
//!
//! let handle = ExplosionHandle::from(controller);
//! handle.explode().await; // resolves when all 9 particles land
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod controller;
pub mod driver;
pub mod simulation;
pub mod surface;
pub mod tween;

// Re-exports for convenience
pub use controller::{ExplosionController, ExplosionHandle, ExplosionHooks};
pub use driver::TickDriver;
pub use surface::{ParticleId, ParticleVisual, RenderSurface, SharedSurface};
pub use tween::{Geometry, TweenCallbacks, TweenDriver, TweenError, TweenRequest, TweenTicket};

// The core types every caller needs
pub use pyroclast_core::{BlurCurve, ConfigUpdate, ExplosionConfig, ExplosionError};

/// Frame rate of the reference tick driver (frames per second).
///
/// At 60Hz each frame is ~16.67ms, matching typical display refresh.
pub const TICK_RATE: u32 = 60;
