//! # PYROCLAST Core - The Burst Mathematics
//!
//! Pure, deterministic logic behind the particle burst effect:
//!
//! - **Configuration**: defaults, shallow merge, fail-fast validation
//! - **Parameter Generator**: one motion plan per particle from an injectable RNG
//! - **Interpolation Curves**: opacity, size, and the blur shaping curves
//!
//! ## Determinism Guarantee
//!
//! Every randomized branch in this crate draws from a caller-supplied
//! [`rand::Rng`]. Feed the same seed, get the same burst. Nothing in here
//! touches wall-clock time, threads, or I/O.
//!
//! ## Where the randomness goes
//!
//! ```text
//! index ──┐
//! config ─┼─> derive_plan() ──> ParticlePlan { angle, distance,
//! rng ────┘                                    final_size, duration, ... }
//! ```
//!
//! The curves in [`curve`] are NOT randomized: they are pure functions of
//! tween progress and define the effect's visible timing signature.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod curve;
pub mod error;
pub mod plan;

// Re-exports for convenience
pub use config::{ConfigUpdate, ExplosionConfig};
pub use curve::{blur_at, lerp, opacity_at, size_at, BlurCurve};
pub use error::{ExplosionError, ExplosionResult};
pub use plan::{derive_plan, ParticleContent, ParticlePlan};

/// Default particle count for a burst.
///
/// Nine particles reads as a full explosion without flooding small containers.
pub const DEFAULT_PARTICLE_COUNT: u32 = 9;

/// Maximum random perturbation applied to a particle's base angle (radians).
///
/// Evenly spaced base directions plus this jitter produce a chaotic burst
/// rather than a perfect ring. Part of the effect's visual signature.
pub const ANGLE_JITTER_RAD: f32 = 0.6;
