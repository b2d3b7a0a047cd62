//! # Parameter Generator
//!
//! One motion plan per particle: where it flies, how big it ends up, how long
//! it takes. Pure given the RNG, so a seeded source reproduces a burst
//! exactly.
//!
//! ## The size buckets
//!
//! Final size is drawn from a fixed three-bucket split:
//!
//! ```text
//! draw s in [0, 1)
//!   s < 0.30          -> final_size_min * 0.5        (small, receding)
//!   0.30 <= s < 0.70  -> u(final_size_min, _max)     (typical)
//!   s >= 0.70         -> final_size_max * (1 + u(0, 0.5))  (oversized)
//! ```
//!
//! The 30/40/30 split and its multipliers are design constants, not config:
//! they are what makes the burst read as chaotic instead of uniform.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::ExplosionConfig;
use crate::ANGLE_JITTER_RAD;

/// Bucket boundary below which a particle gets the small-receding size.
pub const SMALL_BUCKET_CUTOFF: f32 = 0.30;
/// Bucket boundary below which a particle gets a typical in-range size.
pub const LARGE_BUCKET_CUTOFF: f32 = 0.70;
/// Size multiplier for the small bucket.
pub const SMALL_SIZE_FACTOR: f32 = 0.5;
/// Maximum bonus multiplier for the oversized bucket (up to 1.5x max).
pub const OVERSIZE_MAX_BONUS: f32 = 0.5;
/// Lower bound of the per-particle speed multiplier.
pub const SPEED_JITTER_MIN: f32 = 0.7;
/// Upper bound of the per-particle speed multiplier.
pub const SPEED_JITTER_MAX: f32 = 1.3;

/// Visual content of one particle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParticleContent {
    /// An image reference, chosen uniformly from the configured set.
    Image(String),
    /// A flat fill color (used when no images are configured).
    Color(String),
}

/// Everything the controller needs to animate one particle.
///
/// Owned exclusively by the controller for the run's lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticlePlan {
    /// Position of this particle in the burst, `0..particle_count`.
    pub index: u32,
    /// Flight direction in radians: evenly spaced base angle plus jitter.
    pub angle: f32,
    /// Radial travel distance (% of container).
    pub distance: f32,
    /// Final size (px), drawn from the three-bucket distribution.
    pub final_size: f32,
    /// Tween duration in seconds, already divided by the acceleration factor.
    pub duration_secs: f32,
    /// Target X (% of container).
    pub final_x: f32,
    /// Target Y (% of container).
    pub final_y: f32,
    /// What this particle displays.
    pub content: ParticleContent,
}

/// Derives the motion plan for particle `index` of a burst.
///
/// Pure given the random source: the same `(index, config, rng state)`
/// always yields the same plan. Callers are expected to have validated the
/// configuration first; bounds here are used as-is.
#[must_use]
#[allow(clippy::cast_precision_loss)] // particle counts are tiny
pub fn derive_plan<R: Rng + ?Sized>(
    index: u32,
    config: &ExplosionConfig,
    rng: &mut R,
) -> ParticlePlan {
    let base_angle = (index as f32 / config.particle_count as f32) * TAU;
    let angle = base_angle + rng.gen_range(-ANGLE_JITTER_RAD..=ANGLE_JITTER_RAD);

    // Inclusive bounds: degenerate min == max configs are legal.
    let distance = rng.gen_range(config.distance_min..=config.distance_max);

    let bucket = rng.gen::<f32>();
    let final_size = if bucket < SMALL_BUCKET_CUTOFF {
        config.final_size_min * SMALL_SIZE_FACTOR
    } else if bucket < LARGE_BUCKET_CUTOFF {
        rng.gen_range(config.final_size_min..=config.final_size_max)
    } else {
        config.final_size_max * (1.0 + rng.gen_range(0.0..OVERSIZE_MAX_BONUS))
    };

    let base_duration = rng.gen_range(config.duration_min..=config.duration_max);
    let speed = rng.gen_range(SPEED_JITTER_MIN..=SPEED_JITTER_MAX);
    let duration_secs = (base_duration * speed) / config.acceleration_factor;

    let final_x = config.origin_x + angle.cos() * distance;
    let final_y = config.origin_y + angle.sin() * distance;

    let content = if config.particle_images.is_empty() {
        ParticleContent::Color(config.particle_color.clone())
    } else {
        let pick = rng.gen_range(0..config.particle_images.len());
        ParticleContent::Image(config.particle_images[pick].clone())
    };

    ParticlePlan {
        index,
        angle,
        distance,
        final_size,
        duration_secs,
        final_x,
        final_y,
        content,
    }
}
