//! # Interpolation Curves
//!
//! Pure functions of tween progress. The tween driver owns the clock; these
//! functions only map its monotonic progress in [0, 1] into visual values.
//!
//! The exact breakpoints and exponents here ARE the effect: change one and
//! the burst reads differently on screen. Treat them like wire formats.

use serde::{Deserialize, Serialize};

use crate::config::ExplosionConfig;

/// Shaping curve applied to progress before scaling into the blur range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlurCurve {
    /// No shaping: blur follows progress directly.
    #[default]
    Linear,
    /// Slow start: `p^2`.
    EaseIn,
    /// Fast start: `1 - (1 - p)^2`.
    EaseOut,
    /// S-curve: `2p^2` below the midpoint, `1 - (-2p + 2)^2 / 2` above.
    EaseInOut,
}

impl BlurCurve {
    /// Maps raw progress through this curve's shaping function.
    #[inline]
    #[must_use]
    pub fn shape(self, progress: f32) -> f32 {
        match self {
            Self::Linear => progress,
            Self::EaseIn => progress * progress,
            Self::EaseOut => 1.0 - (1.0 - progress).powi(2),
            Self::EaseInOut => {
                if progress < 0.5 {
                    2.0 * progress * progress
                } else {
                    1.0 - (-2.0 * progress + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Linear interpolation between `a` and `b`.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Opacity at the given progress: a straight line from the configured
/// initial opacity to the final one.
#[inline]
#[must_use]
pub fn opacity_at(config: &ExplosionConfig, progress: f32) -> f32 {
    lerp(config.initial_opacity, config.final_opacity, progress)
}

/// Size at the given progress, for callback consumers that want a size
/// independent of the driver's own geometry tweening.
#[inline]
#[must_use]
pub fn size_at(config: &ExplosionConfig, final_size: f32, progress: f32) -> f32 {
    lerp(config.initial_size, final_size, progress)
}

/// Blur radius at the given progress.
///
/// Returns 0 whenever blur is disabled; otherwise shapes progress through
/// the configured [`BlurCurve`] and scales it into `[blur_min, blur_max]`.
#[inline]
#[must_use]
pub fn blur_at(config: &ExplosionConfig, progress: f32) -> f32 {
    if !config.blur_enabled {
        return 0.0;
    }
    lerp(
        config.blur_min,
        config.blur_max,
        config.blur_curve.shape(progress),
    )
}
