//! # Burst Configuration
//!
//! Every tunable of the effect lives here. A controller snapshots this struct
//! when a burst starts, so reconfiguring mid-run only affects future bursts.
//!
//! Configs load from TOML (partial files are fine, missing fields take the
//! defaults) and merge shallowly through [`ConfigUpdate`]. Validation is
//! fail-fast: a bad merge is rejected whole and the previous config survives.

use serde::{Deserialize, Serialize};

use crate::curve::BlurCurve;
use crate::error::{ExplosionError, ExplosionResult};
use crate::DEFAULT_PARTICLE_COUNT;

/// Full configuration for one particle burst.
///
/// Positions and distances are percentages of the host container; sizes and
/// blur radii are pixels; durations are seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Origin X, as a percentage of the container width.
    pub origin_x: f32,
    /// Origin Y, as a percentage of the container height.
    pub origin_y: f32,

    /// Number of particles in the burst.
    pub particle_count: u32,

    /// Shared starting size for every particle (px).
    pub initial_size: f32,
    /// Lower bound for a particle's final size (px).
    pub final_size_min: f32,
    /// Upper bound for a particle's final size (px).
    pub final_size_max: f32,

    /// Opacity at progress 0. Must be within [0, 1].
    pub initial_opacity: f32,
    /// Opacity at progress 1. Must be within [0, 1].
    pub final_opacity: f32,

    /// Minimum radial travel distance (% of container).
    pub distance_min: f32,
    /// Maximum radial travel distance (% of container).
    pub distance_max: f32,

    /// Minimum base tween duration (seconds).
    pub duration_min: f32,
    /// Maximum base tween duration (seconds).
    pub duration_max: f32,
    /// Global duration divisor. Larger = faster burst. Must be positive.
    pub acceleration_factor: f32,

    /// Whether particles blur as they travel.
    pub blur_enabled: bool,
    /// Blur radius at progress 0 (px).
    pub blur_min: f32,
    /// Blur radius at progress 1 (px).
    pub blur_max: f32,
    /// Shaping curve that maps progress into the blur range.
    pub blur_curve: BlurCurve,

    /// Easing identifier for the geometry tween.
    ///
    /// Opaque to the core: the tween driver interprets it.
    pub ease: String,

    /// Stacking order for created elements.
    pub z_index: i32,

    /// Image references; one is chosen uniformly at random per particle.
    /// When empty, every particle uses [`Self::particle_color`].
    pub particle_images: Vec<String>,
    /// Flat fallback color used when no images are configured.
    pub particle_color: String,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            origin_x: 50.0,
            origin_y: 50.0,
            particle_count: DEFAULT_PARTICLE_COUNT,
            initial_size: 5.0,
            final_size_min: 80.0,
            final_size_max: 140.0,
            initial_opacity: 0.3,
            final_opacity: 1.0,
            distance_min: 50.0,
            distance_max: 100.0,
            duration_min: 1.5,
            duration_max: 2.5,
            acceleration_factor: 1.0,
            blur_enabled: true,
            blur_min: 0.0,
            blur_max: 15.0,
            blur_curve: BlurCurve::Linear,
            ease: "power2.in".to_string(),
            z_index: 2,
            particle_images: Vec::new(),
            particle_color: "#07E400".to_string(),
        }
    }
}

impl ExplosionConfig {
    /// Validates every numeric field, failing fast on the first problem.
    ///
    /// # Errors
    ///
    /// Returns the specific [`ExplosionError`] variant describing the first
    /// invalid field found.
    pub fn validate(&self) -> ExplosionResult<()> {
        if self.particle_count == 0 {
            return Err(ExplosionError::NoParticles);
        }
        if self.acceleration_factor <= 0.0 {
            return Err(ExplosionError::NonPositiveAcceleration(
                self.acceleration_factor,
            ));
        }
        if self.duration_min <= 0.0 {
            return Err(ExplosionError::NonPositiveDuration(self.duration_min));
        }
        for (field, min, max) in [
            ("final_size", self.final_size_min, self.final_size_max),
            ("distance", self.distance_min, self.distance_max),
            ("duration", self.duration_min, self.duration_max),
            ("blur", self.blur_min, self.blur_max),
        ] {
            if min > max {
                return Err(ExplosionError::InvertedRange { field, min, max });
            }
        }
        for (field, value) in [
            ("initial_opacity", self.initial_opacity),
            ("final_opacity", self.final_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ExplosionError::OpacityOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("initial_size", self.initial_size),
            ("final_size_min", self.final_size_min),
            ("blur_min", self.blur_min),
            ("distance_min", self.distance_min),
        ] {
            if value < 0.0 {
                return Err(ExplosionError::NegativeQuantity { field, value });
            }
        }
        Ok(())
    }

    /// Shallow-merges `update` into this configuration.
    ///
    /// Only fields present in the update change. Callers that need atomicity
    /// should merge into a clone, [`validate`](Self::validate), then commit.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = update.$field {
                    self.$field = value;
                })*
            };
        }
        merge!(
            origin_x,
            origin_y,
            particle_count,
            initial_size,
            final_size_min,
            final_size_max,
            initial_opacity,
            final_opacity,
            distance_min,
            distance_max,
            duration_min,
            duration_max,
            acceleration_factor,
            blur_enabled,
            blur_min,
            blur_max,
            blur_curve,
            z_index,
        );
        if let Some(ease) = &update.ease {
            self.ease = ease.clone();
        }
        if let Some(images) = &update.particle_images {
            self.particle_images = images.clone();
        }
        if let Some(color) = &update.particle_color {
            self.particle_color = color.clone();
        }
    }

    /// Loads a configuration from a TOML document.
    ///
    /// Partial documents are fine: absent fields take their defaults. The
    /// parsed configuration is validated before being returned.
    ///
    /// # Errors
    ///
    /// [`ExplosionError::InvalidConfig`] when the document does not parse,
    /// or the specific validation error when the numbers are bad.
    pub fn from_toml_str(document: &str) -> ExplosionResult<Self> {
        let config: Self = toml::from_str(document)
            .map_err(|err| ExplosionError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Partial configuration used by reconfigure.
///
/// Every field is optional; `None` means "keep the current value".
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    /// New origin X (% of container).
    pub origin_x: Option<f32>,
    /// New origin Y (% of container).
    pub origin_y: Option<f32>,
    /// New particle count.
    pub particle_count: Option<u32>,
    /// New shared starting size (px).
    pub initial_size: Option<f32>,
    /// New final size lower bound (px).
    pub final_size_min: Option<f32>,
    /// New final size upper bound (px).
    pub final_size_max: Option<f32>,
    /// New opacity at progress 0.
    pub initial_opacity: Option<f32>,
    /// New opacity at progress 1.
    pub final_opacity: Option<f32>,
    /// New minimum travel distance (%).
    pub distance_min: Option<f32>,
    /// New maximum travel distance (%).
    pub distance_max: Option<f32>,
    /// New minimum base duration (seconds).
    pub duration_min: Option<f32>,
    /// New maximum base duration (seconds).
    pub duration_max: Option<f32>,
    /// New global duration divisor.
    pub acceleration_factor: Option<f32>,
    /// Toggle the blur pass.
    pub blur_enabled: Option<bool>,
    /// New blur radius at progress 0 (px).
    pub blur_min: Option<f32>,
    /// New blur radius at progress 1 (px).
    pub blur_max: Option<f32>,
    /// New blur shaping curve.
    pub blur_curve: Option<BlurCurve>,
    /// New easing identifier.
    pub ease: Option<String>,
    /// New stacking order.
    pub z_index: Option<i32>,
    /// New image set.
    pub particle_images: Option<Vec<String>>,
    /// New fallback color.
    pub particle_color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExplosionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.particle_count, 9);
        assert!((config.origin_x - 50.0).abs() < f32::EPSILON);
        assert_eq!(config.ease, "power2.in");
        assert_eq!(config.particle_color, "#07E400");
    }

    #[test]
    fn test_zero_acceleration_rejected() {
        let config = ExplosionConfig {
            acceleration_factor: 0.0,
            ..ExplosionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ExplosionError::NonPositiveAcceleration(0.0))
        );
    }

    #[test]
    fn test_zero_particles_rejected() {
        let config = ExplosionConfig {
            particle_count: 0,
            ..ExplosionConfig::default()
        };
        assert_eq!(config.validate(), Err(ExplosionError::NoParticles));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = ExplosionConfig {
            distance_min: 120.0,
            distance_max: 100.0,
            ..ExplosionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ExplosionError::InvertedRange {
                field: "distance",
                min: 120.0,
                max: 100.0,
            })
        );
    }

    #[test]
    fn test_opacity_out_of_range_rejected() {
        let config = ExplosionConfig {
            final_opacity: 1.5,
            ..ExplosionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ExplosionError::OpacityOutOfRange {
                field: "final_opacity",
                value: 1.5,
            })
        );
    }

    #[test]
    fn test_shallow_merge_touches_only_present_fields() {
        let mut config = ExplosionConfig::default();
        config.apply(&ConfigUpdate {
            particle_count: Some(3),
            blur_enabled: Some(false),
            ..ConfigUpdate::default()
        });
        assert_eq!(config.particle_count, 3);
        assert!(!config.blur_enabled);
        // Untouched fields keep their defaults.
        assert!((config.duration_max - 2.5).abs() < f32::EPSILON);
        assert_eq!(config.ease, "power2.in");
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = ExplosionConfig::from_toml_str(
            r#"
            particle_count = 12
            blur_curve = "ease-in-out"
            "#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.blur_curve, BlurCurve::EaseInOut);
        assert!((config.final_size_max - 140.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let err = ExplosionConfig::from_toml_str("particle_count = \"lots\"").unwrap_err();
        assert!(matches!(err, ExplosionError::InvalidConfig(_)));
    }

    #[test]
    fn test_toml_with_bad_numbers_fails_validation() {
        let err = ExplosionConfig::from_toml_str("acceleration_factor = 0.0").unwrap_err();
        assert_eq!(err, ExplosionError::NonPositiveAcceleration(0.0));
    }
}
