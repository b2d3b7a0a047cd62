//! # Burst Error Types
//!
//! All errors that can surface from configuration handling.
//!
//! The engine validates numbers once, at configuration-merge time, so a bad
//! acceleration factor becomes a descriptive error here instead of a
//! NaN-positioned particle three frames into a run.

use thiserror::Error;

/// Errors that can occur while building or updating a burst configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExplosionError {
    /// A burst needs at least one particle.
    #[error("particle count must be at least 1")]
    NoParticles,

    /// The global duration divisor would divide by zero (or flip signs).
    #[error("acceleration factor must be positive, got {0}")]
    NonPositiveAcceleration(f32),

    /// Tween durations of zero would complete before their first frame.
    #[error("duration_min must be positive, got {0}")]
    NonPositiveDuration(f32),

    /// A min/max pair is inverted.
    #[error("invalid range for {field}: min {min} > max {max}")]
    InvertedRange {
        /// Which bounded pair was inverted.
        field: &'static str,
        /// The lower bound as configured.
        min: f32,
        /// The upper bound as configured.
        max: f32,
    },

    /// An opacity landed outside [0, 1].
    #[error("{field} must be within [0, 1], got {value}")]
    OpacityOutOfRange {
        /// Which opacity field was out of range.
        field: &'static str,
        /// The offending value.
        value: f32,
    },

    /// A pixel quantity (size or blur radius) was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeQuantity {
        /// Which field was negative.
        field: &'static str,
        /// The offending value.
        value: f32,
    },

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for burst configuration operations.
pub type ExplosionResult<T> = Result<T, ExplosionError>;
