//! # Rendering Surface Seam
//!
//! The engine never draws. It talks to whatever owns the pixels - a DOM
//! bridge, a canvas layer, a test recorder - through this trait.
//!
//! ## Contract (Glass Walls)
//!
//! The engine DOES NOT reach around this interface. In return,
//! implementations must tolerate mutations for ids they no longer know:
//! a cancelled tween's last frame can race element removal, and the engine
//! resolves that race by making stale writes a no-op, not an error.

use std::sync::Arc;

use parking_lot::Mutex;
use pyroclast_core::ParticleContent;

/// Unique identifier for one rendered particle element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticleId(pub u64);

/// Initial visual state of a particle at insertion time.
///
/// Positions are percentages of the container; size is pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleVisual {
    /// Horizontal position (% of container).
    pub x_pct: f32,
    /// Vertical position (% of container).
    pub y_pct: f32,
    /// Width and height (px) - particles are square.
    pub size_px: f32,
    /// Starting opacity.
    pub opacity: f32,
    /// Stacking order.
    pub z_index: i32,
    /// Image or flat color.
    pub content: ParticleContent,
}

/// Interface to whatever renders the particles.
///
/// All methods are synchronous; implementations that bridge to an async
/// renderer should queue internally.
pub trait RenderSurface: Send {
    /// Creates an element with the given initial visual state and returns
    /// its id. The element is visible from this call onward.
    fn insert(&mut self, visual: &ParticleVisual) -> ParticleId;

    /// Moves and resizes an element. Unknown ids are ignored.
    fn set_geometry(&mut self, id: ParticleId, x_pct: f32, y_pct: f32, size_px: f32);

    /// Sets an element's opacity. Unknown ids are ignored.
    fn set_opacity(&mut self, id: ParticleId, opacity: f32);

    /// Sets an element's blur radius (px). Unknown ids are ignored.
    fn set_blur(&mut self, id: ParticleId, blur_px: f32);

    /// Removes an element. Removing an unknown id is a no-op; an id is
    /// removed at most once per insertion.
    fn remove(&mut self, id: ParticleId);
}

/// A rendering surface shared between the controller and the tween driver.
pub type SharedSurface = Arc<Mutex<dyn RenderSurface + Send>>;
