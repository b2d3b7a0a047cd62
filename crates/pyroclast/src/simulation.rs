//! # Simulation Surface
//!
//! An in-memory [`RenderSurface`] that records what a real renderer would
//! draw. Integration tests and benches run the full engine against it
//! headless, then assert on element counts and final states.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::surface::{ParticleId, ParticleVisual, RenderSurface};

/// Recorded state of one live element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementState {
    /// Current horizontal position (% of container).
    pub x_pct: f32,
    /// Current vertical position (% of container).
    pub y_pct: f32,
    /// Current size (px).
    pub size_px: f32,
    /// Current opacity.
    pub opacity: f32,
    /// Current blur radius (px).
    pub blur_px: f32,
    /// The visual the element was inserted with.
    pub visual: ParticleVisual,
}

/// In-memory rendering surface.
///
/// Mutations for unknown ids are silently ignored, per the seam contract.
#[derive(Debug, Default)]
pub struct MemorySurface {
    next_id: u64,
    live: HashMap<ParticleId, ElementState>,
    inserted: usize,
    removed: usize,
}

impl MemorySurface {
    /// Creates an empty surface already wrapped for sharing with the engine.
    #[must_use]
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }

    /// Number of elements currently on the surface.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total elements ever inserted.
    #[must_use]
    pub fn inserted_count(&self) -> usize {
        self.inserted
    }

    /// Total elements removed so far.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed
    }

    /// Current state of a live element, if it exists.
    #[must_use]
    pub fn state(&self, id: ParticleId) -> Option<&ElementState> {
        self.live.get(&id)
    }

    /// Ids of all live elements, in no particular order.
    #[must_use]
    pub fn live_ids(&self) -> Vec<ParticleId> {
        self.live.keys().copied().collect()
    }
}

impl RenderSurface for MemorySurface {
    fn insert(&mut self, visual: &ParticleVisual) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.inserted += 1;
        self.live.insert(
            id,
            ElementState {
                x_pct: visual.x_pct,
                y_pct: visual.y_pct,
                size_px: visual.size_px,
                opacity: visual.opacity,
                blur_px: 0.0,
                visual: visual.clone(),
            },
        );
        id
    }

    fn set_geometry(&mut self, id: ParticleId, x_pct: f32, y_pct: f32, size_px: f32) {
        if let Some(state) = self.live.get_mut(&id) {
            state.x_pct = x_pct;
            state.y_pct = y_pct;
            state.size_px = size_px;
        }
    }

    fn set_opacity(&mut self, id: ParticleId, opacity: f32) {
        if let Some(state) = self.live.get_mut(&id) {
            state.opacity = opacity;
        }
    }

    fn set_blur(&mut self, id: ParticleId, blur_px: f32) {
        if let Some(state) = self.live.get_mut(&id) {
            state.blur_px = blur_px;
        }
    }

    fn remove(&mut self, id: ParticleId) {
        if self.live.remove(&id).is_some() {
            self.removed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyroclast_core::ParticleContent;

    fn visual() -> ParticleVisual {
        ParticleVisual {
            x_pct: 50.0,
            y_pct: 50.0,
            size_px: 5.0,
            opacity: 0.3,
            z_index: 2,
            content: ParticleContent::Color("#07E400".to_string()),
        }
    }

    #[test]
    fn test_insert_remove_counters() {
        let mut surface = MemorySurface::default();
        let a = surface.insert(&visual());
        let b = surface.insert(&visual());
        assert_eq!(surface.live_count(), 2);
        surface.remove(a);
        assert_eq!(surface.live_count(), 1);
        assert_eq!(surface.inserted_count(), 2);
        assert_eq!(surface.removed_count(), 1);
        // Double remove does not double count.
        surface.remove(a);
        assert_eq!(surface.removed_count(), 1);
        surface.remove(b);
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn test_stale_writes_are_ignored() {
        let mut surface = MemorySurface::default();
        let id = surface.insert(&visual());
        surface.remove(id);
        // None of these may panic or resurrect the element.
        surface.set_geometry(id, 80.0, 20.0, 100.0);
        surface.set_opacity(id, 1.0);
        surface.set_blur(id, 7.0);
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn test_mutations_update_state() {
        let mut surface = MemorySurface::default();
        let id = surface.insert(&visual());
        surface.set_geometry(id, 75.0, 30.0, 90.0);
        surface.set_opacity(id, 0.8);
        surface.set_blur(id, 4.0);
        let state = surface.state(id).unwrap();
        assert!((state.x_pct - 75.0).abs() < f32::EPSILON);
        assert!((state.size_px - 90.0).abs() < f32::EPSILON);
        assert!((state.opacity - 0.8).abs() < f32::EPSILON);
        assert!((state.blur_px - 4.0).abs() < f32::EPSILON);
    }
}
