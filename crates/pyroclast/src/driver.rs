//! # Reference Tick Driver
//!
//! A Tokio-backed implementation of the tween seam: one task per tween,
//! ticking at a fixed frame rate, writing eased geometry to the shared
//! surface and reporting raw progress to the engine.
//!
//! Hosts with their own animation system replace this wholesale; it exists
//! so the engine runs headless in tests, benches, and server-side renders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pyroclast_core::lerp;

use crate::surface::SharedSurface;
use crate::tween::{TweenCallbacks, TweenDriver, TweenError, TweenRequest, TweenTicket};
use crate::TICK_RATE;

/// Easing interpretation used by the tick driver.
///
/// The identifiers follow the `power{N}.{in,out,inOut}` naming of the
/// animation library the effect was designed against: `power1` is
/// quadratic, `power2` cubic, `power3` quartic. Unknown names fall back to
/// linear - the identifier is an opaque hint, never a hard failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Easing {
    Linear,
    In(i32),
    Out(i32),
    InOut(i32),
}

impl Easing {
    fn parse(name: &str) -> Self {
        if name == "linear" {
            return Self::Linear;
        }
        let parsed = name.split_once('.').and_then(|(family, mode)| {
            let level = family.strip_prefix("power")?.parse::<i32>().ok()?;
            let exponent = level + 1;
            match mode {
                "in" => Some(Self::In(exponent)),
                "out" => Some(Self::Out(exponent)),
                "inOut" => Some(Self::InOut(exponent)),
                _ => None,
            }
        });
        parsed.unwrap_or_else(|| {
            tracing::debug!(easing = name, "unknown easing identifier, using linear");
            Self::Linear
        })
    }

    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::In(e) => t.powi(e),
            Self::Out(e) => 1.0 - (1.0 - t).powi(e),
            Self::InOut(e) => {
                if t < 0.5 {
                    2.0_f32.powi(e - 1) * t.powi(e)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(e) / 2.0
                }
            }
        }
    }
}

/// Tokio task-per-tween driver with a fixed frame interval.
pub struct TickDriver {
    surface: SharedSurface,
    frame: Duration,
    /// Cancellation flags for in-flight tweens, keyed by ticket.
    tweens: Arc<Mutex<HashMap<u64, Arc<AtomicBool>>>>,
    next_ticket: AtomicU64,
}

impl TickDriver {
    /// Creates a driver ticking at the default [`TICK_RATE`].
    #[must_use]
    pub fn new(surface: SharedSurface) -> Arc<Self> {
        Self::with_frame(surface, Duration::from_secs(1) / TICK_RATE)
    }

    /// Creates a driver with a custom frame interval.
    #[must_use]
    pub fn with_frame(surface: SharedSurface, frame: Duration) -> Arc<Self> {
        Arc::new(Self {
            surface,
            frame,
            tweens: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: AtomicU64::new(0),
        })
    }

    /// Number of tweens currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tweens.lock().len()
    }
}

impl TweenDriver for TickDriver {
    fn animate(
        &self,
        request: TweenRequest,
        callbacks: TweenCallbacks,
    ) -> Result<TweenTicket, TweenError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| TweenError::NoRuntime)?;

        let ticket = TweenTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
        let cancelled = Arc::new(AtomicBool::new(false));
        self.tweens.lock().insert(ticket.0, cancelled.clone());

        let surface = self.surface.clone();
        let registry = self.tweens.clone();
        let frame = self.frame;

        runtime.spawn(async move {
            let TweenCallbacks {
                mut on_progress,
                on_complete,
            } = callbacks;
            let mut on_complete = Some(on_complete);

            let easing = Easing::parse(&request.easing);
            let total = request.duration.as_secs_f32();
            let started = tokio::time::Instant::now();
            let mut ticker = tokio::time::interval(frame);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if cancelled.load(Ordering::Acquire) {
                    // Forced cancellation: no final frame, no completion.
                    break;
                }

                let progress = (started.elapsed().as_secs_f32() / total).min(1.0);
                let eased = easing.apply(progress);
                {
                    let mut surface = surface.lock();
                    surface.set_geometry(
                        request.target,
                        lerp(request.from.x_pct, request.to.x_pct, eased),
                        lerp(request.from.y_pct, request.to.y_pct, eased),
                        lerp(request.from.size_px, request.to.size_px, eased),
                    );
                }
                on_progress(progress);

                if progress >= 1.0 {
                    if let Some(complete) = on_complete.take() {
                        complete();
                    }
                    break;
                }
            }

            registry.lock().remove(&ticket.0);
        });

        Ok(ticket)
    }

    fn cancel(&self, ticket: TweenTicket) {
        if let Some(flag) = self.tweens.lock().remove(&ticket.0) {
            flag.store(true, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_parse_known_names() {
        assert_eq!(Easing::parse("linear"), Easing::Linear);
        assert_eq!(Easing::parse("power1.in"), Easing::In(2));
        assert_eq!(Easing::parse("power2.in"), Easing::In(3));
        assert_eq!(Easing::parse("power2.out"), Easing::Out(3));
        assert_eq!(Easing::parse("power3.inOut"), Easing::InOut(4));
    }

    #[test]
    fn test_easing_parse_unknown_falls_back_to_linear() {
        assert_eq!(Easing::parse("elastic.out"), Easing::Linear);
        assert_eq!(Easing::parse("bounce"), Easing::Linear);
        assert_eq!(Easing::parse(""), Easing::Linear);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::In(3),
            Easing::Out(3),
            Easing::InOut(3),
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_power2_in_is_cubic() {
        let eased = Easing::parse("power2.in").apply(0.5);
        assert!((eased - 0.125).abs() < 1e-6);
    }
}
