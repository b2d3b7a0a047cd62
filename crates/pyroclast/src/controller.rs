//! # Explosion Controller
//!
//! Orchestrates one burst: derive plans, insert elements, start tweens, wire
//! the per-frame opacity/blur callbacks, and resolve when every particle has
//! finished.
//!
//! ## Run lifecycle
//!
//! Each `explode()` invocation owns its own [`RunState`]: a count-down latch
//! over the particle completions plus the tracked tween tickets. Re-entrant
//! `explode()` calls therefore produce independent, separately-completing
//! bursts, and `stop()` can clear all of them without cross-run
//! interference.
//!
//! ## Cancellation
//!
//! `stop()` is immediate and total: every tracked tween is force-cancelled,
//! every tracked element removed synchronously, and every run's latch is
//! forced to settle - a pending `explode()` resolves instead of hanging.
//! The completion hook is only invoked for runs that finish naturally.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::Notify;

use pyroclast_core::{
    blur_at, derive_plan, opacity_at, ConfigUpdate, ExplosionConfig, ExplosionResult, ParticlePlan,
};

use crate::surface::{ParticleId, ParticleVisual, SharedSurface};
use crate::tween::{Geometry, TweenCallbacks, TweenDriver, TweenRequest, TweenTicket};

/// Hook invoked when a particle's element has been inserted.
pub type ParticleCreateHook = Arc<dyn Fn(ParticleId, u32) + Send + Sync>;
/// Hook invoked once per frame per particle, after opacity and blur.
pub type ParticleUpdateHook = Arc<dyn Fn(ParticleId, f32, u32) + Send + Sync>;
/// Hook invoked once when a burst completes naturally.
pub type CompleteHook = Arc<dyn Fn() + Send + Sync>;

/// Optional lifecycle hooks for a controller.
///
/// Hooks observe state, they do not own it: by the time `on_particle_update`
/// runs, the frame's opacity and blur writes have already landed.
#[derive(Clone, Default)]
pub struct ExplosionHooks {
    /// Called with `(id, index)` right after each element is inserted.
    pub on_particle_create: Option<ParticleCreateHook>,
    /// Called with `(id, progress, index)` every frame, after the engine's
    /// own writes for that frame.
    pub on_particle_update: Option<ParticleUpdateHook>,
    /// Called exactly once per naturally-completed burst. Not called for
    /// stopped runs or when no surface was attached.
    pub on_complete: Option<CompleteHook>,
}

/// One tracked particle of an in-flight run.
struct Tracked {
    id: ParticleId,
    ticket: TweenTicket,
}

/// Per-invocation run state: the count-down latch and the cancellation set.
struct RunState {
    /// Particles that have not completed yet.
    remaining: AtomicUsize,
    /// Set by `abort`; suppresses the completion hook.
    stopped: AtomicBool,
    /// Woken when `remaining` hits zero.
    latch: Notify,
    /// Live particles with their cancellation tickets.
    tracked: Mutex<Vec<Tracked>>,
    /// The surface this run's elements live on.
    surface: SharedSurface,
}

impl RunState {
    fn new(particle_count: usize, surface: SharedSurface) -> Self {
        Self {
            remaining: AtomicUsize::new(particle_count),
            stopped: AtomicBool::new(false),
            latch: Notify::new(),
            tracked: Mutex::new(Vec::with_capacity(particle_count)),
            surface,
        }
    }

    fn track(&self, id: ParticleId, ticket: TweenTicket) {
        self.tracked.lock().push(Tracked { id, ticket });
    }

    /// Counts one particle as finished. Saturates at zero so a completion
    /// racing an abort can never underflow the latch.
    fn finish(&self, id: ParticleId) {
        self.tracked.lock().retain(|tracked| tracked.id != id);
        let mut current = self.remaining.load(Ordering::Acquire);
        while current > 0 {
            match self.remaining.compare_exchange(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if current == 1 {
                        self.latch.notify_waiters();
                    }
                    break;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Suspends until every particle has finished or the run was aborted.
    async fn join(&self) {
        loop {
            // Register for the wakeup BEFORE checking, so a notify between
            // the check and the await cannot be lost.
            let notified = self.latch.notified();
            if self.remaining.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Cancels every tracked tween, removes every tracked element, and
    /// forces the latch to settle.
    fn abort(&self, driver: &dyn TweenDriver) {
        self.stopped.store(true, Ordering::Release);
        let drained = std::mem::take(&mut *self.tracked.lock());
        for tracked in &drained {
            driver.cancel(tracked.ticket);
        }
        {
            let mut surface = self.surface.lock();
            for tracked in &drained {
                surface.remove(tracked.id);
            }
        }
        self.remaining.store(0, Ordering::Release);
        self.latch.notify_waiters();
    }

    fn was_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// The burst orchestrator.
///
/// Interior-mutable throughout so a wrapped controller can be driven from a
/// shared handle; see [`ExplosionHandle`].
pub struct ExplosionController {
    driver: Arc<dyn TweenDriver>,
    config: Mutex<ExplosionConfig>,
    hooks: ExplosionHooks,
    surface: Mutex<Option<SharedSurface>>,
    runs: Mutex<Vec<Arc<RunState>>>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl ExplosionController {
    /// Creates a controller with a time-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns the validation error when `config` is numerically invalid.
    pub fn new(driver: Arc<dyn TweenDriver>, config: ExplosionConfig) -> ExplosionResult<Self> {
        Self::with_rng(driver, config, StdRng::seed_from_u64(entropy_seed()))
    }

    /// Creates a controller with an injected random source, for
    /// deterministic bursts in tests.
    ///
    /// # Errors
    ///
    /// Returns the validation error when `config` is numerically invalid.
    pub fn with_rng(
        driver: Arc<dyn TweenDriver>,
        config: ExplosionConfig,
        rng: impl RngCore + Send + 'static,
    ) -> ExplosionResult<Self> {
        config.validate()?;
        Ok(Self {
            driver,
            config: Mutex::new(config),
            hooks: ExplosionHooks::default(),
            surface: Mutex::new(None),
            runs: Mutex::new(Vec::new()),
            rng: Mutex::new(Box::new(rng)),
        })
    }

    /// Installs lifecycle hooks. Call before wrapping in a handle.
    pub fn set_hooks(&mut self, hooks: ExplosionHooks) {
        self.hooks = hooks;
    }

    /// Attaches (or replaces) the rendering surface future bursts render to.
    pub fn attach_surface(&self, surface: SharedSurface) {
        *self.surface.lock() = Some(surface);
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> ExplosionConfig {
        self.config.lock().clone()
    }

    /// Whether any burst is currently in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.runs.lock().is_empty()
    }

    /// Shallow-merges `update` into the configuration.
    ///
    /// The merge is atomic: an invalid result is rejected whole and the
    /// previous configuration stays in force. Already-running bursts are
    /// unaffected either way; only future `explode()` calls observe changes.
    ///
    /// # Errors
    ///
    /// Returns the validation error describing the first invalid field of
    /// the merged configuration.
    pub fn update_config(&self, update: &ConfigUpdate) -> ExplosionResult<()> {
        let mut config = self.config.lock();
        let mut merged = config.clone();
        merged.apply(update);
        merged.validate()?;
        *config = merged;
        Ok(())
    }

    /// Runs one burst to completion.
    ///
    /// With no surface attached this is a reported no-op: a diagnostic is
    /// emitted, nothing is created, and the future resolves immediately
    /// without invoking the completion hook. Otherwise it resolves once
    /// every particle has completed or the run has been stopped.
    pub async fn explode(&self) {
        let Some(surface) = self.surface.lock().clone() else {
            tracing::error!("explode() called with no render surface attached");
            return;
        };

        // Immutable snapshot for the whole run; reconfigure only affects
        // future bursts.
        let config = Arc::new(self.config.lock().clone());
        let run = Arc::new(RunState::new(
            config.particle_count as usize,
            surface.clone(),
        ));
        self.runs.lock().push(Arc::clone(&run));
        tracing::debug!(particles = config.particle_count, "burst started");

        let plans: Vec<ParticlePlan> = {
            let mut rng = self.rng.lock();
            (0..config.particle_count)
                .map(|index| derive_plan(index, &config, &mut **rng))
                .collect()
        };

        for plan in plans {
            self.launch_particle(&surface, &config, &run, plan);
        }

        run.join().await;
        self.runs.lock().retain(|other| !Arc::ptr_eq(other, &run));

        if run.was_stopped() {
            tracing::debug!("burst stopped before completion");
        } else {
            tracing::debug!("burst completed");
            if let Some(hook) = &self.hooks.on_complete {
                hook();
            }
        }
    }

    /// Stops every in-flight burst: cancels all tweens, removes all tracked
    /// elements synchronously, and settles all pending `explode()` futures.
    /// Calling with nothing active is a no-op.
    pub fn stop(&self) {
        let runs = std::mem::take(&mut *self.runs.lock());
        if runs.is_empty() {
            return;
        }
        tracing::debug!(runs = runs.len(), "stopping all in-flight bursts");
        for run in runs {
            run.abort(self.driver.as_ref());
        }
    }

    /// Inserts one particle's element and starts its tween.
    fn launch_particle(
        &self,
        surface: &SharedSurface,
        config: &Arc<ExplosionConfig>,
        run: &Arc<RunState>,
        plan: ParticlePlan,
    ) {
        let visual = ParticleVisual {
            x_pct: config.origin_x,
            y_pct: config.origin_y,
            size_px: config.initial_size,
            opacity: config.initial_opacity,
            z_index: config.z_index,
            content: plan.content.clone(),
        };
        let id = surface.lock().insert(&visual);
        if let Some(hook) = &self.hooks.on_particle_create {
            hook(id, plan.index);
        }

        let progress_surface = surface.clone();
        let progress_config = Arc::clone(config);
        let update_hook = self.hooks.on_particle_update.clone();
        let index = plan.index;
        let on_progress = Box::new(move |progress: f32| {
            // Frame order contract: opacity, then blur (only if enabled),
            // then the user hook - the hook sees the frame's final state.
            {
                let mut surface = progress_surface.lock();
                surface.set_opacity(id, opacity_at(&progress_config, progress));
                if progress_config.blur_enabled {
                    surface.set_blur(id, blur_at(&progress_config, progress));
                }
            }
            if let Some(hook) = &update_hook {
                hook(id, progress, index);
            }
        });

        let complete_surface = surface.clone();
        let complete_run = Arc::clone(run);
        let on_complete = Box::new(move || {
            complete_surface.lock().remove(id);
            complete_run.finish(id);
        });

        let request = TweenRequest {
            target: id,
            from: Geometry {
                x_pct: config.origin_x,
                y_pct: config.origin_y,
                size_px: config.initial_size,
            },
            to: Geometry {
                x_pct: plan.final_x,
                y_pct: plan.final_y,
                size_px: plan.final_size,
            },
            duration: Duration::from_secs_f32(plan.duration_secs),
            easing: config.ease.clone(),
        };

        match self.driver.animate(
            request,
            TweenCallbacks {
                on_progress,
                on_complete,
            },
        ) {
            Ok(ticket) => run.track(id, ticket),
            Err(error) => {
                // A lost particle still counts toward completion - one bad
                // tween must never hang the join.
                tracing::warn!(particle = plan.index, %error, "tween failed to start");
                surface.lock().remove(id);
                run.finish(id);
            }
        }
    }
}

/// Cheap, clonable host integration surface.
///
/// This is the entire public contract a framework wrapper needs:
/// explode / stop / reconfigure / is-active.
#[derive(Clone)]
pub struct ExplosionHandle {
    controller: Arc<ExplosionController>,
}

impl From<ExplosionController> for ExplosionHandle {
    fn from(controller: ExplosionController) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}

impl ExplosionHandle {
    /// Runs one burst to completion. See [`ExplosionController::explode`].
    pub async fn explode(&self) {
        self.controller.explode().await;
    }

    /// Stops every in-flight burst. See [`ExplosionController::stop`].
    pub fn stop(&self) {
        self.controller.stop();
    }

    /// Reconfigures future bursts. See [`ExplosionController::update_config`].
    ///
    /// # Errors
    ///
    /// Returns the validation error when the merged configuration is invalid.
    pub fn update_config(&self, update: &ConfigUpdate) -> ExplosionResult<()> {
        self.controller.update_config(update)
    }

    /// Whether any burst is currently in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.controller.is_active()
    }

    /// Attaches (or replaces) the rendering surface.
    pub fn attach_surface(&self, surface: SharedSurface) {
        self.controller.attach_surface(surface);
    }
}

/// Time-seeded value for the default RNG.
///
/// Visual jitter only - nothing here needs cryptographic strength, and the
/// constants are the usual LCG pair.
fn entropy_seed() -> u64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let mixed = now.as_secs() ^ u64::from(now.subsec_nanos());
    mixed
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}
