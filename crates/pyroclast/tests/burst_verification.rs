//! # Burst Verification Tests
//!
//! End-to-end runs of the full engine against the in-memory surface and the
//! reference tick driver:
//!
//! 1. **Completion protocol**: N created, N removed, one completion hook,
//!    empty container afterward
//! 2. **Frame contract**: hooks observe the frame's final opacity/blur state
//! 3. **Cancellation**: stop() clears everything synchronously and settles
//!    the pending explode()
//! 4. **Re-entrancy**: overlapping bursts complete independently
//!
//! Run with: cargo test --test burst_verification

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pyroclast::simulation::MemorySurface;
use pyroclast::{
    ExplosionController, ExplosionHandle, ExplosionHooks, SharedSurface, TickDriver,
};
use pyroclast_core::{blur_at, opacity_at, ConfigUpdate, ExplosionConfig};

/// Builds a controller wired to a fresh in-memory surface and tick driver.
fn rig(config: ExplosionConfig) -> (ExplosionController, Arc<Mutex<MemorySurface>>) {
    let surface = MemorySurface::shared();
    let shared: SharedSurface = surface.clone();
    let driver = TickDriver::with_frame(shared.clone(), Duration::from_millis(4));
    let controller =
        ExplosionController::with_rng(driver, config, ChaCha8Rng::seed_from_u64(99)).unwrap();
    controller.attach_surface(shared);
    (controller, surface)
}

// ============================================================================
// MISSION 1: COMPLETION PROTOCOL
// ============================================================================

#[tokio::test]
async fn verify_three_particle_burst_completes_exactly() {
    let config = ExplosionConfig {
        particle_count: 3,
        duration_min: 0.01,
        duration_max: 0.01,
        distance_min: 100.0,
        distance_max: 100.0,
        acceleration_factor: 1.0,
        ..ExplosionConfig::default()
    };
    let (mut controller, surface) = rig(config);

    let completions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&completions);
    controller.set_hooks(ExplosionHooks {
        on_complete: Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::Release);
        })),
        ..ExplosionHooks::default()
    });

    controller.explode().await;

    assert!(!controller.is_active());
    assert_eq!(completions.load(Ordering::Acquire), 1);
    let surface = surface.lock();
    assert_eq!(surface.inserted_count(), 3, "exactly 3 elements created");
    assert_eq!(surface.removed_count(), 3, "exactly 3 elements removed");
    assert_eq!(surface.live_count(), 0, "container empty afterward");
}

#[tokio::test]
async fn verify_default_burst_under_acceleration() {
    // Default nine-particle burst, accelerated so the test stays fast.
    let config = ExplosionConfig {
        acceleration_factor: 50.0,
        ..ExplosionConfig::default()
    };
    let (controller, surface) = rig(config);

    controller.explode().await;

    let surface = surface.lock();
    assert_eq!(surface.inserted_count(), 9);
    assert_eq!(surface.removed_count(), 9);
    assert_eq!(surface.live_count(), 0);
}

// ============================================================================
// MISSION 2: FRAME CONTRACT
// ============================================================================

#[tokio::test]
async fn verify_update_hook_sees_final_frame_state() {
    let config = ExplosionConfig {
        particle_count: 2,
        duration_min: 0.05,
        duration_max: 0.05,
        acceleration_factor: 1.0,
        ..ExplosionConfig::default()
    };
    let expected = config.clone();
    let (mut controller, surface) = rig(config);

    // For every frame: (progress, opacity on surface, blur on surface).
    let frames: Arc<Mutex<Vec<(f32, f32, f32)>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&frames);
    let hook_surface = Arc::clone(&surface);
    controller.set_hooks(ExplosionHooks {
        on_particle_update: Some(Arc::new(move |id, progress, _index| {
            let surface = hook_surface.lock();
            if let Some(state) = surface.state(id) {
                recorder.lock().push((progress, state.opacity, state.blur_px));
            }
        })),
        ..ExplosionHooks::default()
    });

    controller.explode().await;

    let frames = frames.lock();
    assert!(!frames.is_empty(), "at least one frame per particle");
    for (progress, opacity, blur) in frames.iter() {
        // Opacity and blur writes land BEFORE the hook runs.
        assert!(
            (opacity - opacity_at(&expected, *progress)).abs() < 1e-5,
            "hook saw stale opacity at progress {progress}"
        );
        assert!(
            (blur - blur_at(&expected, *progress)).abs() < 1e-5,
            "hook saw stale blur at progress {progress}"
        );
    }
}

#[tokio::test]
async fn verify_progress_is_monotonic_per_particle() {
    let config = ExplosionConfig {
        particle_count: 3,
        duration_min: 0.05,
        duration_max: 0.08,
        acceleration_factor: 1.0,
        ..ExplosionConfig::default()
    };
    let (mut controller, _surface) = rig(config);

    let by_particle: Arc<Mutex<std::collections::HashMap<u32, Vec<f32>>>> =
        Arc::new(Mutex::new(std::collections::HashMap::new()));
    let recorder = Arc::clone(&by_particle);
    controller.set_hooks(ExplosionHooks {
        on_particle_update: Some(Arc::new(move |_id, progress, index| {
            recorder.lock().entry(index).or_default().push(progress);
        })),
        ..ExplosionHooks::default()
    });

    controller.explode().await;

    let by_particle = by_particle.lock();
    assert_eq!(by_particle.len(), 3);
    for (index, series) in by_particle.iter() {
        assert!(
            series.windows(2).all(|pair| pair[0] <= pair[1]),
            "particle {index} progress went backwards"
        );
        let last = series.last().copied().unwrap();
        assert!(
            (last - 1.0).abs() < f32::EPSILON,
            "particle {index} never reached progress 1"
        );
    }
}

// ============================================================================
// MISSION 3: CANCELLATION
// ============================================================================

#[tokio::test]
async fn verify_stop_clears_everything_and_settles_explode() {
    let config = ExplosionConfig {
        duration_min: 5.0,
        duration_max: 5.0,
        ..ExplosionConfig::default()
    };
    let (mut controller, surface) = rig(config);

    let completions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&completions);
    controller.set_hooks(ExplosionHooks {
        on_complete: Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::Release);
        })),
        ..ExplosionHooks::default()
    });

    let handle = ExplosionHandle::from(controller);
    let runner = handle.clone();
    let pending = tokio::spawn(async move { runner.explode().await });

    // Let a few frames land.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.is_active());
    assert_eq!(surface.lock().live_count(), 9, "all particles mid-flight");

    handle.stop();

    // Synchronous effects of stop().
    assert!(!handle.is_active());
    assert_eq!(surface.lock().live_count(), 0, "elements removed immediately");

    // The pending explode() settles instead of hanging.
    tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("stopped explode() must settle")
        .unwrap();

    // A stopped run never fires the completion hook.
    assert_eq!(completions.load(Ordering::Acquire), 0);

    // stop() with nothing active stays a no-op.
    handle.stop();
    assert!(!handle.is_active());
}

// ============================================================================
// MISSION 4: RE-ENTRANCY
// ============================================================================

#[tokio::test]
async fn verify_reentrant_bursts_complete_independently() {
    let config = ExplosionConfig {
        particle_count: 3,
        duration_min: 0.03,
        duration_max: 0.05,
        acceleration_factor: 1.0,
        ..ExplosionConfig::default()
    };
    let (mut controller, surface) = rig(config);

    let completions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&completions);
    controller.set_hooks(ExplosionHooks {
        on_complete: Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::Release);
        })),
        ..ExplosionHooks::default()
    });
    let handle = ExplosionHandle::from(controller);

    let runner = handle.clone();
    let first = tokio::spawn(async move { runner.explode().await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(handle.is_active(), "first burst in flight");

    // Second burst picks up a reconfigure the first one must not observe.
    handle
        .update_config(&ConfigUpdate {
            particle_count: Some(4),
            ..ConfigUpdate::default()
        })
        .unwrap();
    handle.explode().await;
    first.await.unwrap();

    assert!(!handle.is_active());
    assert_eq!(completions.load(Ordering::Acquire), 2, "one hook per burst");
    let surface = surface.lock();
    assert_eq!(surface.inserted_count(), 7, "3 + 4 independent particles");
    assert_eq!(surface.removed_count(), 7);
    assert_eq!(surface.live_count(), 0);
}
