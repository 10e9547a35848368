//! Animation scheduler
//!
//! A single frame loop advances every playing instance once per frame and
//! goes idle as soon as nothing is playing. Frames come from a pluggable
//! [`FrameSource`]: the host's vsync, the built-in background thread, or
//! manual [`step`](SchedulerHandle::step) calls in tests.
//!
//! Instances never hold the scheduler lock while ticking, and the scheduler
//! never holds its lock while ticking an instance. Each frame ticks a
//! snapshot of the running set, so instances may play or pause others from
//! their callbacks.

use crate::anime::{Anime, AnimeShared};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::params::{AnimeParams, TweenSettings};
use crate::timeline::Timeline;
use kinetic_core::{SelectorResolver, Target, Targets};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::thread::{self, JoinHandle, Thread};
use std::time::{Duration, Instant};

// ============================================================================
// Global Animation Scheduler State
// ============================================================================

/// Global scheduler handle for access from anywhere in the application
static GLOBAL_SCHEDULER: OnceLock<SchedulerHandle> = OnceLock::new();

/// Set the global animation scheduler handle
///
/// Call once at startup after creating the [`AnimationScheduler`].
///
/// # Panics
///
/// Panics if called more than once.
pub fn set_global_scheduler(handle: SchedulerHandle) {
    if GLOBAL_SCHEDULER.set(handle).is_err() {
        panic!("set_global_scheduler() called more than once");
    }
}

/// Get the global animation scheduler handle
pub fn get_scheduler() -> Result<SchedulerHandle> {
    GLOBAL_SCHEDULER
        .get()
        .cloned()
        .ok_or(Error::SchedulerNotInitialized)
}

/// Try to get the global scheduler (returns None if not initialized)
pub fn try_get_scheduler() -> Option<SchedulerHandle> {
    GLOBAL_SCHEDULER.get().cloned()
}

/// Check if the global scheduler has been initialized
pub fn is_scheduler_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

new_key_type! {
    /// Handle to a registered instance
    pub struct InstanceId;
}

/// Delivers frame callbacks
///
/// `request_frame` asks for exactly one future call to
/// [`SchedulerHandle::step`]. The scheduler keeps at most one request in
/// flight.
pub trait FrameSource: Send + Sync {
    fn request_frame(&self);

    /// Withdraw the outstanding request, if the source supports it
    fn cancel_frame(&self) {}
}

/// Frame source for hosts and tests that call `step` themselves
#[derive(Debug, Default)]
pub struct ManualFrames {
    requests: AtomicUsize,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total frames requested so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

impl FrameSource for ManualFrames {
    fn request_frame(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

/// Wakes the background frame thread
#[derive(Default)]
struct FrameSignal {
    pending: AtomicBool,
    thread: OnceLock<Thread>,
}

struct ThreadFrames(Arc<FrameSignal>);

impl FrameSource for ThreadFrames {
    fn request_frame(&self) {
        self.0.pending.store(true, Ordering::Release);
        if let Some(thread) = self.0.thread.get() {
            thread.unpark();
        }
    }

    fn cancel_frame(&self) {
        self.0.pending.store(false, Ordering::Release);
    }
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    /// Every instance created through this scheduler
    instances: SlotMap<InstanceId, Weak<AnimeShared>>,
    /// Playing instances, in play order
    running: Vec<Anime>,
    frame_requested: bool,
    source: Arc<dyn FrameSource>,
    resolver: Option<Arc<dyn SelectorResolver>>,
    speed: f64,
    config: EngineConfig,
}

/// How long the idle frame thread parks before re-checking its stop flag
const IDLE_PARK: Duration = Duration::from_millis(100);

/// The animation scheduler that ticks all playing instances
///
/// Typically held by the application and shared via [`SchedulerHandle`].
///
/// # Background Thread Mode
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.start_background(); // frames at config.target_fps
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Timestamp origin for the background thread
    origin: Instant,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Background thread handle and its wake signal (if running)
    thread: Option<(JoinHandle<()>, Arc<FrameSignal>)>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                instances: SlotMap::with_key(),
                running: Vec::new(),
                frame_requested: false,
                source: Arc::new(ManualFrames::new()),
                resolver: None,
                speed: config.speed,
                config,
            })),
            origin: Instant::now(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Replace the frame source
    ///
    /// A pending frame is re-requested from the new source.
    pub fn set_frame_source(&self, source: Arc<dyn FrameSource>) {
        let mut inner = lock(&self.inner);
        if inner.frame_requested {
            inner.source.cancel_frame();
            source.request_frame();
        }
        inner.source = source;
    }

    /// Plug in selector resolution for string targets
    pub fn set_selector_resolver(&self, resolver: Arc<dyn SelectorResolver>) {
        lock(&self.inner).resolver = Some(resolver);
    }

    /// Run one frame at timestamp `now` (milliseconds)
    pub fn step(&self, now: f64) -> bool {
        step_frame(&self.inner, now)
    }

    /// Start the frame loop on a background thread
    ///
    /// The thread runs at `target_fps` while frames are requested and parks
    /// while the scheduler is idle.
    pub fn start_background(&mut self) {
        if self.thread.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let signal = Arc::new(FrameSignal::default());
        let thread_signal = Arc::clone(&signal);
        let origin = self.origin;
        let fps = u64::from(lock(&self.inner).config.target_fps.max(1));

        let handle = thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / fps);
            tracing::debug!("frame thread started at {} fps", fps);

            while !stop_flag.load(Ordering::Relaxed) {
                if !thread_signal.pending.swap(false, Ordering::AcqRel) {
                    thread::park_timeout(IDLE_PARK);
                    continue;
                }

                let start = Instant::now();
                let now = origin.elapsed().as_secs_f64() * 1000.0;
                step_frame(&inner, now);

                // Sleep for remaining frame time
                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
            tracing::debug!("frame thread stopped");
        });
        let _ = signal.thread.set(handle.thread().clone());

        let source = ThreadFrames(Arc::clone(&signal));
        {
            let mut inner = lock(&self.inner);
            inner.source.cancel_frame();
            if !inner.running.is_empty() {
                inner.frame_requested = true;
                source.request_frame();
            }
            inner.source = Arc::new(source);
        }
        self.thread = Some((handle, signal));
    }

    /// Stop the background thread and fall back to manual frames
    pub fn stop_background(&mut self) {
        let Some((handle, _signal)) = self.thread.take() else {
            return;
        };
        self.stop_flag.store(true, Ordering::Relaxed);
        handle.thread().unpark();
        let _ = handle.join();
        self.stop_flag.store(false, Ordering::Relaxed);

        let mut inner = lock(&self.inner);
        inner.source = Arc::new(ManualFrames::new());
        inner.frame_requested = false;
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread.is_some()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        // Stop background thread when scheduler is dropped
        self.stop_background();
    }
}

/// Tick a snapshot of the running set, then re-arm the frame loop
fn step_frame(inner: &Mutex<SchedulerInner>, now: f64) -> bool {
    let (running, speed) = {
        let mut inner = lock(inner);
        inner.frame_requested = false;
        (inner.running.clone(), inner.speed)
    };
    tracing::trace!("frame at {:.1}ms: {} running", now, running.len());

    for anime in &running {
        if !anime.is_paused() {
            anime.tick_with_speed(now, speed);
        }
    }

    let mut inner = lock(inner);
    if inner.running.is_empty() {
        tracing::debug!("no running instances, frame loop idle");
        return false;
    }
    if !inner.frame_requested {
        inner.frame_requested = true;
        inner.source.request_frame();
    }
    true
}

/// A handle to the animation scheduler
///
/// Holds a weak reference; it won't keep the scheduler alive. Every
/// operation on a handle whose scheduler is gone is a no-op.
#[derive(Clone, Default)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Whether the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Build an instance; it starts playing unless `autoplay(false)` was set
    pub fn animate(&self, params: AnimeParams) -> Anime {
        Anime::build(params, &self.tween_defaults(), self.clone(), None)
    }

    /// Build a timeline with linear easing as its default
    pub fn timeline(&self, params: AnimeParams) -> Timeline {
        Timeline::new(self.clone(), params)
    }

    /// Strip every animation bound to `targets` out of the running instances
    ///
    /// Instances left with no animations are paused.
    pub fn remove(&self, targets: impl Into<Targets>) {
        let targets = self.resolve_targets(&targets.into());
        if targets.is_empty() {
            return;
        }
        for anime in self.running().iter().rev() {
            if anime.remove_targets(&targets) {
                anime.pause();
            }
        }
    }

    /// Run one frame at timestamp `now` (milliseconds)
    ///
    /// Returns whether another frame was requested.
    pub fn step(&self, now: f64) -> bool {
        match self.inner.upgrade() {
            Some(inner) => step_frame(&inner, now),
            None => false,
        }
    }

    /// Whether a frame request is outstanding
    pub fn frame_pending(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| lock(&inner).frame_requested)
    }

    /// Global playback speed multiplier
    pub fn speed(&self) -> f64 {
        self.inner.upgrade().map_or(1.0, |inner| lock(&inner).speed)
    }

    pub fn set_speed(&self, speed: f64) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).speed = speed;
        }
    }

    /// Playing instances, in play order
    pub fn running(&self) -> Vec<Anime> {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).running.clone())
            .unwrap_or_default()
    }

    /// Every live instance created through this scheduler
    pub fn instances(&self) -> Vec<Anime> {
        let Some(inner) = self.inner.upgrade() else {
            return Vec::new();
        };
        let inner = lock(&inner);
        inner
            .instances
            .values()
            .filter_map(|weak| weak.upgrade().map(Anime))
            .collect()
    }

    /// Look an instance up by id
    pub fn get(&self, id: InstanceId) -> Option<Anime> {
        let inner = self.inner.upgrade()?;
        let inner = lock(&inner);
        inner.instances.get(id)?.upgrade().map(Anime)
    }

    pub fn config(&self) -> EngineConfig {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).config.clone())
            .unwrap_or_default()
    }

    /// Tween settings used where parameters leave them unset
    pub fn tween_defaults(&self) -> TweenSettings {
        self.config().tween_defaults()
    }

    pub(crate) fn resolve_targets(&self, targets: &Targets) -> Vec<Target> {
        let resolver = self
            .inner
            .upgrade()
            .and_then(|inner| lock(&inner).resolver.clone());
        targets.resolve(resolver.as_deref())
    }

    pub(crate) fn register(&self, instance: Weak<AnimeShared>) -> Option<InstanceId> {
        let inner = self.inner.upgrade()?;
        let mut inner = lock(&inner);
        inner.instances.retain(|_, weak| weak.strong_count() > 0);
        Some(inner.instances.insert(instance))
    }

    pub(crate) fn start_running(&self, anime: &Anime) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut inner = lock(&inner);
        if !inner.running.iter().any(|a| a.ptr_eq(anime)) {
            inner.running.push(anime.clone());
        }
        if !inner.frame_requested {
            inner.frame_requested = true;
            inner.source.request_frame();
        }
    }

    pub(crate) fn stop_running(&self, anime: &Anime) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        // Dropping a removed handle never re-enters the scheduler, so the
        // retain can run under the lock
        lock(&inner).running.retain(|a| !a.ptr_eq(anime));
    }
}
