//! Animation instances
//!
//! [`Anime`] is the shared handle returned by `animate`. It is cheap to
//! clone; every clone drives the same instance. Callbacks always run after
//! the instance lock is released, so they may freely call back into any
//! handle, this one included.

use crate::instance::{Animation, Child, Instance};
use crate::params::{AnimeParams, Callbacks, LoopCount, Param, PlayDirection, TweenSettings};
use crate::scheduler::{lock, InstanceId, SchedulerHandle};
use crate::tween::{build_tweens, resolve_keyframes};
use kinetic_core::Target;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

pub(crate) struct AnimeShared {
    id: OnceLock<InstanceId>,
    state: Mutex<Instance>,
    callbacks: Callbacks,
    scheduler: SchedulerHandle,
}

/// Handle to a playback instance
#[derive(Clone)]
pub struct Anime(pub(crate) Arc<AnimeShared>);

impl Anime {
    /// Build an instance from `params`, registering it with `scheduler`
    ///
    /// `empty_duration` overrides the duration of an instance without
    /// animations (timelines start empty at 0).
    pub(crate) fn build(
        params: AnimeParams,
        defaults: &TweenSettings,
        scheduler: SchedulerHandle,
        empty_duration: Option<f64>,
    ) -> Anime {
        let targets = scheduler.resolve_targets(&params.targets);
        let settings = params.tween_settings(defaults);
        let total = targets.len();

        let properties: Vec<_> = params
            .properties
            .into_iter()
            .map(|(name, value)| (name, value.into_keyframes()))
            .collect();

        let mut animations = Vec::new();
        for (index, target) in targets.iter().enumerate() {
            for (name, keyframes) in &properties {
                if keyframes.is_empty() {
                    continue;
                }
                let Some(kind) = target.animation_type(name) else {
                    tracing::debug!("target {} cannot animate `{}`, skipping", index, name);
                    continue;
                };
                let original = target.read(name, kind).unwrap_or_else(|| "0".to_string());
                let specs = resolve_keyframes(keyframes, &settings, target, index, total);
                let tweens = build_tweens(specs, &original);
                animations.push(Animation::new(index, name.clone(), kind, tweens));
            }
        }

        let fallback = TweenSettings::default();
        let literal = |param: &Param<f64>, default: &Param<f64>| {
            param
                .literal()
                .or_else(|| default.literal())
                .copied()
                .unwrap_or(0.0)
        };
        let empty_duration =
            empty_duration.unwrap_or_else(|| literal(&settings.duration, &fallback.duration));
        let empty_delay = literal(&settings.delay, &fallback.delay);

        let instance = Instance::new(
            targets,
            animations,
            empty_duration,
            empty_delay,
            params.loop_count,
            params.direction,
        );
        tracing::debug!(
            "built instance: {} animations, duration {}ms",
            instance.animations.len(),
            instance.duration
        );

        let callbacks = params.callbacks;
        let shared = Arc::new(AnimeShared {
            id: OnceLock::new(),
            state: Mutex::new(instance),
            callbacks,
            scheduler,
        });
        if let Some(id) = shared.scheduler.register(Arc::downgrade(&shared)) {
            let _ = shared.id.set(id);
        }

        let anime = Anime(shared);
        if params.autoplay.unwrap_or(true) {
            anime.restart();
        }
        anime
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, Instance> {
        lock(&self.0.state)
    }

    pub(crate) fn scheduler(&self) -> &SchedulerHandle {
        &self.0.scheduler
    }

    /// Registry key in the owning scheduler
    pub fn id(&self) -> Option<InstanceId> {
        self.0.id.get().copied()
    }

    /// Whether both handles drive the same instance
    pub fn ptr_eq(&self, other: &Anime) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Start or resume playback; no-op while already playing
    pub fn play(&self) {
        if !self.state().play() {
            return;
        }
        self.0.scheduler.start_running(self);
    }

    /// Stop advancing on frames; idempotent
    pub fn pause(&self) {
        self.state().pause();
        self.0.scheduler.stop_running(self);
    }

    /// Rewind to the start and play from the first iteration
    pub fn restart(&self) {
        self.pause();
        self.state().reset();
        self.seek(0.0);
        self.play();
    }

    /// Jump to `time` (clamped to `[0, duration]`) without changing the play state
    pub fn seek(&self, time: f64) {
        let local = self.state().seek(time);
        self.after_progress(local);
    }

    /// Flip the playback direction, continuing from the current point
    pub fn reverse(&self) {
        self.state().reverse();
    }

    /// Advance to frame timestamp `now` (milliseconds)
    pub fn tick(&self, now: f64) {
        self.tick_with_speed(now, self.0.scheduler.speed());
    }

    pub(crate) fn tick_with_speed(&self, now: f64, speed: f64) {
        let outcome = self.state().tick(now, speed);
        self.after_progress(outcome.local_time);

        if outcome.began {
            if let Some(begin) = &self.0.callbacks.begin {
                begin(self);
            }
        }
        if outcome.completed {
            self.0.scheduler.stop_running(self);
            if let Some(complete) = &self.0.callbacks.complete {
                complete(self);
            }
        }
    }

    /// Update callback, then timeline children
    fn after_progress(&self, local_time: f64) {
        if let Some(update) = &self.0.callbacks.update {
            update(self);
        }
        self.seek_children(local_time);
    }

    /// Move to `time` and write values without running the update callback
    pub(crate) fn position(&self, time: f64) {
        let local = self.state().seek(time);
        self.seek_children(local);
    }

    fn seek_children(&self, local_time: f64) {
        let children = self.state().children.clone();
        // Children that have not started yet are seeked first so they never
        // overwrite values written by an earlier, active child
        let (pending, rest): (Vec<_>, Vec<_>) = children
            .into_iter()
            .partition(|child| local_time < child.offset);
        for child in pending.into_iter().chain(rest) {
            child.anime.seek(local_time - child.offset);
        }
    }

    /// Drop animations bound to `targets`; `true` if none are left
    pub(crate) fn remove_targets(&self, targets: &[Target]) -> bool {
        self.state().remove_targets(targets)
    }

    pub(crate) fn push_child(&self, anime: Anime, offset: f64) {
        let end = offset + anime.duration();
        let mut state = self.state();
        if end > state.duration {
            state.duration = end;
        }
        state.children.push(Child { anime, offset });
    }

    /// Instance-local time of the last evaluation
    pub fn current_time(&self) -> f64 {
        self.state().current_time
    }

    /// Position in percent of the duration
    pub fn progress(&self) -> f64 {
        self.state().progress
    }

    pub fn duration(&self) -> f64 {
        self.state().duration
    }

    pub fn delay(&self) -> f64 {
        self.state().delay
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    pub fn is_completed(&self) -> bool {
        self.state().completed
    }

    pub fn has_begun(&self) -> bool {
        self.state().began
    }

    pub fn is_reversed(&self) -> bool {
        self.state().reversed
    }

    pub fn direction(&self) -> PlayDirection {
        self.state().direction
    }

    /// Iterations still to play
    pub fn remaining(&self) -> LoopCount {
        self.state().remaining
    }

    pub fn animation_count(&self) -> usize {
        self.state().animations.len()
    }

    /// Snapshot of the animations
    pub fn animations(&self) -> Vec<Animation> {
        self.state().animations.clone()
    }

    /// Resolved targets, in first-seen order
    pub fn targets(&self) -> Vec<Target> {
        self.state().targets.clone()
    }

    /// Last written value of the first animation of `property`
    pub fn current_value(&self, property: &str) -> Option<String> {
        self.state()
            .animations
            .iter()
            .find(|a| a.property == property)
            .map(|a| a.current_value.clone())
    }
}

impl fmt::Debug for Anime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Anime")
            .field("id", &self.id())
            .field("animations", &state.animations.len())
            .field("duration", &state.duration)
            .field("current_time", &state.current_time)
            .field("paused", &state.paused)
            .field("completed", &state.completed)
            .finish()
    }
}
