//! Kinetic Animation Engine
//!
//! Property tweening with easing curves, keyframes, looping playback and
//! timeline choreography.
//!
//! # Features
//!
//! - **Value model**: numbers, units, colors and multi-number strings all
//!   interpolate through one decompose/recompose scheme
//! - **Easings**: 28 named presets, elastic curves and a cubic-Bézier solver
//! - **Playback**: play, pause, seek, restart, reverse, loops and alternation
//! - **Timelines**: children placed at absolute or relative offsets
//! - **Scheduler**: one frame loop for every instance, idle when nothing plays
//!
//! # Example
//!
//! ```rust
//! use kinetic_animation::{AnimationScheduler, AnimeParams, Easing, ObjectTarget};
//! use std::sync::Arc;
//!
//! let scheduler = AnimationScheduler::new();
//! let handle = scheduler.handle();
//!
//! let obj = Arc::new(ObjectTarget::new().with_field("x", 0));
//! let anime = handle.animate(
//!     AnimeParams::new()
//!         .targets(obj.clone())
//!         .property("x", 100)
//!         .duration(1000.0)
//!         .easing(Easing::Linear),
//! );
//!
//! handle.step(0.0);
//! handle.step(500.0);
//! assert_eq!(obj.number("x"), Some(50.0));
//! assert!(!anime.is_completed());
//! ```

pub mod anime;
pub mod color;
pub mod config;
pub mod easing;
pub mod error;
pub mod instance;
pub mod params;
pub mod scheduler;
pub mod timeline;
pub mod tween;
pub mod value;

pub use anime::Anime;
pub use config::EngineConfig;
pub use easing::{bezier, CubicBezier, Easing, EasingFn};
pub use error::{Error, Result};
pub use instance::Animation;
pub use params::{
    AnimeParams, Callback, Keyframe, KeyframeValue, LoopCount, Param, PlayDirection,
    PropertyValue, TweenSettings,
};
pub use scheduler::{
    get_scheduler, is_scheduler_initialized, set_global_scheduler, try_get_scheduler,
    AnimationScheduler, FrameSource, InstanceId, ManualFrames, SchedulerHandle,
};
pub use timeline::{Timeline, TimelineOffset};
pub use value::Value;

pub use kinetic_core::{
    path, set_dashoffset, Animatable, AnimationType, ElementTarget, MotionPath, ObjectTarget,
    PathProgress, PathProperty, PathSampler, Point, Polyline, SelectorResolver, Target, Targets,
};

use rand::Rng;

/// Build an instance on the global scheduler
///
/// It starts playing unless the parameters disable autoplay.
pub fn animate(params: AnimeParams) -> Result<Anime> {
    Ok(get_scheduler()?.animate(params))
}

/// Build a timeline on the global scheduler
pub fn timeline(params: AnimeParams) -> Result<Timeline> {
    Ok(get_scheduler()?.timeline(params))
}

/// Strip `targets` out of every running instance on the global scheduler
pub fn remove(targets: impl Into<Targets>) {
    if let Some(handle) = try_get_scheduler() {
        handle.remove(targets);
    }
}

/// Global playback speed multiplier
pub fn speed() -> f64 {
    try_get_scheduler().map_or(1.0, |handle| handle.speed())
}

pub fn set_speed(speed: f64) {
    if let Some(handle) = try_get_scheduler() {
        handle.set_speed(speed);
    }
}

/// Uniform random integer in `[min, max]`
pub fn random(min: i64, max: i64) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rand::thread_rng().gen_range(lo..=hi)
}

/// Current value of `property` on `target`, `None` if it cannot be animated
pub fn get_value(target: &dyn Animatable, property: &str) -> Option<String> {
    let kind = target.animation_type(property)?;
    target.read(property, kind)
}
