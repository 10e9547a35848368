//! Timelines
//!
//! A timeline is an instance with no animations of its own. Children are
//! placed at offsets on its clock and seeked to `timeline time - offset`
//! whenever the timeline evaluates. Adding a child extends the timeline
//! to cover it.

use crate::anime::Anime;
use crate::error::{Error, Result};
use crate::params::{AnimeParams, TweenSettings};
use crate::scheduler::SchedulerHandle;
use std::ops::Deref;
use std::str::FromStr;

/// Where a child starts on the timeline
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimelineOffset {
    /// At the current end of the timeline
    #[default]
    After,
    /// At an absolute time in milliseconds
    At(f64),
    /// Relative to the current end; negative values overlap
    Relative(f64),
}

impl TimelineOffset {
    /// Absolute start for a timeline currently `duration` long
    pub fn resolve(self, duration: f64) -> f64 {
        match self {
            TimelineOffset::After => duration,
            TimelineOffset::At(time) => time,
            TimelineOffset::Relative(delta) => (duration + delta).max(0.0),
        }
    }
}

impl FromStr for TimelineOffset {
    type Err = Error;

    /// Parse `"+=n"`, `"-=n"`, a bare number, or an empty string
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(TimelineOffset::After);
        }
        let parse = |n: &str| {
            n.trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidOffset(s.to_string()))
        };
        if let Some(rest) = s.strip_prefix("+=") {
            Ok(TimelineOffset::Relative(parse(rest)?))
        } else if let Some(rest) = s.strip_prefix("-=") {
            Ok(TimelineOffset::Relative(-parse(rest)?))
        } else {
            Ok(TimelineOffset::At(parse(s)?))
        }
    }
}

impl From<f64> for TimelineOffset {
    fn from(time: f64) -> Self {
        TimelineOffset::At(time)
    }
}

/// A sequencing container for child instances
///
/// Derefs to the underlying [`Anime`] for playback control.
#[derive(Clone)]
pub struct Timeline {
    anime: Anime,
    defaults: TweenSettings,
}

impl Timeline {
    pub(crate) fn new(scheduler: SchedulerHandle, params: AnimeParams) -> Self {
        let defaults = params.tween_settings(&TweenSettings::timeline());
        let anime = Anime::build(params, &defaults, scheduler, Some(0.0));
        Self { anime, defaults }
    }

    /// The timeline's own instance
    pub fn anime(&self) -> &Anime {
        &self.anime
    }

    /// Tween settings children inherit from this timeline
    pub fn defaults(&self) -> &TweenSettings {
        &self.defaults
    }

    /// Place an existing instance on the timeline
    ///
    /// The child is paused; from now on the timeline drives it.
    pub fn add(&self, child: &Anime, offset: impl Into<TimelineOffset>) -> &Self {
        if child.ptr_eq(&self.anime) {
            tracing::warn!("a timeline cannot contain itself, ignoring");
            return self;
        }
        child.pause();
        let start = offset.into().resolve(self.anime.duration());
        tracing::debug!("timeline child at {}ms", start);
        self.anime.push_child(child.clone(), start);
        self
    }

    /// Build a child from `params` with this timeline's defaults and add it
    ///
    /// The child reads its starting values from the targets as they are at
    /// its offset, so consecutive children pick up where earlier ones end.
    /// Existing children are moved to that offset and back while the child
    /// is built, which rewrites their targets. The timeline's own `update`
    /// callback does not run.
    pub fn add_params(&self, params: AnimeParams, offset: impl Into<TimelineOffset>) -> Anime {
        let current = self.anime.current_time();
        let start = offset.into().resolve(self.anime.duration());
        self.anime.position(start);

        let scheduler = self.anime.scheduler().clone();
        let child = Anime::build(params.autoplay(false), &self.defaults, scheduler, None);
        self.add(&child, TimelineOffset::At(start));
        self.anime.position(current);
        child
    }

    /// Like [`add_params`](Self::add_params) with a string offset such as `"-=200"`
    pub fn add_at(&self, params: AnimeParams, offset: &str) -> Result<Anime> {
        let offset = offset.parse::<TimelineOffset>()?;
        Ok(self.add_params(params, offset))
    }

    /// Child instances in insertion order
    pub fn children(&self) -> Vec<Anime> {
        self.anime
            .state()
            .children
            .iter()
            .map(|child| child.anime.clone())
            .collect()
    }
}

impl Deref for Timeline {
    type Target = Anime;

    fn deref(&self) -> &Anime {
        &self.anime
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("duration", &self.anime.duration())
            .field("children", &self.anime.state().children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::AnimationScheduler;
    use kinetic_core::ObjectTarget;
    use std::sync::Arc;

    fn move_x(obj: &Arc<ObjectTarget>, to: f64, duration: f64) -> AnimeParams {
        AnimeParams::new()
            .targets(obj.clone())
            .property("x", to)
            .duration(duration)
    }

    #[test]
    fn test_parse_offsets() {
        assert_eq!("".parse::<TimelineOffset>().unwrap(), TimelineOffset::After);
        assert_eq!(
            "+=100".parse::<TimelineOffset>().unwrap(),
            TimelineOffset::Relative(100.0)
        );
        assert_eq!(
            "-=250".parse::<TimelineOffset>().unwrap(),
            TimelineOffset::Relative(-250.0)
        );
        assert_eq!("300".parse::<TimelineOffset>().unwrap(), TimelineOffset::At(300.0));
        assert!(matches!(
            "soon".parse::<TimelineOffset>(),
            Err(Error::InvalidOffset(_))
        ));
    }

    #[test]
    fn test_relative_offset_clamps_at_zero() {
        assert_eq!(TimelineOffset::Relative(-500.0).resolve(200.0), 0.0);
        assert_eq!(TimelineOffset::After.resolve(200.0), 200.0);
    }

    #[test]
    fn test_children_extend_duration() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let obj = Arc::new(ObjectTarget::new().with_field("x", 0));

        let tl = handle.timeline(AnimeParams::new().autoplay(false));
        assert_eq!(tl.duration(), 0.0);

        tl.add_params(move_x(&obj, 10.0, 500.0), TimelineOffset::After);
        assert_eq!(tl.duration(), 500.0);
        tl.add_at(move_x(&obj, 20.0, 300.0), "+=100").unwrap();
        assert_eq!(tl.duration(), 900.0);
        tl.add_at(move_x(&obj, 30.0, 200.0), "-=400").unwrap();
        assert_eq!(tl.duration(), 900.0);

        let children = tl.children();
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| c.is_paused()));
    }

    #[test]
    fn test_timeline_seeks_children() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let obj = Arc::new(ObjectTarget::new().with_field("x", 0));

        let tl = handle.timeline(AnimeParams::new().autoplay(false));
        tl.add_params(move_x(&obj, 100.0, 1000.0), 0.0);
        tl.add_params(move_x(&obj, 200.0, 1000.0), TimelineOffset::After);

        // Children inherit linear easing
        tl.seek(500.0);
        assert_eq!(obj.number("x"), Some(50.0));
        tl.seek(1500.0);
        assert_eq!(obj.number("x"), Some(150.0));
        tl.seek(2000.0);
        assert_eq!(obj.number("x"), Some(200.0));
    }

    #[test]
    fn test_adding_children_skips_update_callback() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let obj = Arc::new(ObjectTarget::new().with_field("x", 0));
        let updates = Arc::new(AtomicUsize::new(0));
        let counter = updates.clone();

        let tl = handle.timeline(AnimeParams::new().autoplay(false).on_update(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        tl.add_params(move_x(&obj, 100.0, 1000.0), 0.0);
        tl.add_params(move_x(&obj, 200.0, 1000.0), TimelineOffset::After);
        assert_eq!(updates.load(Ordering::SeqCst), 0);

        // Targets are back at the timeline's current time
        assert_eq!(tl.current_time(), 0.0);
        assert_eq!(obj.number("x"), Some(0.0));

        tl.seek(1500.0);
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(obj.number("x"), Some(150.0));
    }

    #[test]
    fn test_timeline_plays_through_scheduler() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let obj = Arc::new(ObjectTarget::new().with_field("x", 0));

        let tl = handle.timeline(AnimeParams::new().autoplay(false));
        tl.add_params(move_x(&obj, 100.0, 400.0), TimelineOffset::After);
        tl.play();

        handle.step(0.0);
        handle.step(200.0);
        assert_eq!(obj.number("x"), Some(50.0));
        handle.step(400.0);
        assert!(tl.is_completed());
        assert_eq!(obj.number("x"), Some(100.0));
        assert!(handle.running().is_empty());
    }

    #[test]
    fn test_cannot_add_itself() {
        let scheduler = AnimationScheduler::new();
        let tl = scheduler.handle().timeline(AnimeParams::new());
        tl.add(tl.anime(), TimelineOffset::After);
        assert!(tl.children().is_empty());
    }
}
