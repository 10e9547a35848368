//! Playback instance state
//!
//! The lock-protected half of an [`Anime`](crate::Anime): animations,
//! clock baseline, loop and direction bookkeeping. Nothing here fires a
//! callback or touches the scheduler; methods report what happened and the
//! handle reacts after releasing the lock.

use crate::anime::Anime;
use crate::params::{LoopCount, PlayDirection};
use crate::tween::{active_tween, Tween};
use kinetic_core::{same_target, AnimationType, Target};

/// One (target, property) binding
#[derive(Clone, Debug)]
pub struct Animation {
    /// Position of the target in the instance's target list
    pub target_index: usize,
    pub property: String,
    pub kind: AnimationType,
    pub tweens: Vec<Tween>,
    /// Sum of every tween's delay and duration
    pub duration: f64,
    /// Delay of the first tween
    pub delay: f64,
    /// Last written value; the buffer is reused every frame
    pub current_value: String,
}

impl Animation {
    pub fn new(target_index: usize, property: String, kind: AnimationType, tweens: Vec<Tween>) -> Self {
        let duration = tweens.iter().map(|t| t.delay + t.duration).sum();
        let delay = tweens.first().map_or(0.0, |t| t.delay);
        Self {
            target_index,
            property,
            kind,
            tweens,
            duration,
            delay,
            current_value: String::new(),
        }
    }
}

/// A timeline child and its start offset
#[derive(Clone)]
pub(crate) struct Child {
    pub anime: Anime,
    pub offset: f64,
}

/// What a tick changed, for the handle to act on
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct TickOutcome {
    /// Instance-local time the animations were evaluated at
    pub local_time: f64,
    pub began: bool,
    pub completed: bool,
}

pub(crate) struct Instance {
    pub targets: Vec<Target>,
    pub animations: Vec<Animation>,
    pub children: Vec<Child>,
    pub duration: f64,
    pub delay: f64,
    pub current_time: f64,
    pub progress: f64,
    pub paused: bool,
    pub began: bool,
    pub completed: bool,
    pub reversed: bool,
    pub loop_count: LoopCount,
    pub remaining: LoopCount,
    pub direction: PlayDirection,
    /// Clock baseline; `None` until the first tick after `play`
    start_time: Option<f64>,
    /// Time already elapsed when playback resumed
    last_time: f64,
    /// Per-target composed transform, cleared every frame
    transforms: Vec<String>,
}

impl Instance {
    pub fn new(
        targets: Vec<Target>,
        animations: Vec<Animation>,
        empty_duration: f64,
        empty_delay: f64,
        loop_count: LoopCount,
        direction: PlayDirection,
    ) -> Self {
        let (duration, delay) = if animations.is_empty() {
            (empty_duration, empty_delay)
        } else {
            (
                animations.iter().map(|a| a.duration).fold(f64::MIN, f64::max),
                animations.iter().map(|a| a.delay).fold(f64::MAX, f64::min),
            )
        };
        let transforms = vec![String::new(); targets.len()];
        Self {
            targets,
            animations,
            children: Vec::new(),
            duration,
            delay,
            current_time: 0.0,
            progress: 0.0,
            paused: true,
            began: false,
            completed: false,
            reversed: false,
            loop_count,
            remaining: loop_count,
            direction,
            start_time: None,
            last_time: 0.0,
            transforms,
        }
    }

    /// Map playback time onto instance-local time
    fn adjust_time(&self, time: f64) -> f64 {
        if self.reversed {
            self.duration - time
        } else {
            time
        }
    }

    fn toggle_direction(&mut self) {
        self.reversed = !self.reversed;
    }

    /// Evaluate every animation at playback `time` and write the results
    ///
    /// Returns the instance-local time.
    pub fn set_progress(&mut self, time: f64) -> f64 {
        let local = self.adjust_time(time);
        self.current_time = local;
        self.progress = if self.duration > 0.0 {
            local / self.duration * 100.0
        } else {
            100.0
        };

        for composed in &mut self.transforms {
            composed.clear();
        }

        for animation in &mut self.animations {
            let Some(tween) = active_tween(&animation.tweens, local) else {
                continue;
            };
            tween.write_value(local, &mut animation.current_value);
            let target = &self.targets[animation.target_index];
            match animation.kind {
                AnimationType::Transform => {
                    let composed = &mut self.transforms[animation.target_index];
                    if !composed.is_empty() {
                        composed.push(' ');
                    }
                    composed.push_str(&animation.property);
                    composed.push('(');
                    composed.push_str(&animation.current_value);
                    composed.push(')');
                }
                kind => target.write(&animation.property, kind, &animation.current_value),
            }
        }

        for (target, composed) in self.targets.iter().zip(&self.transforms) {
            if !composed.is_empty() {
                target.write_transform(composed);
            }
        }

        local
    }

    /// Advance to frame timestamp `now`
    pub fn tick(&mut self, now: f64, speed: f64) -> TickOutcome {
        let start = *self.start_time.get_or_insert(now);
        let elapsed = (self.last_time + now - start) * speed;
        let time = elapsed.clamp(0.0, self.duration.max(0.0));

        let mut outcome = TickOutcome {
            local_time: self.set_progress(time),
            ..TickOutcome::default()
        };

        if !self.began && time >= self.delay {
            self.began = true;
            outcome.began = true;
        }

        if time >= self.duration {
            self.remaining.decrement();
            if self.remaining.has_remaining() {
                self.start_time = Some(now);
                if self.direction == PlayDirection::Alternate {
                    self.toggle_direction();
                }
            } else {
                self.completed = true;
                self.began = false;
                self.paused = true;
                outcome.completed = true;
            }
            self.last_time = 0.0;
        }

        outcome
    }

    /// Evaluate at playback `time` without touching the play state
    pub fn seek(&mut self, time: f64) -> f64 {
        let time = time.clamp(0.0, self.duration.max(0.0));
        let time = self.adjust_time(time);
        self.set_progress(time)
    }

    /// Enter the playing state; `false` if already playing
    pub fn play(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.start_time = None;
        self.last_time = if self.completed {
            0.0
        } else {
            self.adjust_time(self.current_time)
        };
        match self.direction {
            PlayDirection::Reverse if !self.reversed => self.toggle_direction(),
            // A played-out alternate run replays from its forward phase
            PlayDirection::Alternate if self.remaining.is_exhausted() => {
                if self.reversed {
                    self.toggle_direction();
                }
                self.remaining = LoopCount::Count(2);
            }
            _ => {}
        }
        true
    }

    /// Leave the playing state; `false` if already paused
    pub fn pause(&mut self) -> bool {
        let was_playing = !self.paused;
        self.paused = true;
        was_playing
    }

    /// Reset loop, direction and completion state ahead of a restart
    pub fn reset(&mut self) {
        if self.reversed {
            self.toggle_direction();
        }
        self.completed = false;
        self.began = false;
        self.remaining = self.loop_count;
    }

    /// Flip direction in place, continuing from the current point
    pub fn reverse(&mut self) {
        self.toggle_direction();
        self.start_time = None;
        self.last_time = self.adjust_time(self.current_time);
    }

    /// Drop every animation bound to one of `targets`
    ///
    /// Returns `true` if animations were removed and none are left.
    pub fn remove_targets(&mut self, targets: &[Target]) -> bool {
        let before = self.animations.len();
        let bound = &self.targets;
        self.animations.retain(|animation| {
            let target = &bound[animation.target_index];
            !targets.iter().any(|t| same_target(t, target))
        });
        self.animations.len() < before && self.animations.is_empty()
    }
}
