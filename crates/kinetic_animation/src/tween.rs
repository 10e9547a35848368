//! Tween construction and evaluation
//!
//! A property's keyframes become a contiguous sequence of tweens. Each
//! tween's `start` is the previous tween's `end` plus its own delay, so the
//! sequence never overlaps.

use crate::color::is_color;
use crate::easing::{elasticity_factor, Easing, EasingFn};
use crate::params::{Keyframe, KeyframeValue, Param, TweenSettings};
use crate::value::{decompose, get_unit, push_number, resolve_operator, DecomposedValue, Value};
use kinetic_core::{PathProgress, Target};

/// One interpolation segment of a property
#[derive(Clone, Debug)]
pub struct Tween {
    pub from: DecomposedValue,
    pub to: DecomposedValue,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub delay: f64,
    pub easing: EasingFn,
    /// Normalized elastic period
    pub elasticity: f64,
    /// Rounding multiplier, 0 = off
    pub round: f64,
    /// Set when the value is a distance along a motion path
    pub path: Option<PathProgress>,
}

impl Tween {
    /// Whether `time` falls in `[start - delay, end]`
    pub fn contains(&self, time: f64) -> bool {
        self.start - self.delay <= time && time <= self.end
    }

    /// Linear progress through this tween at instance-local `time`
    pub fn progress(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return if time >= self.start { 1.0 } else { 0.0 };
        }
        (time - self.start).clamp(0.0, self.duration) / self.duration
    }

    /// Interpolated value of slot `slot` at eased progress `eased`
    fn slot_value(&self, slot: usize, eased: f64) -> f64 {
        let to = self.to.numbers.get(slot).copied().unwrap_or(0.0);
        let from = self.from.numbers.get(slot).copied().unwrap_or(to);
        let mut value = from + eased * (to - from);
        if let Some(path) = &self.path {
            value = path.sample(value);
        }
        if self.round != 0.0 {
            value = (value * self.round + 0.5).floor() / self.round;
        }
        value
    }

    /// Write the recomposed value at `time` into `out`
    pub fn write_value(&self, time: f64, out: &mut String) {
        let eased = self.easing.apply(self.progress(time), self.elasticity);
        out.clear();
        let mut fragments = self.to.strings.iter();
        if let Some(first) = fragments.next() {
            out.push_str(first);
        }
        for (slot, fragment) in fragments.enumerate() {
            push_number(out, self.slot_value(slot, eased));
            out.push_str(fragment);
        }
    }

    /// Recomposed value at `time`
    pub fn value_at(&self, time: f64) -> String {
        let mut out = String::new();
        self.write_value(time, &mut out);
        out
    }
}

/// A keyframe with every setting evaluated for one target
#[derive(Clone, Debug)]
pub struct TweenSpec {
    pub from: Option<Value>,
    pub to: Value,
    pub duration: f64,
    pub delay: f64,
    pub easing: Easing,
    pub elasticity: f64,
    pub round: f64,
}

/// Resolve a property's keyframes for the target at `index` of `total`
///
/// The default delay applies to the first keyframe only. More than two
/// keyframes split a literal default duration evenly between them.
pub fn resolve_keyframes(
    keyframes: &[Keyframe],
    settings: &TweenSettings,
    target: &Target,
    index: usize,
    total: usize,
) -> Vec<TweenSpec> {
    let count = keyframes.len();
    let default_duration = match settings.duration.literal() {
        Some(duration) if count > 2 => duration / count as f64,
        _ => settings.duration.resolve(target, index, total),
    };

    keyframes
        .iter()
        .enumerate()
        .map(|(i, keyframe)| {
            let eval = |param: &Param<Value>| param.resolve(target, index, total);
            let (from, to) = match &keyframe.value {
                KeyframeValue::To(to) => (None, eval(to)),
                KeyframeValue::FromTo(from, to) => (Some(eval(from)), eval(to)),
            };
            let delay = match &keyframe.delay {
                Some(delay) => delay.resolve(target, index, total),
                None if i == 0 => settings.delay.resolve(target, index, total),
                None => 0.0,
            };
            TweenSpec {
                from,
                to,
                duration: keyframe
                    .duration
                    .as_ref()
                    .map_or(default_duration, |d| d.resolve(target, index, total)),
                delay,
                easing: keyframe
                    .easing
                    .as_ref()
                    .unwrap_or(&settings.easing)
                    .resolve(target, index, total),
                elasticity: keyframe
                    .elasticity
                    .as_ref()
                    .unwrap_or(&settings.elasticity)
                    .resolve(target, index, total),
                round: keyframe
                    .round
                    .as_ref()
                    .unwrap_or(&settings.round)
                    .resolve(target, index, total),
            }
        })
        .collect()
}

/// Build the tween sequence of one property from its resolved keyframes
///
/// `original` is the property's current value on the target; it seeds the
/// first tween's origin and is the last resort for the unit.
pub fn build_tweens(specs: Vec<TweenSpec>, original: &str) -> Vec<Tween> {
    let mut tweens: Vec<Tween> = Vec::with_capacity(specs.len());

    for spec in specs {
        let previous = tweens.last();
        let from_text = match &spec.from {
            Some(from) => from.to_text(),
            None => previous.map_or_else(|| original.to_string(), |t| t.to.original.clone()),
        };
        let mut to_text = spec.to.to_text();

        let unit = get_unit(&to_text)
            .or_else(|| get_unit(&from_text))
            .or_else(|| get_unit(original))
            .map(str::to_string);

        if let Value::Text(text) = &spec.to {
            if let Some(resolved) = resolve_operator(&from_text, text) {
                to_text = resolved;
            }
        }

        let from = decompose(&from_text, unit.as_deref());
        let to = decompose(&to_text, unit.as_deref());

        let start = previous.map_or(spec.delay, |t| t.end + spec.delay);
        let easing = spec.easing.resolve().unwrap_or_else(|err| {
            tracing::warn!("{}; falling back to linear", err);
            EasingFn::linear()
        });
        let round = if is_color(&from.original) { 1.0 } else { spec.round };

        tweens.push(Tween {
            from,
            to,
            start,
            end: start + spec.duration,
            duration: spec.duration,
            delay: spec.delay,
            easing,
            elasticity: elasticity_factor(spec.elasticity),
            round,
            path: spec.to.as_path().cloned(),
        });
    }

    tweens
}

/// The tween active at `time`: the first whose window contains it, else the last
pub fn active_tween(tweens: &[Tween], time: f64) -> Option<&Tween> {
    tweens
        .iter()
        .find(|t| t.contains(time))
        .or_else(|| tweens.last())
}
