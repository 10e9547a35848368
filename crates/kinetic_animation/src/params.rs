//! Animation parameters
//!
//! `AnimeParams` is the configuration an instance is built from: what to
//! animate, the per-property value specs, tween settings and instance
//! options. Any tween setting or value may be a [`Param::Computed`]
//! function of `(target, index, total)`, evaluated once per target at build
//! time (staggering).

use crate::anime::Anime;
use crate::easing::Easing;
use crate::value::Value;
use indexmap::IndexMap;
use kinetic_core::{Target, Targets};
use std::fmt;
use std::sync::Arc;

/// A setting that is either fixed or computed per target
pub enum Param<T> {
    Literal(T),
    Computed(Arc<dyn Fn(&Target, usize, usize) -> T + Send + Sync>),
}

impl<T: Clone> Param<T> {
    /// Per-target function of `(target, index, total)`
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Target, usize, usize) -> T + Send + Sync + 'static,
    {
        Param::Computed(Arc::new(f))
    }

    /// Evaluate for the target at `index` of `total`
    pub fn resolve(&self, target: &Target, index: usize, total: usize) -> T {
        match self {
            Param::Literal(v) => v.clone(),
            Param::Computed(f) => f(target, index, total),
        }
    }

    pub fn literal(&self) -> Option<&T> {
        match self {
            Param::Literal(v) => Some(v),
            Param::Computed(_) => None,
        }
    }
}

impl<T: Clone> Clone for Param<T> {
    fn clone(&self) -> Self {
        match self {
            Param::Literal(v) => Param::Literal(v.clone()),
            Param::Computed(f) => Param::Computed(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Param::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T> From<T> for Param<T> {
    fn from(v: T) -> Self {
        Param::Literal(v)
    }
}

impl From<i32> for Param<f64> {
    fn from(v: i32) -> Self {
        Param::Literal(f64::from(v))
    }
}

macro_rules! value_param_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Param<Value> {
            fn from(v: $ty) -> Self {
                Param::Literal(Value::from(v))
            }
        })*
    };
}

value_param_from!(f64, i32, &str, String, kinetic_core::PathProgress);

/// Destination of one keyframe
#[derive(Clone, Debug)]
pub enum KeyframeValue {
    /// Animate from the previous value
    To(Param<Value>),
    /// Explicit bounds
    FromTo(Param<Value>, Param<Value>),
}

/// One segment of a property's sequence, with optional setting overrides
#[derive(Clone, Debug)]
pub struct Keyframe {
    pub value: KeyframeValue,
    pub duration: Option<Param<f64>>,
    pub delay: Option<Param<f64>>,
    pub easing: Option<Param<Easing>>,
    pub elasticity: Option<Param<f64>>,
    pub round: Option<Param<f64>>,
}

impl Keyframe {
    pub fn to(value: impl Into<Param<Value>>) -> Self {
        Self::with_value(KeyframeValue::To(value.into()))
    }

    pub fn from_to(from: impl Into<Param<Value>>, to: impl Into<Param<Value>>) -> Self {
        Self::with_value(KeyframeValue::FromTo(from.into(), to.into()))
    }

    fn with_value(value: KeyframeValue) -> Self {
        Self {
            value,
            duration: None,
            delay: None,
            easing: None,
            elasticity: None,
            round: None,
        }
    }

    pub fn duration(mut self, ms: impl Into<Param<f64>>) -> Self {
        self.duration = Some(ms.into());
        self
    }

    pub fn delay(mut self, ms: impl Into<Param<f64>>) -> Self {
        self.delay = Some(ms.into());
        self
    }

    pub fn easing(mut self, easing: impl Into<Param<Easing>>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    pub fn elasticity(mut self, elasticity: impl Into<Param<f64>>) -> Self {
        self.elasticity = Some(elasticity.into());
        self
    }

    pub fn round(mut self, round: impl Into<Param<f64>>) -> Self {
        self.round = Some(round.into());
        self
    }
}

/// How a property's values are given
#[derive(Clone, Debug)]
pub enum PropertyValue {
    /// A bare destination
    To(Param<Value>),
    /// `[from, to]`
    FromTo(Param<Value>, Param<Value>),
    /// A plain list of values; more than two become equal-time keyframes
    Sequence(Vec<Param<Value>>),
    /// Keyframes with their own settings
    Keyframes(Vec<Keyframe>),
}

impl PropertyValue {
    pub fn to(value: impl Into<Param<Value>>) -> Self {
        PropertyValue::To(value.into())
    }

    pub fn from_to(from: impl Into<Param<Value>>, to: impl Into<Param<Value>>) -> Self {
        PropertyValue::FromTo(from.into(), to.into())
    }

    pub fn sequence<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Param<Value>>,
    {
        PropertyValue::Sequence(values.into_iter().map(Into::into).collect())
    }

    pub fn keyframes(keyframes: impl IntoIterator<Item = Keyframe>) -> Self {
        PropertyValue::Keyframes(keyframes.into_iter().collect())
    }

    /// A destination computed per target
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Target, usize, usize) -> Value + Send + Sync + 'static,
    {
        PropertyValue::To(Param::computed(f))
    }

    /// Flatten into keyframes; the count drives equal-time splitting
    pub(crate) fn into_keyframes(self) -> Vec<Keyframe> {
        match self {
            PropertyValue::To(v) => vec![Keyframe::to(v)],
            PropertyValue::FromTo(a, b) => vec![Keyframe::from_to(a, b)],
            PropertyValue::Sequence(mut values) => match values.len() {
                2 => {
                    let to = values.pop();
                    let from = values.pop();
                    match (from, to) {
                        (Some(a), Some(b)) => vec![Keyframe::from_to(a, b)],
                        _ => Vec::new(),
                    }
                }
                _ => values.into_iter().map(Keyframe::to).collect(),
            },
            PropertyValue::Keyframes(keyframes) => keyframes,
        }
    }
}

macro_rules! property_value_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for PropertyValue {
            fn from(v: $ty) -> Self {
                PropertyValue::To(Param::from(v))
            }
        })*
    };
}

property_value_from!(f64, i32, &str, String, kinetic_core::PathProgress);

impl From<Value> for PropertyValue {
    fn from(v: Value) -> Self {
        PropertyValue::To(Param::Literal(v))
    }
}

impl<A: Into<Param<Value>>, B: Into<Param<Value>>> From<(A, B)> for PropertyValue {
    fn from((from, to): (A, B)) -> Self {
        PropertyValue::FromTo(from.into(), to.into())
    }
}

impl From<Vec<Keyframe>> for PropertyValue {
    fn from(keyframes: Vec<Keyframe>) -> Self {
        PropertyValue::Keyframes(keyframes)
    }
}

/// Loop count of an instance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopCount {
    /// Play this many times (0 and 1 both mean once)
    #[default]
    Once,
    Count(u32),
    Infinite,
}

impl LoopCount {
    /// Whether at least one more iteration is pending
    pub fn has_remaining(&self) -> bool {
        match self {
            LoopCount::Once => false,
            LoopCount::Count(n) => *n > 0,
            LoopCount::Infinite => true,
        }
    }

    /// Consume one iteration (never consumes an infinite count)
    pub fn decrement(&mut self) {
        match self {
            LoopCount::Once => *self = LoopCount::Count(0),
            LoopCount::Count(n) => *n = n.saturating_sub(1),
            LoopCount::Infinite => {}
        }
    }

    /// Every iteration has been played out
    pub(crate) fn is_exhausted(&self) -> bool {
        *self == LoopCount::Count(0)
    }
}

impl From<u32> for LoopCount {
    fn from(n: u32) -> Self {
        if n == 0 {
            LoopCount::Once
        } else {
            LoopCount::Count(n)
        }
    }
}

/// Playback direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayDirection {
    /// 0 -> duration
    #[default]
    Normal,
    /// duration -> 0
    Reverse,
    /// Flip at the end of every iteration
    Alternate,
}

/// Instance lifecycle callback
pub type Callback = Arc<dyn Fn(&Anime) + Send + Sync>;

#[derive(Clone, Default)]
pub(crate) struct Callbacks {
    pub begin: Option<Callback>,
    pub update: Option<Callback>,
    pub complete: Option<Callback>,
}

/// Tween settings after defaults are applied
#[derive(Clone, Debug)]
pub struct TweenSettings {
    pub duration: Param<f64>,
    pub delay: Param<f64>,
    pub easing: Param<Easing>,
    pub elasticity: Param<f64>,
    pub round: Param<f64>,
}

impl Default for TweenSettings {
    fn default() -> Self {
        Self {
            duration: Param::Literal(1000.0),
            delay: Param::Literal(0.0),
            easing: Param::Literal(Easing::EaseOutElastic),
            elasticity: Param::Literal(500.0),
            round: Param::Literal(0.0),
        }
    }
}

impl TweenSettings {
    /// Settings used by timelines: linear easing
    pub fn timeline() -> Self {
        Self {
            easing: Param::Literal(Easing::Linear),
            ..Self::default()
        }
    }
}

/// Configuration for one animation instance
///
/// # Example
///
/// ```ignore
/// let params = AnimeParams::new()
///     .targets(el.clone())
///     .property("translateX", 250)
///     .property("opacity", (0, 1))
///     .duration(800.0)
///     .easing(Easing::EaseInOutQuad);
/// ```
#[derive(Clone, Default)]
pub struct AnimeParams {
    pub(crate) targets: Targets,
    pub(crate) properties: IndexMap<String, PropertyValue>,
    pub(crate) duration: Option<Param<f64>>,
    pub(crate) delay: Option<Param<f64>>,
    pub(crate) easing: Option<Param<Easing>>,
    pub(crate) elasticity: Option<Param<f64>>,
    pub(crate) round: Option<Param<f64>>,
    pub(crate) loop_count: LoopCount,
    pub(crate) direction: PlayDirection,
    pub(crate) autoplay: Option<bool>,
    pub(crate) callbacks: Callbacks,
}

impl AnimeParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(mut self, targets: impl Into<Targets>) -> Self {
        self.targets = targets.into();
        self
    }

    /// Animate `name`; a repeated name replaces the earlier spec in place
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn duration(mut self, ms: impl Into<Param<f64>>) -> Self {
        self.duration = Some(ms.into());
        self
    }

    pub fn delay(mut self, ms: impl Into<Param<f64>>) -> Self {
        self.delay = Some(ms.into());
        self
    }

    pub fn easing(mut self, easing: impl Into<Param<Easing>>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// Elastic oscillation control in [1, 999]
    pub fn elasticity(mut self, elasticity: impl Into<Param<f64>>) -> Self {
        self.elasticity = Some(elasticity.into());
        self
    }

    /// Round output to `1/round` steps (1 = integers, 0 = off)
    pub fn round(mut self, round: impl Into<Param<f64>>) -> Self {
        self.round = Some(round.into());
        self
    }

    /// Play `count` times
    pub fn loop_count(mut self, count: u32) -> Self {
        self.loop_count = LoopCount::from(count);
        self
    }

    pub fn loop_infinite(mut self) -> Self {
        self.loop_count = LoopCount::Infinite;
        self
    }

    pub fn direction(mut self, direction: PlayDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn alternate(self) -> Self {
        self.direction(PlayDirection::Alternate)
    }

    pub fn reverse(self) -> Self {
        self.direction(PlayDirection::Reverse)
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    pub fn on_begin(mut self, f: impl Fn(&Anime) + Send + Sync + 'static) -> Self {
        self.callbacks.begin = Some(Arc::new(f));
        self
    }

    pub fn on_update(mut self, f: impl Fn(&Anime) + Send + Sync + 'static) -> Self {
        self.callbacks.update = Some(Arc::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn(&Anime) + Send + Sync + 'static) -> Self {
        self.callbacks.complete = Some(Arc::new(f));
        self
    }

    /// Fill every unset tween setting from `defaults`
    pub(crate) fn tween_settings(&self, defaults: &TweenSettings) -> TweenSettings {
        TweenSettings {
            duration: self.duration.clone().unwrap_or_else(|| defaults.duration.clone()),
            delay: self.delay.clone().unwrap_or_else(|| defaults.delay.clone()),
            easing: self.easing.clone().unwrap_or_else(|| defaults.easing.clone()),
            elasticity: self
                .elasticity
                .clone()
                .unwrap_or_else(|| defaults.elasticity.clone()),
            round: self.round.clone().unwrap_or_else(|| defaults.round.clone()),
        }
    }
}

impl fmt::Debug for AnimeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimeParams")
            .field("targets", &self.targets)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("loop_count", &self.loop_count)
            .field("direction", &self.direction)
            .field("autoplay", &self.autoplay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_core::ObjectTarget;

    #[test]
    fn test_computed_param_sees_index() {
        let target: Target = Arc::new(ObjectTarget::new());
        let stagger: Param<f64> = Param::computed(|_, i, total| (i * 100 + total) as f64);
        assert_eq!(stagger.resolve(&target, 2, 3), 203.0);
        assert_eq!(Param::<f64>::from(5.0).resolve(&target, 9, 10), 5.0);
        assert!(stagger.literal().is_none());
    }

    #[test]
    fn test_property_value_shapes() {
        assert_eq!(PropertyValue::from(10).into_keyframes().len(), 1);
        assert_eq!(PropertyValue::sequence([0, 10]).into_keyframes().len(), 1);
        assert!(matches!(
            PropertyValue::sequence([0, 10]).into_keyframes()[0].value,
            KeyframeValue::FromTo(..)
        ));
        let three = PropertyValue::sequence(["0px", "10px", "20px"]).into_keyframes();
        assert_eq!(three.len(), 3);
        assert!(three.iter().all(|k| matches!(k.value, KeyframeValue::To(_))));
    }

    #[test]
    fn test_loop_count() {
        let mut count = LoopCount::from(2);
        assert!(count.has_remaining());
        count.decrement();
        count.decrement();
        assert!(count.is_exhausted());
        assert_eq!(LoopCount::from(0), LoopCount::Once);

        let mut once = LoopCount::Once;
        assert!(!once.is_exhausted());
        once.decrement();
        assert!(once.is_exhausted() && !once.has_remaining());

        let mut forever = LoopCount::Infinite;
        forever.decrement();
        assert!(forever.has_remaining());
    }

    #[test]
    fn test_params_fill_defaults() {
        let params = AnimeParams::new().duration(300.0).easing(Easing::Linear);
        let settings = params.tween_settings(&TweenSettings::default());
        assert_eq!(settings.duration.literal(), Some(&300.0));
        assert_eq!(settings.easing.literal(), Some(&Easing::Linear));
        assert_eq!(settings.elasticity.literal(), Some(&500.0));
    }
}
