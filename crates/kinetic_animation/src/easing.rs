//! Easing functions for animations
//!
//! Every preset except the elastic family is a fixed cubic Bézier curve
//! (approximated Penner equations). Elastic curves are a closed-form damped
//! sine whose period is driven by the tween's elasticity.

use crate::error::{Error, Result};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseInCubic,
    EaseInQuart,
    EaseInQuint,
    EaseInSine,
    EaseInExpo,
    EaseInCirc,
    EaseInBack,
    EaseInElastic,
    EaseOutQuad,
    EaseOutCubic,
    EaseOutQuart,
    EaseOutQuint,
    EaseOutSine,
    EaseOutExpo,
    EaseOutCirc,
    EaseOutBack,
    EaseOutElastic,
    EaseInOutQuad,
    EaseInOutCubic,
    EaseInOutQuart,
    EaseInOutQuint,
    EaseInOutSine,
    EaseInOutExpo,
    EaseInOutCirc,
    EaseInOutBack,
    EaseInOutElastic,
    /// User-supplied control points `(x1, y1, x2, y2)`
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Every named preset
    pub const ALL: [Easing; 28] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseInCubic,
        Easing::EaseInQuart,
        Easing::EaseInQuint,
        Easing::EaseInSine,
        Easing::EaseInExpo,
        Easing::EaseInCirc,
        Easing::EaseInBack,
        Easing::EaseInElastic,
        Easing::EaseOutQuad,
        Easing::EaseOutCubic,
        Easing::EaseOutQuart,
        Easing::EaseOutQuint,
        Easing::EaseOutSine,
        Easing::EaseOutExpo,
        Easing::EaseOutCirc,
        Easing::EaseOutBack,
        Easing::EaseOutElastic,
        Easing::EaseInOutQuad,
        Easing::EaseInOutCubic,
        Easing::EaseInOutQuart,
        Easing::EaseInOutQuint,
        Easing::EaseInOutSine,
        Easing::EaseInOutExpo,
        Easing::EaseInOutCirc,
        Easing::EaseInOutBack,
        Easing::EaseInOutElastic,
    ];

    /// Preset name (`easeInOutQuad`), or `None` for custom curves
    pub fn name(&self) -> Option<&'static str> {
        Some(match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseInQuint => "easeInQuint",
            Easing::EaseInSine => "easeInSine",
            Easing::EaseInExpo => "easeInExpo",
            Easing::EaseInCirc => "easeInCirc",
            Easing::EaseInBack => "easeInBack",
            Easing::EaseInElastic => "easeInElastic",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseOutQuint => "easeOutQuint",
            Easing::EaseOutSine => "easeOutSine",
            Easing::EaseOutExpo => "easeOutExpo",
            Easing::EaseOutCirc => "easeOutCirc",
            Easing::EaseOutBack => "easeOutBack",
            Easing::EaseOutElastic => "easeOutElastic",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseInOutQuint => "easeInOutQuint",
            Easing::EaseInOutSine => "easeInOutSine",
            Easing::EaseInOutExpo => "easeInOutExpo",
            Easing::EaseInOutCirc => "easeInOutCirc",
            Easing::EaseInOutBack => "easeInOutBack",
            Easing::EaseInOutElastic => "easeInOutElastic",
            Easing::CubicBezier(..) => return None,
        })
    }

    /// Control points of the Bézier-backed curves
    fn control_points(&self) -> Option<[f64; 4]> {
        Some(match *self {
            Easing::Linear => [0.250, 0.250, 0.750, 0.750],
            Easing::EaseInQuad => [0.550, 0.085, 0.680, 0.530],
            Easing::EaseInCubic => [0.550, 0.055, 0.675, 0.190],
            Easing::EaseInQuart => [0.895, 0.030, 0.685, 0.220],
            Easing::EaseInQuint => [0.755, 0.050, 0.855, 0.060],
            Easing::EaseInSine => [0.470, 0.000, 0.745, 0.715],
            Easing::EaseInExpo => [0.950, 0.050, 0.795, 0.035],
            Easing::EaseInCirc => [0.600, 0.040, 0.980, 0.335],
            Easing::EaseInBack => [0.600, -0.280, 0.735, 0.045],
            Easing::EaseOutQuad => [0.250, 0.460, 0.450, 0.940],
            Easing::EaseOutCubic => [0.215, 0.610, 0.355, 1.000],
            Easing::EaseOutQuart => [0.165, 0.840, 0.440, 1.000],
            Easing::EaseOutQuint => [0.230, 1.000, 0.320, 1.000],
            Easing::EaseOutSine => [0.390, 0.575, 0.565, 1.000],
            Easing::EaseOutExpo => [0.190, 1.000, 0.220, 1.000],
            Easing::EaseOutCirc => [0.075, 0.820, 0.165, 1.000],
            Easing::EaseOutBack => [0.175, 0.885, 0.320, 1.275],
            Easing::EaseInOutQuad => [0.455, 0.030, 0.515, 0.955],
            Easing::EaseInOutCubic => [0.645, 0.045, 0.355, 1.000],
            Easing::EaseInOutQuart => [0.770, 0.000, 0.175, 1.000],
            Easing::EaseInOutQuint => [0.860, 0.000, 0.070, 1.000],
            Easing::EaseInOutSine => [0.445, 0.050, 0.550, 0.950],
            Easing::EaseInOutExpo => [1.000, 0.000, 0.000, 1.000],
            Easing::EaseInOutCirc => [0.785, 0.135, 0.150, 0.860],
            Easing::EaseInOutBack => [0.680, -0.550, 0.265, 1.550],
            Easing::CubicBezier(x1, y1, x2, y2) => [x1, y1, x2, y2],
            Easing::EaseInElastic | Easing::EaseOutElastic | Easing::EaseInOutElastic => {
                return None
            }
        })
    }

    /// Resolve into an evaluable curve (pre-samples Bézier curves once)
    pub fn resolve(&self) -> Result<EasingFn> {
        match self {
            Easing::EaseInElastic => Ok(EasingFn::InElastic),
            Easing::EaseOutElastic => Ok(EasingFn::OutElastic),
            Easing::EaseInOutElastic => Ok(EasingFn::InOutElastic),
            other => {
                let [x1, y1, x2, y2] = other.control_points().unwrap_or([0.25, 0.25, 0.75, 0.75]);
                CubicBezier::new(x1, y1, x2, y2).map(EasingFn::Bezier)
            }
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// `elasticity` is the normalized period (see [`elasticity_factor`]);
    /// only elastic curves read it. Invalid custom curves evaluate linearly.
    pub fn apply(&self, t: f64, elasticity: f64) -> f64 {
        match self.resolve() {
            Ok(f) => f.apply(t, elasticity),
            Err(_) => t,
        }
    }
}

impl FromStr for Easing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Easing::ALL
            .iter()
            .find(|e| e.name() == Some(s))
            .copied()
            .ok_or_else(|| Error::UnknownEasing(s.to_string()))
    }
}

impl From<[f64; 4]> for Easing {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Easing::CubicBezier(x1, y1, x2, y2)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubicBezier({x1}, {y1}, {x2}, {y2})")
            }
            named => f.write_str(named.name().unwrap_or_default()),
        }
    }
}

/// Map a user-facing elasticity in `[1, 999]` onto the elastic period
///
/// Higher elasticity yields a smaller period: a tighter, snappier oscillation.
pub fn elasticity_factor(value: f64) -> f64 {
    (1000.0 - value.clamp(1.0, 999.0)) / 1000.0
}

/// A resolved easing curve, cheap to copy into every tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EasingFn {
    Bezier(CubicBezier),
    InElastic,
    OutElastic,
    InOutElastic,
}

impl EasingFn {
    /// The identity curve
    pub fn linear() -> Self {
        EasingFn::Bezier(CubicBezier::LINEAR)
    }

    /// Evaluate at progress `t` with normalized elasticity `p`
    pub fn apply(&self, t: f64, p: f64) -> f64 {
        match self {
            EasingFn::Bezier(curve) => curve.ease(t),
            EasingFn::InElastic => elastic(t, p),
            EasingFn::OutElastic => 1.0 - elastic(1.0 - t, p),
            EasingFn::InOutElastic => {
                if t < 0.5 {
                    elastic(t * 2.0, p) / 2.0
                } else {
                    1.0 - elastic(t * -2.0 + 2.0, p) / 2.0
                }
            }
        }
    }
}

/// Damped sine, exact at both endpoints
fn elastic(t: f64, p: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let s = t - 1.0;
    -(2f64.powf(10.0 * s)) * (((s - p / (PI * 2.0) * 1f64.asin()) * (PI * 2.0)) / p).sin()
}

const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP_SIZE: f64 = 1.0 / (SPLINE_TABLE_SIZE as f64 - 1.0);
const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;

/// Cubic Bézier easing curve (matches CSS `cubic-bezier()`).
///
/// X is the time domain, Y the eased output. Solving for the curve
/// parameter uses a pre-sampled table for the initial guess, refined by
/// Newton-Raphson, with binary subdivision where the slope is too flat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    samples: [f64; SPLINE_TABLE_SIZE],
}

impl CubicBezier {
    const LINEAR: CubicBezier = CubicBezier {
        x1: 0.25,
        y1: 0.25,
        x2: 0.75,
        y2: 0.75,
        samples: [0.0; SPLINE_TABLE_SIZE],
    };

    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        if !((0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2)) {
            return Err(Error::InvalidBezier { x1, x2 });
        }
        let mut samples = [0.0; SPLINE_TABLE_SIZE];
        if x1 != y1 || x2 != y2 {
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample = bezier_sample(i as f64 * SAMPLE_STEP_SIZE, x1, x2);
            }
        }
        Ok(Self {
            x1,
            y1,
            x2,
            y2,
            samples,
        })
    }

    /// Control points `(x1, y1, x2, y2)`
    pub fn control_points(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    fn is_linear(&self) -> bool {
        self.x1 == self.y1 && self.x2 == self.y2
    }

    /// Eased output for time `x`
    pub fn ease(&self, x: f64) -> f64 {
        if self.is_linear() {
            return x;
        }
        // Endpoints are always exact
        if x == 0.0 {
            return 0.0;
        }
        if x == 1.0 {
            return 1.0;
        }
        bezier_sample(self.t_for_x(x), self.y1, self.y2)
    }

    fn t_for_x(&self, x: f64) -> f64 {
        let last_sample = SPLINE_TABLE_SIZE - 1;
        let mut interval_start = 0.0;
        let mut current = 1;
        while current != last_sample && self.samples[current] <= x {
            interval_start += SAMPLE_STEP_SIZE;
            current += 1;
        }
        current -= 1;

        let dist = (x - self.samples[current]) / (self.samples[current + 1] - self.samples[current]);
        let guess = interval_start + dist * SAMPLE_STEP_SIZE;
        let initial_slope = bezier_slope(guess, self.x1, self.x2);

        if initial_slope >= NEWTON_MIN_SLOPE {
            self.newton_raphson(x, guess)
        } else if initial_slope == 0.0 {
            guess
        } else {
            self.binary_subdivide(x, interval_start, interval_start + SAMPLE_STEP_SIZE)
        }
    }

    fn newton_raphson(&self, x: f64, mut guess: f64) -> f64 {
        for _ in 0..NEWTON_ITERATIONS {
            let slope = bezier_slope(guess, self.x1, self.x2);
            if slope == 0.0 {
                return guess;
            }
            let err = bezier_sample(guess, self.x1, self.x2) - x;
            guess -= err / slope;
        }
        guess
    }

    fn binary_subdivide(&self, x: f64, mut lo: f64, mut hi: f64) -> f64 {
        let mut t = lo;
        for _ in 0..SUBDIVISION_MAX_ITERATIONS {
            t = lo + (hi - lo) / 2.0;
            let err = bezier_sample(t, self.x1, self.x2) - x;
            if err > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            if err.abs() <= SUBDIVISION_PRECISION {
                break;
            }
        }
        t
    }
}

/// Build a custom Bézier curve, validating the x control points
pub fn bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<CubicBezier> {
    CubicBezier::new(x1, y1, x2, y2)
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    // Horner form: ((1-3p2+3p1)t + 3p2-6p1)t + 3p1) * t
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of cubic bezier: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
