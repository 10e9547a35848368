//! Motion paths
//!
//! A path-progress value carries a precomputed path length. The engine
//! interpolates a scalar along that length and asks the [`PathSampler`]
//! where that distance lands, instead of writing the scalar itself.

use crate::target::{Animatable, AnimationType};
use std::fmt;
use std::sync::Arc;

/// A point on a path
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Length and point queries on a path, supplied by the host
pub trait PathSampler: Send + Sync {
    fn total_length(&self) -> f64;
    fn point_at_length(&self, length: f64) -> Point;
}

/// Which quantity of the sampled point is animated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathProperty {
    X,
    Y,
    /// Tangent angle in degrees
    Angle,
}

/// A path-progress value descriptor
#[derive(Clone)]
pub struct PathProgress {
    sampler: Arc<dyn PathSampler>,
    property: PathProperty,
    total_length: f64,
}

impl PathProgress {
    pub fn new(sampler: Arc<dyn PathSampler>, property: PathProperty, total_length: f64) -> Self {
        Self {
            sampler,
            property,
            total_length,
        }
    }

    /// Length the interpolation runs to
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn property(&self) -> PathProperty {
        self.property
    }

    /// Map a distance along the path onto this descriptor's quantity
    pub fn sample(&self, length: f64) -> f64 {
        let point = |offset: f64| {
            let l = if length + offset >= 1.0 {
                length + offset
            } else {
                0.0
            };
            self.sampler.point_at_length(l)
        };
        match self.property {
            PathProperty::X => point(0.0).x,
            PathProperty::Y => point(0.0).y,
            PathProperty::Angle => {
                let p0 = point(-1.0);
                let p1 = point(1.0);
                (p1.y - p0.y).atan2(p1.x - p0.x).to_degrees()
            }
        }
    }
}

impl fmt::Debug for PathProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathProgress")
            .field("property", &self.property)
            .field("total_length", &self.total_length)
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`path`]
#[derive(Clone)]
pub struct MotionPath {
    sampler: Arc<dyn PathSampler>,
    percent: f64,
}

impl MotionPath {
    pub fn property(&self, property: PathProperty) -> PathProgress {
        PathProgress::new(
            self.sampler.clone(),
            property,
            self.sampler.total_length() * (self.percent / 100.0),
        )
    }

    pub fn x(&self) -> PathProgress {
        self.property(PathProperty::X)
    }

    pub fn y(&self) -> PathProgress {
        self.property(PathProperty::Y)
    }

    pub fn angle(&self) -> PathProgress {
        self.property(PathProperty::Angle)
    }
}

/// Follow `sampler` up to `percent` of its length (100 when `None`)
pub fn path(sampler: Arc<dyn PathSampler>, percent: Option<f64>) -> MotionPath {
    MotionPath {
        sampler,
        percent: percent.filter(|p| *p != 0.0).unwrap_or(100.0),
    }
}

/// Prepare a line-drawing effect: writes the path length into the
/// `stroke-dasharray` attribute and returns it
pub fn set_dashoffset(target: &dyn Animatable, sampler: &dyn PathSampler) -> f64 {
    let length = sampler.total_length();
    target.write("stroke-dasharray", AnimationType::Attribute, &length.to_string());
    length
}

/// A polyline path, sampled by linear distance along its segments
#[derive(Clone, Debug, Default)]
pub struct Polyline {
    points: Vec<Point>,
    /// Cumulative length at each point
    lengths: Vec<f64>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        let mut lengths = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                let prev = points[i - 1];
                acc += (p.x - prev.x).hypot(p.y - prev.y);
            }
            lengths.push(acc);
        }
        Self { points, lengths }
    }
}

impl PathSampler for Polyline {
    fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    fn point_at_length(&self, length: f64) -> Point {
        let Some(first) = self.points.first() else {
            return Point::default();
        };
        if length <= 0.0 {
            return *first;
        }
        for i in 1..self.points.len() {
            if length <= self.lengths[i] {
                let seg = self.lengths[i] - self.lengths[i - 1];
                let t = if seg > 0.0 {
                    (length - self.lengths[i - 1]) / seg
                } else {
                    0.0
                };
                let (a, b) = (self.points[i - 1], self.points[i]);
                return Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            }
        }
        self.points[self.points.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementTarget;

    fn diagonal() -> Arc<dyn PathSampler> {
        Arc::new(Polyline::new(vec![Point::new(0.0, 0.0), Point::new(30.0, 40.0)]))
    }

    #[test]
    fn test_polyline_sampling() {
        let line = Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0),
        ]);
        assert_eq!(line.total_length(), 150.0);
        assert_eq!(line.point_at_length(50.0), Point::new(50.0, 0.0));
        assert_eq!(line.point_at_length(125.0), Point::new(100.0, 25.0));
        assert_eq!(line.point_at_length(500.0), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_path_percent_scales_length() {
        let motion = path(diagonal(), Some(50.0));
        assert_eq!(motion.x().total_length(), 25.0);
        assert_eq!(path(diagonal(), None).y().total_length(), 50.0);
    }

    #[test]
    fn test_sample_quantities() {
        let motion = path(diagonal(), None);
        assert!((motion.x().sample(25.0) - 15.0).abs() < 1e-9);
        assert!((motion.y().sample(25.0) - 20.0).abs() < 1e-9);
        let angle = motion.angle().sample(25.0);
        assert!((angle - 53.130_102_354).abs() < 1e-6);
    }

    #[test]
    fn test_set_dashoffset_writes_attribute() {
        let el = ElementTarget::new().with_attribute("stroke-dasharray", "0");
        let length = set_dashoffset(&el, diagonal().as_ref());
        assert_eq!(length, 50.0);
        assert_eq!(el.attribute("stroke-dasharray").as_deref(), Some("50"));
    }
}
