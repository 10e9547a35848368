//! Kinetic Core
//!
//! The boundary the Kinetic animation engine talks through:
//!
//! - **Targets**: the [`Animatable`] property-accessor capability, animation
//!   type tags, and target sets with selector resolution
//! - **Transforms**: transform sub-property names, units and parsing
//! - **Motion paths**: path sampling and path-progress descriptors
//! - **In-memory targets**: headless elements and plain objects
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::{Animatable, AnimationType, ElementTarget};
//!
//! let el = ElementTarget::new().with_style("opacity", "0");
//! assert_eq!(el.animation_type("opacity"), Some(AnimationType::Css));
//! assert_eq!(el.animation_type("translateX"), Some(AnimationType::Transform));
//! ```

pub mod element;
pub mod path;
pub mod target;
pub mod transform;

pub use element::{ElementTarget, ObjectTarget};
pub use path::{path, set_dashoffset, MotionPath, PathProgress, PathProperty, PathSampler, Point, Polyline};
pub use target::{same_target, Animatable, AnimationType, SelectorResolver, Target, Targets};
pub use transform::{
    default_transform_value, is_transform_property, to_kebab_case, transform_unit,
    transform_value, TRANSFORM_PROPERTIES,
};
