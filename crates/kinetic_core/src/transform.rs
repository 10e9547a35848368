//! Transform sub-properties
//!
//! Transform properties are animated individually (`translateX`, `rotate`, ...)
//! but live together in one `transform` string on the target.

use regex::Regex;
use std::sync::LazyLock;

/// Property names animated as transform sub-properties
pub const TRANSFORM_PROPERTIES: [&str; 13] = [
    "translateX",
    "translateY",
    "translateZ",
    "rotate",
    "rotateX",
    "rotateY",
    "rotateZ",
    "scale",
    "scaleX",
    "scaleY",
    "scaleZ",
    "skewX",
    "skewY",
];

static TRANSFORM_FN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\((.+?)\)").expect("transform pattern compiles"));

/// Whether `name` is one of [`TRANSFORM_PROPERTIES`]
pub fn is_transform_property(name: &str) -> bool {
    TRANSFORM_PROPERTIES.contains(&name)
}

/// Default unit for a transform sub-property
pub fn transform_unit(name: &str) -> Option<&'static str> {
    if name.contains("translate") {
        Some("px")
    } else if name.contains("rotate") || name.contains("skew") {
        Some("deg")
    } else {
        None
    }
}

/// Value of a sub-property that is not present in the transform string
pub fn default_transform_value(name: &str) -> String {
    if name.contains("scale") {
        "1".to_string()
    } else {
        format!("0{}", transform_unit(name).unwrap_or_default())
    }
}

/// Extract `name`'s argument from a composed transform string
///
/// `transform_value("translateX(10px) rotate(45deg)", "rotate")` is `"45deg"`.
pub fn transform_value(transform: &str, name: &str) -> String {
    TRANSFORM_FN
        .captures_iter(transform)
        .find(|caps| &caps[1] == name)
        .map(|caps| caps[2].to_string())
        .unwrap_or_else(|| default_transform_value(name))
}

/// `backgroundColor` -> `background-color`
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('-');
        }
        prev_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_lowercase());
    }
    out
}
