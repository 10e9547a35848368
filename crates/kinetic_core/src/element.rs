//! In-memory targets
//!
//! `ElementTarget` behaves like a headless document element (style,
//! attributes, transform); `ObjectTarget` is a bag of plain fields. Both are
//! complete [`Animatable`] implementations for hosts without a document model.

use crate::target::{Animatable, AnimationType};
use crate::transform::{is_transform_property, to_kebab_case, transform_value};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct ElementState {
    /// Keyed by kebab-case name
    style: FxHashMap<String, String>,
    attributes: FxHashMap<String, String>,
    transform: String,
    transform_writes: usize,
}

/// A headless element
///
/// Style properties are animatable once they have a value; attributes
/// likewise. Transform sub-properties are always animatable.
#[derive(Debug, Default)]
pub struct ElementTarget {
    state: Mutex<ElementState>,
}

impl ElementTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a style property
    pub fn with_style(self, name: &str, value: &str) -> Self {
        lock(&self.state)
            .style
            .insert(to_kebab_case(name), value.to_string());
        self
    }

    /// Builder: set an attribute
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        lock(&self.state)
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Builder: set the initial transform string
    pub fn with_transform(self, transform: &str) -> Self {
        lock(&self.state).transform = transform.to_string();
        self
    }

    pub fn style(&self, name: &str) -> Option<String> {
        lock(&self.state).style.get(&to_kebab_case(name)).cloned()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        lock(&self.state).attributes.get(name).cloned()
    }

    pub fn transform(&self) -> String {
        lock(&self.state).transform.clone()
    }

    /// Number of composed transform writes received
    pub fn transform_writes(&self) -> usize {
        lock(&self.state).transform_writes
    }
}

impl Animatable for ElementTarget {
    fn animation_type(&self, property: &str) -> Option<AnimationType> {
        if is_transform_property(property) {
            return Some(AnimationType::Transform);
        }
        let state = lock(&self.state);
        if state.attributes.contains_key(property) {
            Some(AnimationType::Attribute)
        } else if property != "transform" && state.style.contains_key(&to_kebab_case(property)) {
            Some(AnimationType::Css)
        } else {
            None
        }
    }

    fn read(&self, property: &str, kind: AnimationType) -> Option<String> {
        let state = lock(&self.state);
        match kind {
            AnimationType::Transform => Some(transform_value(&state.transform, property)),
            AnimationType::Css => Some(
                state
                    .style
                    .get(&to_kebab_case(property))
                    .cloned()
                    .unwrap_or_else(|| "0".to_string()),
            ),
            AnimationType::Attribute => state.attributes.get(property).cloned(),
            AnimationType::Object => None,
        }
    }

    fn write(&self, property: &str, kind: AnimationType, value: &str) {
        let mut state = lock(&self.state);
        match kind {
            AnimationType::Css => {
                state.style.insert(to_kebab_case(property), value.to_string());
            }
            AnimationType::Attribute => {
                state.attributes.insert(property.to_string(), value.to_string());
            }
            AnimationType::Object | AnimationType::Transform => {}
        }
    }

    fn write_transform(&self, value: &str) {
        let mut state = lock(&self.state);
        state.transform.clear();
        state.transform.push_str(value);
        state.transform_writes += 1;
    }
}

/// A plain object with named fields, kept in insertion order
#[derive(Debug, Default)]
pub struct ObjectTarget {
    fields: Mutex<IndexMap<String, String>>,
}

impl ObjectTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a field
    pub fn with_field(self, name: &str, value: impl ToString) -> Self {
        lock(&self.fields).insert(name.to_string(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<String> {
        lock(&self.fields).get(name).cloned()
    }

    /// Field parsed as a number
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.trim().parse().ok())
    }

    pub fn set(&self, name: &str, value: impl ToString) {
        lock(&self.fields).insert(name.to_string(), value.to_string());
    }
}

impl Animatable for ObjectTarget {
    fn animation_type(&self, property: &str) -> Option<AnimationType> {
        lock(&self.fields)
            .contains_key(property)
            .then_some(AnimationType::Object)
    }

    fn read(&self, property: &str, _kind: AnimationType) -> Option<String> {
        self.get(property)
    }

    fn write(&self, property: &str, _kind: AnimationType, value: &str) {
        if let Some(field) = lock(&self.fields).get_mut(property) {
            field.clear();
            field.push_str(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_classification() {
        let el = ElementTarget::new()
            .with_style("backgroundColor", "#fff")
            .with_attribute("points", "0 0 10 10");

        assert_eq!(el.animation_type("translateX"), Some(AnimationType::Transform));
        assert_eq!(el.animation_type("points"), Some(AnimationType::Attribute));
        assert_eq!(el.animation_type("backgroundColor"), Some(AnimationType::Css));
        assert_eq!(el.animation_type("background-color"), Some(AnimationType::Css));
        assert_eq!(el.animation_type("width"), None);
        assert_eq!(el.animation_type("transform"), None);
    }

    #[test]
    fn test_element_reads_and_writes() {
        let el = ElementTarget::new()
            .with_style("opacity", "0.5")
            .with_transform("translateX(20px)");

        assert_eq!(el.read("opacity", AnimationType::Css).as_deref(), Some("0.5"));
        assert_eq!(
            el.read("translateX", AnimationType::Transform).as_deref(),
            Some("20px")
        );
        assert_eq!(el.read("scale", AnimationType::Transform).as_deref(), Some("1"));

        el.write("opacity", AnimationType::Css, "1");
        el.write_transform("translateX(40px) rotate(10deg)");
        assert_eq!(el.style("opacity").as_deref(), Some("1"));
        assert_eq!(el.transform(), "translateX(40px) rotate(10deg)");
        assert_eq!(el.transform_writes(), 1);
    }

    #[test]
    fn test_object_fields() {
        let obj = ObjectTarget::new().with_field("progress", 0).with_field("label", "a");
        assert_eq!(obj.animation_type("progress"), Some(AnimationType::Object));
        assert_eq!(obj.animation_type("missing"), None);

        obj.write("progress", AnimationType::Object, "42.5");
        assert_eq!(obj.number("progress"), Some(42.5));

        // Unknown fields are never created by a write
        obj.write("missing", AnimationType::Object, "1");
        assert_eq!(obj.get("missing"), None);
    }
}
