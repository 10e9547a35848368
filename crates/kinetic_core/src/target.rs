//! Animation targets
//!
//! The engine never touches a rendering surface. Everything it knows about a
//! target goes through the [`Animatable`] capability: classify a property,
//! read its current textual value, write a new one.

use std::fmt;
use std::sync::Arc;

/// How an animated property is written back to its target
///
/// Selected once when an animation is built; the per-frame write path is a
/// single match over this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationType {
    /// A style property (`opacity`, `background-color`, ...)
    Css,
    /// A generic element attribute (`points`, `stroke-dashoffset`, ...)
    Attribute,
    /// A plain field on an arbitrary object
    Object,
    /// A transform sub-property (`translateX`, `rotate`, ...), batched per target
    Transform,
}

impl AnimationType {
    /// Lowercase tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationType::Css => "css",
            AnimationType::Attribute => "attribute",
            AnimationType::Object => "object",
            AnimationType::Transform => "transform",
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Property accessor capability implemented by the host environment
///
/// Implementations use interior mutability; the engine only ever holds
/// shared references. `write` is called from inside a frame tick and must
/// not call back into the animation that is writing.
pub trait Animatable: Send + Sync {
    /// Classify `property`, or `None` if this target cannot animate it.
    fn animation_type(&self, property: &str) -> Option<AnimationType>;

    /// Current textual value of `property`.
    fn read(&self, property: &str, kind: AnimationType) -> Option<String>;

    /// Write an interpolated value.
    fn write(&self, property: &str, kind: AnimationType, value: &str);

    /// Apply the composed transform string for this frame.
    ///
    /// Transform sub-properties are never written one by one; the engine
    /// accumulates them and calls this once per target per frame.
    fn write_transform(&self, value: &str) {
        self.write("transform", AnimationType::Css, value);
    }
}

/// Shared handle to an animation target
pub type Target = Arc<dyn Animatable>;

/// Identity comparison for targets (data pointer only, vtables ignored)
pub fn same_target(a: &Target, b: &Target) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Resolves selector strings to concrete targets
///
/// Hosts with a document model plug this into the scheduler. Without a
/// resolver, selectors resolve to nothing.
pub trait SelectorResolver: Send + Sync {
    fn select(&self, selector: &str) -> Vec<Target>;
}

/// A (possibly nested) description of what to animate
#[derive(Clone, Default)]
pub enum Targets {
    /// Nothing; the instance still runs as a timer
    #[default]
    None,
    /// A single target
    One(Target),
    /// A selector handed to the [`SelectorResolver`]
    Selector(String),
    /// A heterogeneous ordered collection
    Many(Vec<Targets>),
}

impl Targets {
    /// Wrap a single trait-object target
    pub fn one(target: Target) -> Self {
        Targets::One(target)
    }

    /// Collect any mix of target descriptions
    pub fn many<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Targets>,
    {
        Targets::Many(items.into_iter().map(Into::into).collect())
    }

    /// Flatten into a de-duplicated target list, preserving first-seen order
    pub fn resolve(&self, resolver: Option<&dyn SelectorResolver>) -> Vec<Target> {
        let mut out: Vec<Target> = Vec::new();
        self.collect_into(resolver, &mut out);
        out
    }

    fn collect_into(&self, resolver: Option<&dyn SelectorResolver>, out: &mut Vec<Target>) {
        match self {
            Targets::None => {}
            Targets::One(target) => push_unique(out, target.clone()),
            Targets::Selector(selector) => {
                let found = resolver.map(|r| r.select(selector)).unwrap_or_default();
                if found.is_empty() {
                    tracing::debug!("selector `{}` matched no targets", selector);
                }
                for target in found {
                    push_unique(out, target);
                }
            }
            Targets::Many(items) => {
                for item in items {
                    item.collect_into(resolver, out);
                }
            }
        }
    }
}

fn push_unique(out: &mut Vec<Target>, target: Target) {
    if !out.iter().any(|t| same_target(t, &target)) {
        out.push(target);
    }
}

impl fmt::Debug for Targets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Targets::None => f.write_str("None"),
            Targets::One(t) => write!(f, "One({:p})", Arc::as_ptr(t).cast::<()>()),
            Targets::Selector(s) => f.debug_tuple("Selector").field(s).finish(),
            Targets::Many(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl<T: Animatable + 'static> From<Arc<T>> for Targets {
    fn from(target: Arc<T>) -> Self {
        Targets::One(target)
    }
}

impl From<Vec<Target>> for Targets {
    fn from(targets: Vec<Target>) -> Self {
        Targets::Many(targets.into_iter().map(Targets::One).collect())
    }
}

impl From<Vec<Targets>> for Targets {
    fn from(targets: Vec<Targets>) -> Self {
        Targets::Many(targets)
    }
}

impl From<&str> for Targets {
    fn from(selector: &str) -> Self {
        Targets::Selector(selector.to_string())
    }
}

impl From<String> for Targets {
    fn from(selector: String) -> Self {
        Targets::Selector(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ObjectTarget;

    struct ByName(Vec<(String, Target)>);

    impl SelectorResolver for ByName {
        fn select(&self, selector: &str) -> Vec<Target> {
            self.0
                .iter()
                .filter(|(name, _)| name.starts_with(selector))
                .map(|(_, t)| t.clone())
                .collect()
        }
    }

    #[test]
    fn test_resolve_dedupes_in_first_seen_order() {
        let a: Target = Arc::new(ObjectTarget::new());
        let b: Target = Arc::new(ObjectTarget::new());

        let targets = Targets::Many(vec![
            Targets::one(b.clone()),
            Targets::Many(vec![Targets::one(a.clone()), Targets::one(b.clone())]),
            Targets::one(a.clone()),
        ]);

        let resolved = targets.resolve(None);
        assert_eq!(resolved.len(), 2);
        assert!(same_target(&resolved[0], &b));
        assert!(same_target(&resolved[1], &a));
    }

    #[test]
    fn test_selector_without_resolver_is_empty() {
        let targets = Targets::from(".box");
        assert!(targets.resolve(None).is_empty());
    }

    #[test]
    fn test_selector_with_resolver() {
        let a: Target = Arc::new(ObjectTarget::new());
        let b: Target = Arc::new(ObjectTarget::new());
        let resolver = ByName(vec![
            ("box-1".into(), a.clone()),
            ("box-2".into(), b.clone()),
            ("circle".into(), Arc::new(ObjectTarget::new())),
        ]);

        let targets = Targets::many(vec![Targets::from("box"), Targets::one(a.clone())]);
        let resolved = targets.resolve(Some(&resolver));
        assert_eq!(resolved.len(), 2);
        assert!(same_target(&resolved[0], &a));
        assert!(same_target(&resolved[1], &b));
    }
}
