//! Engine configuration (kinetic.toml)
//!
//! Every field is optional in the file; missing ones take the engine
//! defaults.

use crate::easing::Easing;
use crate::error::Result;
use crate::params::{Param, TweenSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Engine-wide defaults
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Default tween duration in milliseconds
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Default tween delay in milliseconds
    #[serde(default)]
    pub delay: f64,
    /// Default easing name, e.g. `"easeOutElastic"`
    #[serde(default = "default_easing")]
    pub easing: String,
    /// Default elasticity, 0..=1000
    #[serde(default = "default_elasticity")]
    pub elasticity: f64,
    /// Default rounding multiplier, 0 = off
    #[serde(default)]
    pub round: f64,
    /// Initial global speed multiplier
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Frame rate of the background frame thread
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_duration() -> f64 {
    1000.0
}

fn default_easing() -> String {
    "easeOutElastic".to_string()
}

fn default_elasticity() -> f64 {
    500.0
}

fn default_speed() -> f64 {
    1.0
}

fn default_target_fps() -> u32 {
    120
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            delay: 0.0,
            easing: default_easing(),
            elasticity: default_elasticity(),
            round: 0.0,
            speed: default_speed(),
            target_fps: default_target_fps(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document, validating the easing name
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.easing()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The default easing
    pub fn easing(&self) -> Result<Easing> {
        self.easing.parse()
    }

    /// Tween settings filled in wherever parameters leave them unset
    pub fn tween_defaults(&self) -> TweenSettings {
        let easing = self.easing().unwrap_or_else(|err| {
            tracing::warn!("{}; using the built-in default easing", err);
            Easing::EaseOutElastic
        });
        TweenSettings {
            duration: Param::Literal(self.duration),
            delay: Param::Literal(self.delay),
            easing: Param::Literal(easing),
            elasticity: Param::Literal(self.elasticity),
            round: Param::Literal(self.round),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.easing().unwrap(), Easing::EaseOutElastic);
    }

    #[test]
    fn test_partial_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            duration = 400
            easing = "easeInOutQuad"
            speed = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.duration, 400.0);
        assert_eq!(config.speed, 0.5);
        assert_eq!(config.elasticity, 500.0);
        assert_eq!(config.target_fps, 120);

        let defaults = config.tween_defaults();
        assert_eq!(defaults.duration.literal(), Some(&400.0));
        assert_eq!(defaults.easing.literal(), Some(&Easing::EaseInOutQuad));
    }

    #[test]
    fn test_unknown_easing_rejected() {
        let result = EngineConfig::from_toml_str(r#"easing = "wobbly""#);
        assert!(matches!(result, Err(Error::UnknownEasing(name)) if name == "wobbly"));
    }

    #[test]
    fn test_malformed_toml() {
        let result = EngineConfig::from_toml_str("duration = ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig {
            round: 10.0,
            ..EngineConfig::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_easing_falls_back_in_defaults() {
        let config = EngineConfig {
            easing: "nope".to_string(),
            ..EngineConfig::default()
        };
        assert_eq!(
            config.tween_defaults().easing.literal(),
            Some(&Easing::EaseOutElastic)
        );
    }
}
