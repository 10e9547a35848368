//! Animation error types
//!
//! Playback itself never fails; these surface only where text is parsed or
//! configuration is loaded.

use thiserror::Error;

/// Errors raised at parse and load boundaries
#[derive(Error, Debug)]
pub enum Error {
    /// Easing name not in the preset table
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),

    /// Cubic-Bézier x control points outside [0, 1]
    #[error("Cubic bezier x control points must lie in [0, 1], got x1={x1}, x2={x2}")]
    InvalidBezier { x1: f64, x2: f64 },

    /// Malformed timeline offset
    #[error("Invalid timeline offset: {0}")]
    InvalidOffset(String),

    /// Malformed engine configuration
    #[error("Invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Engine configuration could not be serialized
    #[error("Failed to serialize engine configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading a configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The global scheduler has not been installed
    #[error("Animation scheduler not initialized; call set_global_scheduler() at startup")]
    SchedulerNotInitialized,
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, Error>;
