//! Error taxonomy shared by every Ignite service

use thiserror::Error;

/// Errors reported by the animation registry, attribute store and render context
#[derive(Error, Debug)]
pub enum ThemeError {
    /// Render context used before `initialize`, or without a bound render target
    #[error("render context not initialized")]
    NotInitialized,

    /// Null or dead window handle, or an out-of-range value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A fixed-capacity table (animations, snapped windows) is full
    #[error("registry full ({capacity} entries)")]
    RegistryFull { capacity: usize },

    /// A graphics device or factory could not be created
    #[error("device acquisition failed at {stage}: {reason}")]
    DeviceAcquisitionFailed { stage: &'static str, reason: String },

    /// Capability exists in the API but is switched off by policy
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// A process-wide service was started twice
    #[error("{0} already initialized")]
    AlreadyInitialized(&'static str),

    /// Config file could not be parsed or serialized
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for Ignite operations
pub type Result<T> = std::result::Result<T, ThemeError>;
