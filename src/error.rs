//! # Error Types
//!
//! Custom error types for padcmd using `thiserror`.

use thiserror::Error;

use crate::device::DeviceId;

/// Main error type for padcmd
#[derive(Debug, Error)]
pub enum PadcmdError {
    /// Configuration names an input outside the fixed vocabulary
    #[error("unknown input name: {0}")]
    UnknownInput(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Platform gamepad layer failed to initialize
    #[error("gamepad backend error: {0}")]
    Backend(String),

    /// A controller could not be opened; logged and ignored by the registry
    #[error("unable to open controller {index}: {reason}")]
    Attach { index: usize, reason: String },

    /// Query against a device id that is no longer registered
    #[error("unknown device id: {0}")]
    UnknownDevice(DeviceId),
}

/// Result type alias for padcmd
pub type Result<T> = std::result::Result<T, PadcmdError>;
