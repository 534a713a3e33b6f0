//! Error types for render_forge
//!
//! This module defines the error types used throughout the crate,
//! covering failed Vulkan calls and preconditions checked in graceful mode.

use ash::vk;
use std::fmt;

/// Result type for render_forge operations
pub type Result<T> = std::result::Result<T, Error>;

/// render_forge errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Vulkan call failed with a status other than out-of-memory
    BackendError(String),

    /// Out of host or device memory
    OutOfMemory,

    /// Invalid resource (bad SPIR-V blob, missing handle, ...)
    InvalidResource(String),

    /// Initialization failed (instance, device, loaders)
    InitializationFailed(String),

    /// A precondition failed while the `graceful-assert` feature is enabled
    PreconditionFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::PreconditionFailed(msg) => write!(f, "Precondition failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<vk::Result> for Error {
    fn from(result: vk::Result) -> Self {
        match result {
            vk::Result::ERROR_OUT_OF_HOST_MEMORY | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => {
                Error::OutOfMemory
            }
            other => Error::BackendError(format!("{:?}", other)),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
