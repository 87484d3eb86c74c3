//! Error types shared by the coding engine and the simulation flows.

use thiserror::Error;

/// Errors produced while configuring a code, decoding, or driving a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// Code or channel parameters that cannot describe a usable code.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A vector or other externally supplied value is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal consistency check failed (e.g. a syndrome missing from a
    /// table that should be complete).
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// Console or file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An image could not be decoded or written.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Convenient alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
