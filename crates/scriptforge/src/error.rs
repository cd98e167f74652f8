//! Error types for scriptforge.

use thiserror::Error;

/// Result type for scriptforge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scriptforge.
#[derive(Debug, Error)]
pub enum Error {
    /// The compilation request carried no source text.
    #[error("compilation request contains no source text")]
    EmptySource,

    /// The external compiler could not be located or spawned.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// Failed to load a compiled module.
    #[error("failed to load module: {0}")]
    ModuleLoad(#[from] libloading::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
