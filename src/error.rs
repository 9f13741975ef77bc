//! Global error handling for pagedump
//!
//! This module provides a centralized error type that can represent errors
//! from the extraction pipeline as well as from its collaborators.

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::provider::ProviderError;
use crate::types::NodeId;

/// Global error type for pagedump operations
#[derive(Error, Debug)]
pub enum PageDumpError {
    /// The snapshot's root id has no matching node
    #[error("Root node {0} not found in snapshot")]
    MissingRoot(NodeId),

    /// A child id is unresolved, revisited or duplicated
    #[error("Malformed tree: {0}")]
    MalformedTree(String),

    /// Traversal finished without producing any text
    #[error("Nothing extracted")]
    EmptyResult,

    /// Snapshot provider errors
    #[error("Snapshot provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PageDumpError {
    /// Whether this outcome means "nothing to do" rather than a failure
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::EmptyResult)
    }
}

/// Specialized Result type for pagedump operations
pub type Result<T> = std::result::Result<T, PageDumpError>;

/// Creates a PageDumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::PageDumpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Lets the binary's main return io::Result like the rest of its plumbing
impl From<PageDumpError> for io::Error {
    fn from(err: PageDumpError) -> Self {
        io::Error::new(io::ErrorKind::Other, err.to_string())
    }
}
