//! Error types for Equaplot geometry

use thiserror::Error;

/// Result type alias using the geometry Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in geometry operations
///
/// Generation itself never fails; bad samples degrade to flat geometry.
/// These cover the operations around it.
#[derive(Error, Debug)]
pub enum Error {
    /// Export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
