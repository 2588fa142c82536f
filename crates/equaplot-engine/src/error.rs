//! Registry error types

use crate::definition::DefinitionId;
use thiserror::Error;

/// Result type alias using the registry error type
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors returned by registry edit operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No definition with this id is registered
    #[error("Unknown definition: {0}")]
    UnknownDefinition(DefinitionId),
}
