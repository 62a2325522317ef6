//! Error types for catalog operations.

use thiserror::Error;

/// Errors that can occur when working with argument values through the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The argument variant is not part of the catalog.
    #[error("Unsupported argument type: '{0}' is not in the catalog")]
    UnsupportedType(String),
}

impl CatalogError {
    /// Creates an [`UnsupportedType`](Self::UnsupportedType).
    pub fn unsupported_type(variant: impl Into<String>) -> Self {
        Self::UnsupportedType(variant.into())
    }
}
