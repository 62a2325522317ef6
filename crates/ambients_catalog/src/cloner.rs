//! Independent copies of argument values.

use ambients_system::catalog::Catalog;
use ambients_system::resource::ResourceArgs;

use crate::error::CatalogError;

/// Produces shallow, independent copies of catalog argument values.
///
/// Field values are immutable and shared, so a copy costs one reference
/// count per set field. Writing to the copy never affects the original.
#[derive(Debug, Clone, Copy)]
pub struct ValueCloner<'a> {
    catalog: &'a Catalog,
}

impl<'a> ValueCloner<'a> {
    /// Creates a cloner for variants of `catalog`.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Copies `args` field by field into a fresh value of the same variant.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedType`] if the variant of `args` is
    /// not part of the catalog.
    pub fn clone_args(&self, args: &ResourceArgs) -> Result<ResourceArgs, CatalogError> {
        let schema = self
            .catalog
            .variant(args.variant())
            .filter(|schema| core::ptr::eq(*schema, args.schema()))
            .ok_or_else(|| CatalogError::unsupported_type(args.variant()))?;

        let mut copy = ResourceArgs::new(schema);
        for (field, value) in args.fields() {
            if let Some(value) = value {
                copy.set(field, value.clone())
                    .map_err(|_| CatalogError::unsupported_type(args.variant()))?;
            }
        }
        Ok(copy)
    }
}
