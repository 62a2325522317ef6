//! Static resource-argument catalog.
//!
//! Every resource-argument variant the host knows about is described by a
//! [`VariantSchema`]: its tag (the argument type name, e.g.
//! `"StorageAccountArgs"`), the type token of the resource it declares, the
//! [`ResourceKind`] of that resource and the ordered list of field names it
//! accepts.
//!
//! Schemas are authored as `static` tables and collected into a [`Catalog`].
//! Everything downstream (capability discovery, cloning, identity) works over
//! these tables instead of runtime type inspection.
//!
//! # Example
//!
//! ```
//! use ambients_system::catalog::{Catalog, VariantSchema};
//!
//! static STORAGE_ACCOUNT: VariantSchema = VariantSchema::new(
//!     "StorageAccountArgs",
//!     "azure-nextgen:storage/latest:StorageAccount",
//!     &["accountName", "resourceGroupName", "location", "kind"],
//! );
//!
//! let catalog = Catalog::from_variants([&STORAGE_ACCOUNT]);
//! assert!(catalog.contains("StorageAccountArgs"));
//! ```

use indexmap::IndexMap;

use crate::resource::ResourceKind;

// ─────────────────────────────────────────────────────────────────────────────
// VariantSchema
// ─────────────────────────────────────────────────────────────────────────────

/// Static description of one resource-argument variant.
#[derive(Debug, PartialEq, Eq)]
pub struct VariantSchema {
    /// Variant tag, conventionally the argument type name ending in `Args`.
    pub tag: &'static str,
    /// Type token of the resource declared with this variant.
    pub resource_type: &'static str,
    /// Kind of resource declared with this variant.
    pub kind: ResourceKind,
    /// Declared field names, in declaration order.
    pub fields: &'static [&'static str],
}

impl VariantSchema {
    /// Creates a schema for an ordinary resource.
    #[must_use]
    pub const fn new(
        tag: &'static str,
        resource_type: &'static str,
        fields: &'static [&'static str],
    ) -> Self {
        Self {
            tag,
            resource_type,
            kind: ResourceKind::Resource,
            fields,
        }
    }

    /// Overrides the resource kind declared by this variant.
    #[must_use]
    pub const fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the position of `field` in the declared field list.
    ///
    /// Matching is exact; callers that need case-insensitive matching resolve
    /// the declared name first.
    #[must_use]
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|declared| *declared == field)
    }

    /// Returns true if `field` is declared by this variant.
    #[must_use]
    pub fn declares(&self, field: &str) -> bool {
        self.field_index(field).is_some()
    }

    /// Returns the variant tag without its `Args` suffix.
    ///
    /// `"StorageAccountArgs"` becomes `"StorageAccount"`. Tags without the
    /// suffix are returned unchanged.
    #[must_use]
    pub fn base_name(&self) -> &'static str {
        let tag = self.tag;
        match tag.len().checked_sub("Args".len()) {
            Some(split)
                if tag.is_char_boundary(split)
                    && tag[split..].eq_ignore_ascii_case("Args") =>
            {
                &tag[..split]
            }
            _ => tag,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// The set of variants known to the host, keyed by tag.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    variants: IndexMap<&'static str, &'static VariantSchema>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            variants: IndexMap::new(),
        }
    }

    /// Creates a catalog from a list of schemas.
    ///
    /// # Panics
    ///
    /// Panics if two schemas share a tag.
    #[must_use]
    pub fn from_variants(variants: impl IntoIterator<Item = &'static VariantSchema>) -> Self {
        let mut catalog = Self::new();
        for schema in variants {
            catalog.register(schema);
        }
        catalog
    }

    /// Adds a schema to the catalog.
    ///
    /// # Panics
    ///
    /// Panics if a schema with the same tag is already registered.
    pub fn register(&mut self, schema: &'static VariantSchema) -> &mut Self {
        assert!(
            !self.variants.contains_key(schema.tag),
            "Variant '{}' is already registered",
            schema.tag
        );
        self.variants.insert(schema.tag, schema);
        self
    }

    /// Looks up a schema by tag.
    #[must_use]
    pub fn variant(&self, tag: &str) -> Option<&'static VariantSchema> {
        self.variants.get(tag).copied()
    }

    /// Returns true if a schema with this tag is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.variants.contains_key(tag)
    }

    /// Iterates over all schemas in registration order.
    pub fn variants(&self) -> impl Iterator<Item = &'static VariantSchema> + '_ {
        self.variants.values().copied()
    }

    /// Returns the number of registered variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns true if no variants are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BLOB_CONTAINER: VariantSchema = VariantSchema::new(
        "BlobContainerArgs",
        "azure-nextgen:storage/latest:BlobContainer",
        &["accountName", "containerName", "resourceGroupName"],
    );

    static NO_SUFFIX: VariantSchema = VariantSchema::new("Widget", "test:index:Widget", &[]);

    static PROVIDER: VariantSchema =
        VariantSchema::new("ProviderArgs", "pulumi:providers:azure-nextgen", &["subscriptionId"])
            .with_kind(ResourceKind::Provider);

    #[test]
    fn base_name_strips_args_suffix() {
        assert_eq!(BLOB_CONTAINER.base_name(), "BlobContainer");
        assert_eq!(NO_SUFFIX.base_name(), "Widget");
    }

    #[test]
    fn field_index_is_exact() {
        assert_eq!(BLOB_CONTAINER.field_index("containerName"), Some(1));
        assert_eq!(BLOB_CONTAINER.field_index("ContainerName"), None);
        assert!(!BLOB_CONTAINER.declares("location"));
    }

    #[test]
    fn with_kind_overrides_default() {
        assert_eq!(BLOB_CONTAINER.kind, ResourceKind::Resource);
        assert_eq!(PROVIDER.kind, ResourceKind::Provider);
    }

    #[test]
    fn catalog_lookup() {
        let catalog = Catalog::from_variants([&BLOB_CONTAINER, &PROVIDER]);

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("ProviderArgs"));
        assert!(!catalog.contains("Widget"));
        assert_eq!(
            catalog.variant("BlobContainerArgs").map(|s| s.resource_type),
            Some("azure-nextgen:storage/latest:BlobContainer")
        );
        let tags: Vec<_> = catalog.variants().map(|s| s.tag).collect();
        assert_eq!(tags, vec!["BlobContainerArgs", "ProviderArgs"]);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_variant_panics() {
        let _ = Catalog::from_variants([&BLOB_CONTAINER, &BLOB_CONTAINER]);
    }
}
