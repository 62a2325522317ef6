//! Per-variant field capabilities.
//!
//! The [`CapabilityRegistry`] answers, for every argument variant in a
//! [`Catalog`], which of the defaultable roles (name, location, resource-group
//! reference) the variant supports and through which field. Answers are
//! computed once per variant and cached for the life of the registry.
//!
//! # Example
//!
//! ```
//! use ambients_catalog::{CapabilityRegistry, FieldRole};
//! use ambients_system::catalog::{Catalog, VariantSchema};
//!
//! static SERVER: VariantSchema = VariantSchema::new(
//!     "ServerArgs",
//!     "azure-nextgen:sql/latest:Server",
//!     &["serverName", "resourceGroupName", "location"],
//! );
//!
//! let registry = CapabilityRegistry::new(Catalog::from_variants([&SERVER]));
//! let capabilities = registry.capabilities("ServerArgs").unwrap();
//!
//! assert_eq!(capabilities.accessor(FieldRole::Name).map(|a| a.field()), Some("serverName"));
//! assert!(capabilities.supports(FieldRole::Location));
//! ```

use std::sync::Arc;

use ambients_system::catalog::{Catalog, VariantSchema};
use ambients_system::resource::{ArgsError, Input, ResourceArgs};
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::naming::{resolve_location_field, resolve_name_field, resolve_resource_group_field};

// ─────────────────────────────────────────────────────────────────────────────
// FieldRole / FieldAccessor
// ─────────────────────────────────────────────────────────────────────────────

/// A defaultable concept a variant may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// The resource's own name.
    Name,
    /// Geographic location.
    Location,
    /// Reference to the enclosing resource group.
    ResourceGroupReference,
}

impl core::fmt::Display for FieldRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let role = match self {
            Self::Name => "name",
            Self::Location => "location",
            Self::ResourceGroupReference => "resource-group",
        };
        f.write_str(role)
    }
}

/// Reads and writes one role's field on argument values of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAccessor {
    variant: &'static str,
    role: FieldRole,
    field: &'static str,
}

impl FieldAccessor {
    /// Returns the variant tag this accessor applies to.
    #[must_use]
    pub fn variant(&self) -> &'static str {
        self.variant
    }

    /// Returns the role this accessor serves.
    #[must_use]
    pub fn role(&self) -> FieldRole {
        self.role
    }

    /// Returns the declared field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the field's current value.
    #[must_use]
    pub fn get<'a>(&self, args: &'a ResourceArgs) -> Option<&'a Input> {
        args.get(self.field)
    }

    /// Returns true if the field holds a non-empty value.
    #[must_use]
    pub fn is_set(&self, args: &ResourceArgs) -> bool {
        args.is_set(self.field)
    }

    /// Writes the field.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::UnknownField`] if `args` is of a variant that
    /// does not declare the field.
    pub fn set(&self, args: &mut ResourceArgs, value: impl Into<Input>) -> Result<(), ArgsError> {
        args.set(self.field, value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// The roles supported by one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    schema: &'static VariantSchema,
    name: Option<FieldAccessor>,
    location: Option<FieldAccessor>,
    resource_group: Option<FieldAccessor>,
}

impl Capabilities {
    /// Discovers the capabilities of a schema.
    #[must_use]
    pub fn discover(schema: &'static VariantSchema) -> Self {
        let accessor = |role, field: Option<&'static str>| {
            field.map(|field| FieldAccessor {
                variant: schema.tag,
                role,
                field,
            })
        };

        Self {
            schema,
            name: accessor(FieldRole::Name, resolve_name_field(schema)),
            location: accessor(FieldRole::Location, resolve_location_field(schema)),
            resource_group: accessor(
                FieldRole::ResourceGroupReference,
                resolve_resource_group_field(schema),
            ),
        }
    }

    /// Returns the schema these capabilities describe.
    #[must_use]
    pub fn schema(&self) -> &'static VariantSchema {
        self.schema
    }

    /// Returns the accessor for `role`, or `None` if the variant lacks it.
    #[must_use]
    pub fn accessor(&self, role: FieldRole) -> Option<&FieldAccessor> {
        match role {
            FieldRole::Name => self.name.as_ref(),
            FieldRole::Location => self.location.as_ref(),
            FieldRole::ResourceGroupReference => self.resource_group.as_ref(),
        }
    }

    /// Returns true if the variant supports `role`.
    #[must_use]
    pub fn supports(&self, role: FieldRole) -> bool {
        self.accessor(role).is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CapabilityRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Thread-safe, lazily filled cache of [`Capabilities`] per variant.
#[derive(Debug)]
pub struct CapabilityRegistry {
    catalog: Catalog,
    cache: RwLock<HashMap<&'static str, Arc<Capabilities>>>,
}

impl CapabilityRegistry {
    /// Creates a registry over `catalog` with an empty cache.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the catalog this registry answers for.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the capabilities of `variant`, or `None` if the variant is not
    /// part of the catalog.
    pub fn capabilities(&self, variant: &str) -> Option<Arc<Capabilities>> {
        if let Some(cached) = self.cache.read().get(variant) {
            return Some(Arc::clone(cached));
        }

        let schema = self.catalog.variant(variant)?;
        let discovered = Arc::new(Capabilities::discover(schema));

        // Discovery is deterministic; whichever insert lands first is kept
        let mut cache = self.cache.write();
        let entry = cache.entry(schema.tag).or_insert(discovered);
        Some(Arc::clone(entry))
    }

    /// Returns the capabilities of the variant `args` belongs to.
    pub fn capabilities_of(&self, args: &ResourceArgs) -> Option<Arc<Capabilities>> {
        self.capabilities(args.variant())
    }

    /// Discovers and caches every catalog variant up front.
    pub fn warm_up(&self) {
        let mut cache = self.cache.write();
        for schema in self.catalog.variants() {
            cache
                .entry(schema.tag)
                .or_insert_with(|| Arc::new(Capabilities::discover(schema)));
        }
        tracing::debug!(variants = cache.len(), "capability cache warmed up");
    }

    /// Returns the number of variants with cached capabilities.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static VAULT: VariantSchema = VariantSchema::new(
        "VaultArgs",
        "azure-nextgen:keyvault/latest:Vault",
        &["vaultName", "resourceGroupName", "location", "properties"],
    );

    static POLICY: VariantSchema = VariantSchema::new(
        "PolicyDefinitionArgs",
        "azure-nextgen:authorization/latest:PolicyDefinition",
        &["displayName", "policyDefinitionName", "policyRule"],
    );

    fn registry() -> CapabilityRegistry {
        CapabilityRegistry::new(Catalog::from_variants([&VAULT, &POLICY]))
    }

    #[test]
    fn discovers_all_roles() {
        let capabilities = Capabilities::discover(&VAULT);

        assert_eq!(
            capabilities.accessor(FieldRole::Name).map(FieldAccessor::field),
            Some("vaultName")
        );
        assert_eq!(
            capabilities.accessor(FieldRole::Location).map(FieldAccessor::field),
            Some("location")
        );
        assert_eq!(
            capabilities
                .accessor(FieldRole::ResourceGroupReference)
                .map(FieldAccessor::field),
            Some("resourceGroupName")
        );
    }

    #[test]
    fn absent_roles_have_no_accessor() {
        let capabilities = Capabilities::discover(&POLICY);

        assert_eq!(
            capabilities.accessor(FieldRole::Name).map(FieldAccessor::field),
            Some("policyDefinitionName")
        );
        assert!(!capabilities.supports(FieldRole::Location));
        assert!(!capabilities.supports(FieldRole::ResourceGroupReference));
    }

    #[test]
    fn accessor_reads_and_writes() {
        let capabilities = Capabilities::discover(&VAULT);
        let location = *capabilities.accessor(FieldRole::Location).unwrap();
        let mut args = ResourceArgs::new(&VAULT);

        assert!(!location.is_set(&args));
        location.set(&mut args, "westus").unwrap();
        assert!(location.is_set(&args));
        assert_eq!(location.get(&args).and_then(Input::as_str), Some("westus"));
        assert_eq!(location.variant(), "VaultArgs");
        assert_eq!(location.role(), FieldRole::Location);
    }

    #[test]
    fn registry_caches_lazily() {
        let registry = registry();
        assert_eq!(registry.cached_len(), 0);

        let first = registry.capabilities("VaultArgs").unwrap();
        let second = registry.capabilities("VaultArgs").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.cached_len(), 1);
    }

    #[test]
    fn registry_returns_none_outside_catalog() {
        let registry = registry();
        assert!(registry.capabilities("WidgetArgs").is_none());
        assert_eq!(registry.cached_len(), 0);
    }

    #[test]
    fn warm_up_fills_every_variant() {
        let registry = registry();
        registry.warm_up();
        assert_eq!(registry.cached_len(), 2);
    }

    #[test]
    fn role_display() {
        assert_eq!(FieldRole::ResourceGroupReference.to_string(), "resource-group");
    }
}
