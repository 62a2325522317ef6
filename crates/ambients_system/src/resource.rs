//! Resource declaration values.
//!
//! A resource declaration handed to the [`Stack`](crate::stack::Stack) is made
//! of three parts:
//!
//! - [`ResourceIdentity`] - what is being declared (type, stable name, kind)
//! - [`ResourceArgs`] - the desired state, an immutable bag of [`Input`] fields
//! - [`ResourceOptions`] - registration options such as the routing provider
//!
//! # Immutability
//!
//! Callers share [`ResourceArgs`] as `Arc<ResourceArgs>`. Nothing reachable
//! from a shared reference can change a field, so transformations that want a
//! different value must build a copy. Field values are [`Input`]s, which are
//! themselves immutable and cheap to clone, so a field-by-field copy is enough
//! to produce an independent value.

use core::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::catalog::VariantSchema;

// ─────────────────────────────────────────────────────────────────────────────
// Input
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable field value.
///
/// Cloning an `Input` shares the underlying JSON value.
#[derive(Clone, PartialEq)]
pub struct Input(Arc<Value>);

impl Input {
    /// Wraps a JSON value.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Arc::new(value.into()))
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Returns the value as a string slice, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Returns true if the value carries no information.
    ///
    /// `null` and the empty string count as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self.value() {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns true if both inputs share the same underlying value.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.value(), f)
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Self(Arc::new(value))
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<bool> for Input {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Input {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceArgs
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised when addressing a field a variant does not declare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    /// The field is not part of the variant's schema.
    #[error("variant '{variant}' does not declare a field named '{field}'")]
    UnknownField {
        /// The variant tag.
        variant: &'static str,
        /// The requested field name.
        field: String,
    },
}

/// The desired state of one resource, bound to a static [`VariantSchema`].
///
/// Values are stored positionally against the schema's field list; unset
/// fields are `None`. `ResourceArgs` does not implement `Clone`; copies are
/// produced by the value cloner in `ambients_catalog`, which checks the
/// variant against the catalog first.
///
/// # Example
///
/// ```
/// use ambients_system::catalog::VariantSchema;
/// use ambients_system::resource::ResourceArgs;
///
/// static VAULT: VariantSchema = VariantSchema::new(
///     "VaultArgs",
///     "azure-nextgen:keyvault/latest:Vault",
///     &["vaultName", "resourceGroupName", "location"],
/// );
///
/// let args = ResourceArgs::new(&VAULT).with("vaultName", "secrets");
/// assert!(args.is_set("vaultName"));
/// assert!(!args.is_set("location"));
/// ```
#[derive(PartialEq)]
pub struct ResourceArgs {
    schema: &'static VariantSchema,
    values: Vec<Option<Input>>,
}

impl ResourceArgs {
    /// Creates an argument value with no fields set.
    #[must_use]
    pub fn new(schema: &'static VariantSchema) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields.len()],
        }
    }

    /// Sets a field, builder style.
    ///
    /// # Panics
    ///
    /// Panics if the variant does not declare `field`.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<Input>) -> Self {
        if let Err(err) = self.set(field, value) {
            panic!("{err}");
        }
        self
    }

    /// Sets a field on an owned value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::UnknownField`] if the variant does not declare
    /// `field`.
    pub fn set(&mut self, field: &str, value: impl Into<Input>) -> Result<(), ArgsError> {
        let index = self.index_of(field)?;
        self.values[index] = Some(value.into());
        Ok(())
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Input> {
        self.schema
            .field_index(field)
            .and_then(|index| self.values[index].as_ref())
    }

    /// Returns true if the field holds a non-empty value.
    #[must_use]
    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).is_some_and(|input| !input.is_empty())
    }

    /// Returns the schema this value is bound to.
    #[must_use]
    pub fn schema(&self) -> &'static VariantSchema {
        self.schema
    }

    /// Returns the variant tag.
    #[must_use]
    pub fn variant(&self) -> &'static str {
        self.schema.tag
    }

    /// Iterates over every declared field and its value, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&Input>)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (*field, value.as_ref()))
    }

    fn index_of(&self, field: &str) -> Result<usize, ArgsError> {
        self.schema
            .field_index(field)
            .ok_or_else(|| ArgsError::UnknownField {
                variant: self.schema.tag,
                field: field.to_string(),
            })
    }
}

impl fmt::Debug for ResourceArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (field, value) in self.fields() {
            if let Some(value) = value {
                map.entry(&field, value);
            }
        }
        map.finish()?;
        write!(f, " as {}", self.schema.tag)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────────────────────────────────────

/// The routing target for resources of one subscription.
#[derive(Debug, PartialEq, Eq)]
pub struct ProviderResource {
    /// Logical name of the provider.
    pub name: String,
    /// Subscription the provider routes to.
    pub subscription_id: String,
}

/// A shared handle to a [`ProviderResource`].
///
/// Two handles are equal only if they point at the same provider instance.
#[derive(Debug, Clone)]
pub struct ProviderHandle(Arc<ProviderResource>);

impl ProviderHandle {
    /// Creates a handle to a new provider instance.
    #[must_use]
    pub fn new(name: impl Into<String>, subscription_id: impl Into<String>) -> Self {
        Self(Arc::new(ProviderResource {
            name: name.into(),
            subscription_id: subscription_id.into(),
        }))
    }

    /// Returns the provider's logical name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the subscription the provider routes to.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.0.subscription_id
    }
}

impl PartialEq for ProviderHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ProviderHandle {}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Registration options attached to a declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceOptions {
    /// Explicit provider routing, if any.
    pub provider: Option<ProviderHandle>,
    /// Logical name of the parent resource, if any.
    pub parent: Option<String>,
    /// Logical names of explicit dependencies.
    pub depends_on: Vec<String>,
    /// Whether the resource is protected from deletion.
    pub protect: bool,
}

impl ResourceOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes the resource through an explicit provider.
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderHandle) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the parent resource.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Adds an explicit dependency.
    #[must_use]
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    /// Marks the resource as protected.
    #[must_use]
    pub fn protect(mut self, protect: bool) -> Self {
        self.protect = protect;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceIdentity
// ─────────────────────────────────────────────────────────────────────────────

/// Coarse classification of a declared resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An ordinary resource.
    #[default]
    Resource,
    /// A resource group; defines the group other resources live in.
    ResourceGroup,
    /// A provider; routes other resources and never receives defaults.
    Provider,
}

/// What is being declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    type_token: &'static str,
    name: String,
    kind: ResourceKind,
}

impl ResourceIdentity {
    /// Creates an identity.
    #[must_use]
    pub fn new(type_token: &'static str, name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            type_token,
            name: name.into(),
            kind,
        }
    }

    /// Creates the identity of a declaration made with `schema`.
    #[must_use]
    pub fn for_variant(schema: &VariantSchema, name: impl Into<String>) -> Self {
        Self::new(schema.resource_type, name, schema.kind)
    }

    /// Returns the resource type token.
    #[must_use]
    pub fn type_token(&self) -> &'static str {
        self.type_token
    }

    /// Returns the stable logical name assigned by the host.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns true for provider resources.
    #[must_use]
    pub fn is_provider(&self) -> bool {
        self.kind == ResourceKind::Provider
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_token, self.name)
    }
}
