//! The three ambient axes: subscription, resource group and location.
//!
//! Value constructors reject blank identifiers with
//! [`ScopeError::InvalidInput`]. Location and subscription scopes cannot be
//! opened while a resource-group scope is in effect; a resource group fixes
//! both.

use std::sync::{Arc, OnceLock};

use ambients_system::resource::{Input, ProviderHandle, ResourceKind};
use ambients_system::stack::RegisteredResource;

use crate::context::{Ambient, AxisId, ScopedContext};
use crate::error::ScopeError;
use crate::provider_cache::ProviderCache;

// ─────────────────────────────────────────────────────────────────────────────
// Subscription
// ─────────────────────────────────────────────────────────────────────────────

/// Where a [`Subscription`] looks up its provider.
#[derive(Debug, Clone)]
enum CacheSource {
    Global,
    Shared(Arc<ProviderCache>),
}

impl CacheSource {
    fn cache(&self) -> &ProviderCache {
        match self {
            Self::Global => ProviderCache::global(),
            Self::Shared(cache) => cache,
        }
    }
}

/// The subscription declarations are routed to.
///
/// The provider is looked up when the subscription is opened as a scope (or
/// on the first call to [`provider`](Self::provider)), so a scope that fails
/// to open never creates one.
#[derive(Debug, Clone)]
pub struct Subscription {
    subscription_id: String,
    source: CacheSource,
    provider: OnceLock<ProviderHandle>,
}

impl Subscription {
    /// Creates a subscription resolved through the process-wide cache.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInput`] if the id is blank.
    pub fn new(subscription_id: impl Into<String>) -> Result<Self, ScopeError> {
        Self::from_source(subscription_id, CacheSource::Global)
    }

    /// Creates a subscription resolved through `cache`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInput`] if the id is blank.
    pub fn with_cache(
        subscription_id: impl Into<String>,
        cache: Arc<ProviderCache>,
    ) -> Result<Self, ScopeError> {
        Self::from_source(subscription_id, CacheSource::Shared(cache))
    }

    fn from_source(
        subscription_id: impl Into<String>,
        source: CacheSource,
    ) -> Result<Self, ScopeError> {
        let subscription_id = subscription_id.into();
        ScopeError::require_non_blank("subscription id", &subscription_id)?;
        Ok(Self {
            subscription_id,
            source,
            provider: OnceLock::new(),
        })
    }

    /// Returns the subscription id.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Returns the provider bound to this subscription.
    pub fn provider(&self) -> &ProviderHandle {
        self.provider
            .get_or_init(|| self.source.cache().provider_for(&self.subscription_id))
    }

    /// Returns true once the provider was looked up.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.provider.get().is_some()
    }
}

impl Ambient for Subscription {
    const AXIS: &'static str = "subscription";

    fn blocked_by() -> Vec<AxisId> {
        vec![AxisId::of::<ResourceGroup>()]
    }

    fn opened(&self) {
        self.provider();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceGroup
// ─────────────────────────────────────────────────────────────────────────────

/// The resource group declarations are placed in, with its optional location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    name: String,
    location: Option<String>,
}

impl ResourceGroup {
    /// A resource group with a location.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInput`] if the name or location is blank.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Result<Self, ScopeError> {
        let location = location.into();
        ScopeError::require_non_blank("resource group location", &location)?;
        let mut group = Self::without_location(name)?;
        group.location = Some(location);
        Ok(group)
    }

    /// A resource group without a location.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInput`] if the name is blank.
    pub fn without_location(name: impl Into<String>) -> Result<Self, ScopeError> {
        let name = name.into();
        ScopeError::require_non_blank("resource group name", &name)?;
        Ok(Self {
            name,
            location: None,
        })
    }

    /// Uses a resource group that was already declared on a stack.
    ///
    /// The group name is read from its `resourceGroupName` argument (the
    /// declared logical name when unset), the location from `location`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInput`] if `resource` is not a resource
    /// group or its name or location is blank.
    pub fn from_registered(resource: &RegisteredResource) -> Result<Self, ScopeError> {
        if resource.identity().kind() != ResourceKind::ResourceGroup {
            return Err(ScopeError::invalid_input(format!(
                "'{}' is not a resource group",
                resource.identity()
            )));
        }

        let field = |wanted: &str| {
            resource
                .args()
                .fields()
                .find(|(field, _)| field.eq_ignore_ascii_case(wanted))
                .and_then(|(_, value)| value.filter(|value| !value.is_empty()))
                .and_then(Input::as_str)
                .map(str::to_string)
        };

        let name = field("ResourceGroupName").unwrap_or_else(|| resource.name().to_string());
        match field("Location") {
            Some(location) => Self::new(name, location),
            None => Self::without_location(name),
        }
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the group location, if it has one.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl Ambient for ResourceGroup {
    const AXIS: &'static str = "resource group";
}

// ─────────────────────────────────────────────────────────────────────────────
// Location
// ─────────────────────────────────────────────────────────────────────────────

/// The geographic location declarations are placed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(String);

impl Location {
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInput`] if the location is blank.
    pub fn new(location: impl Into<String>) -> Result<Self, ScopeError> {
        let location = location.into();
        ScopeError::require_non_blank("location", &location)?;
        Ok(Self(location))
    }

    /// Returns the location name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ambient for Location {
    const AXIS: &'static str = "location";

    fn blocked_by() -> Vec<AxisId> {
        vec![AxisId::of::<ResourceGroup>()]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scope aliases
// ─────────────────────────────────────────────────────────────────────────────

/// Guard for an ambient [`Subscription`].
pub type AmbientSubscription = ScopedContext<Subscription>;

/// Guard for an ambient [`ResourceGroup`].
pub type AmbientResourceGroup = ScopedContext<ResourceGroup>;

/// Guard for an ambient [`Location`].
pub type AmbientLocation = ScopedContext<Location>;

impl ScopedContext<Subscription> {
    /// Opens an ambient subscription.
    ///
    /// # Errors
    ///
    /// See [`Subscription::new`] and [`ScopedContext::open`].
    pub fn new(subscription_id: impl Into<String>) -> Result<Self, ScopeError> {
        Self::open(Subscription::new(subscription_id)?)
    }
}

impl ScopedContext<ResourceGroup> {
    /// Opens an ambient resource group with a location.
    ///
    /// # Errors
    ///
    /// See [`ResourceGroup::new`] and [`ScopedContext::open`].
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Result<Self, ScopeError> {
        Self::open(ResourceGroup::new(name, location)?)
    }

    /// Opens an ambient resource group without a location.
    ///
    /// # Errors
    ///
    /// See [`ResourceGroup::without_location`] and [`ScopedContext::open`].
    pub fn without_location(name: impl Into<String>) -> Result<Self, ScopeError> {
        Self::open(ResourceGroup::without_location(name)?)
    }
}

impl ScopedContext<Location> {
    /// Opens an ambient location.
    ///
    /// # Errors
    ///
    /// See [`Location::new`] and [`ScopedContext::open`].
    pub fn new(location: impl Into<String>) -> Result<Self, ScopeError> {
        Self::open(Location::new(location)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambients_system::catalog::VariantSchema;
    use ambients_system::resource::{ResourceArgs, ResourceOptions};
    use ambients_system::stack::Stack;

    static GROUP: VariantSchema = VariantSchema::new(
        "ResourceGroupArgs",
        "azure-nextgen:resources/latest:ResourceGroup",
        &["resourceGroupName", "location"],
    )
    .with_kind(ResourceKind::ResourceGroup);

    static VAULT: VariantSchema =
        VariantSchema::new("VaultArgs", "azure-nextgen:keyvault/latest:Vault", &["vaultName"]);

    #[test]
    fn blank_identifiers_are_invalid_input() {
        assert!(matches!(Subscription::new("  "), Err(ScopeError::InvalidInput(_))));
        assert!(matches!(ResourceGroup::without_location(""), Err(ScopeError::InvalidInput(_))));
        assert!(matches!(ResourceGroup::new("rg", "\t"), Err(ScopeError::InvalidInput(_))));
        assert!(matches!(Location::new(""), Err(ScopeError::InvalidInput(_))));
        assert!(matches!(AmbientLocation::new(" "), Err(ScopeError::InvalidInput(_))));
        assert!(AmbientLocation::current().is_none());
    }

    #[test]
    fn subscription_uses_cache() {
        let cache = Arc::new(ProviderCache::new());
        let a = Subscription::with_cache("sub-1", Arc::clone(&cache)).unwrap();
        let b = Subscription::with_cache("sub-1", Arc::clone(&cache)).unwrap();
        assert!(cache.is_empty());

        assert_eq!(a.provider(), b.provider());
        assert_eq!(a.subscription_id(), "sub-1");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn opening_resolves_provider() {
        let cache = Arc::new(ProviderCache::new());
        let scope =
            ScopedContext::open(Subscription::with_cache("sub-open", Arc::clone(&cache)).unwrap())
                .unwrap();

        assert!(scope.value().is_resolved());
        assert!(cache.contains("sub-open"));
    }

    #[test]
    fn rejected_subscription_creates_no_provider() {
        let cache = Arc::new(ProviderCache::new());
        let _group = AmbientResourceGroup::new("rg1", "westus").unwrap();

        let result =
            ScopedContext::open(Subscription::with_cache("sub-rejected", Arc::clone(&cache)).unwrap());
        assert!(matches!(result, Err(ScopeError::ConflictingScope(_))));
        assert!(cache.is_empty());

        assert!(matches!(
            AmbientSubscription::new("sub-rejected-global"),
            Err(ScopeError::ConflictingScope(_))
        ));
        assert!(!ProviderCache::global().contains("sub-rejected-global"));
    }

    #[test]
    fn resource_group_blocks_location_and_subscription() {
        let _group = AmbientResourceGroup::new("rg1", "westus").unwrap();

        assert!(matches!(AmbientLocation::new("eastus"), Err(ScopeError::ConflictingScope(_))));
        assert!(matches!(
            AmbientSubscription::new("sub-1"),
            Err(ScopeError::ConflictingScope(_))
        ));
    }

    #[test]
    fn resource_group_opens_under_location_and_subscription() {
        let _subscription = AmbientSubscription::new("sub-1").unwrap();
        let _location = AmbientLocation::new("eastus").unwrap();
        let group = AmbientResourceGroup::without_location("rg1").unwrap();

        assert_eq!(group.value().location(), None);
        assert_eq!(AmbientResourceGroup::current().unwrap().name(), "rg1");
    }

    #[test]
    fn from_registered_reads_arguments() {
        let stack = Stack::new();
        let declared = stack
            .declare(
                "rg",
                ResourceArgs::new(&GROUP)
                    .with("resourceGroupName", "rg-prod")
                    .with("location", "westeurope"),
                ResourceOptions::new(),
            )
            .unwrap();

        let group = ResourceGroup::from_registered(&declared).unwrap();
        assert_eq!(group.name(), "rg-prod");
        assert_eq!(group.location(), Some("westeurope"));
    }

    #[test]
    fn from_registered_falls_back_to_declared_name() {
        let stack = Stack::new();
        let declared = stack
            .declare("rg-logical", ResourceArgs::new(&GROUP), ResourceOptions::new())
            .unwrap();

        let group = ResourceGroup::from_registered(&declared).unwrap();
        assert_eq!(group.name(), "rg-logical");
        assert_eq!(group.location(), None);
    }

    #[test]
    fn from_registered_rejects_other_resources() {
        let stack = Stack::new();
        let declared = stack
            .declare("kv", ResourceArgs::new(&VAULT), ResourceOptions::new())
            .unwrap();

        assert!(matches!(
            ResourceGroup::from_registered(&declared),
            Err(ScopeError::InvalidInput(_))
        ));
    }
}
