//! Process-wide cache of provider handles per subscription.
//!
//! Every ambient subscription routes declarations through a provider bound
//! to that subscription. Providers are created lazily, at most once per
//! subscription id, and live for the rest of the process.

use std::sync::LazyLock;

use ambients_system::resource::ProviderHandle;
use hashbrown::HashMap;
use parking_lot::RwLock;

/// Creates a provider handle for a subscription id.
type ProviderFactory = Box<dyn Fn(&str) -> ProviderHandle + Send + Sync>;

static GLOBAL: LazyLock<ProviderCache> = LazyLock::new(ProviderCache::new);

/// Subscription id → provider handle.
pub struct ProviderCache {
    providers: RwLock<HashMap<String, ProviderHandle>>,
    factory: ProviderFactory,
}

impl core::fmt::Debug for ProviderCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProviderCache")
            .field("providers", &self.len())
            .finish_non_exhaustive()
    }
}

impl Default for ProviderCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderCache {
    /// Creates an empty cache using the default provider naming.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(|subscription_id| {
            ProviderHandle::new(provider_name(subscription_id), subscription_id)
        })
    }

    /// Creates an empty cache that builds providers with `factory`.
    #[must_use]
    pub fn with_factory(factory: impl Fn(&str) -> ProviderHandle + Send + Sync + 'static) -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
            factory: Box::new(factory),
        }
    }

    /// Returns the process-wide cache.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the provider for `subscription_id`, creating it on first use.
    ///
    /// Concurrent first calls for the same id create exactly one provider.
    pub fn provider_for(&self, subscription_id: &str) -> ProviderHandle {
        if let Some(provider) = self.providers.read().get(subscription_id) {
            return provider.clone();
        }

        let mut providers = self.providers.write();
        // Another caller may have created it between the two locks
        if let Some(provider) = providers.get(subscription_id) {
            return provider.clone();
        }

        let provider = (self.factory)(subscription_id);
        tracing::info!(
            subscription = subscription_id,
            provider = provider.name(),
            "created provider for ambient subscription"
        );
        providers.insert(subscription_id.to_string(), provider.clone());
        provider
    }

    /// Returns true if a provider exists for `subscription_id`.
    #[must_use]
    pub fn contains(&self, subscription_id: &str) -> bool {
        self.providers.read().contains_key(subscription_id)
    }

    /// Returns the number of cached providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    /// Returns true if no provider was created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }
}

/// Logical name of the provider created for `subscription_id`.
#[must_use]
pub fn provider_name(subscription_id: &str) -> String {
    format!("ambients-subscription-{subscription_id}")
}
