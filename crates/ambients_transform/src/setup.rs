//! Registering the stages on stack options.

use std::sync::Arc;

use ambients_catalog::CapabilityRegistry;
use ambients_system::catalog::Catalog;
use ambients_system::stack::StackOptions;
use ambients_system::transform::ResourceTransformation;

use crate::stages::{auto_naming, location, resource_group, subscription};

// ─────────────────────────────────────────────────────────────────────────────
// AmbientsConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Which stages [`Ambients::setup`] registers.
///
/// Every stage is enabled by default.
///
/// # Example
///
/// ```
/// use ambients_transform::AmbientsConfig;
///
/// let config = AmbientsConfig::default().disable_auto_naming();
/// assert!(config.disable_auto_naming);
/// assert!(!config.disable_location);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmbientsConfig {
    /// Skip subscription binding.
    pub disable_subscription: bool,
    /// Skip resource-group defaulting.
    pub disable_resource_group: bool,
    /// Skip location defaulting.
    pub disable_location: bool,
    /// Skip auto-naming.
    pub disable_auto_naming: bool,
}

impl AmbientsConfig {
    /// Creates a config with every stage enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables subscription binding.
    #[must_use]
    pub fn disable_subscription(mut self) -> Self {
        self.disable_subscription = true;
        self
    }

    /// Disables resource-group defaulting.
    #[must_use]
    pub fn disable_resource_group(mut self) -> Self {
        self.disable_resource_group = true;
        self
    }

    /// Disables location defaulting.
    #[must_use]
    pub fn disable_location(mut self) -> Self {
        self.disable_location = true;
        self
    }

    /// Disables auto-naming.
    #[must_use]
    pub fn disable_auto_naming(mut self) -> Self {
        self.disable_auto_naming = true;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ambients
// ─────────────────────────────────────────────────────────────────────────────

/// Entry point wiring the stages for one catalog.
#[derive(Debug, Clone)]
pub struct Ambients {
    registry: Arc<CapabilityRegistry>,
}

impl Ambients {
    /// Creates the stages for `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_registry(Arc::new(CapabilityRegistry::new(catalog)))
    }

    /// Creates the stages over an existing registry.
    #[must_use]
    pub fn with_registry(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the capability registry shared by the stages.
    #[must_use]
    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }

    /// Returns the enabled stages with their registration names, in order.
    #[must_use]
    pub fn stages(&self, config: &AmbientsConfig) -> Vec<(&'static str, ResourceTransformation)> {
        let registry = &self.registry;
        let all: [(bool, &'static str, fn(Arc<CapabilityRegistry>) -> ResourceTransformation); 4] = [
            (config.disable_subscription, subscription::NAME, subscription::transformation),
            (config.disable_resource_group, resource_group::NAME, resource_group::transformation),
            (config.disable_location, location::NAME, location::transformation),
            (config.disable_auto_naming, auto_naming::NAME, auto_naming::transformation),
        ];

        all.into_iter()
            .filter(|(disabled, _, _)| !disabled)
            .map(|(_, name, make)| (name, make(Arc::clone(registry))))
            .collect()
    }

    /// Appends the enabled stages to `options` (or to fresh options) in the
    /// order subscription, resource group, location, auto-naming.
    ///
    /// A stage whose name is already registered is left in place, so applying
    /// the setup twice registers each stage once. The stage registered first
    /// keeps its catalog and its position: a later setup over another catalog
    /// only adds the stages that were missing, and logs a `warn` for each one
    /// it skips.
    #[must_use]
    pub fn setup(&self, config: &AmbientsConfig, options: Option<StackOptions>) -> StackOptions {
        let mut options = options.unwrap_or_default();
        for (name, stage) in self.stages(config) {
            if options.resource_transformations.register_shared(name, stage).is_err() {
                tracing::warn!(
                    stage = name,
                    variants = self.registry.catalog().len(),
                    "stage already registered, keeping the first registration"
                );
            }
        }
        tracing::info!(
            stages = ?options.resource_transformations.names(),
            "ambient defaults configured"
        );
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambients() -> Ambients {
        Ambients::new(Catalog::new())
    }

    #[test]
    fn default_registers_all_in_order() {
        let options = ambients().setup(&AmbientsConfig::default(), None);
        assert_eq!(
            options.resource_transformations.names(),
            vec![
                "ambients:subscription",
                "ambients:resource-group",
                "ambients:location",
                "ambients:auto-naming",
            ]
        );
    }

    #[test]
    fn disabled_stages_are_left_out() {
        let config = AmbientsConfig::new()
            .disable_subscription()
            .disable_location();
        let options = ambients().setup(&config, None);

        assert_eq!(
            options.resource_transformations.names(),
            vec!["ambients:resource-group", "ambients:auto-naming"]
        );
    }

    #[test]
    fn all_disabled_registers_nothing() {
        let config = AmbientsConfig::new()
            .disable_subscription()
            .disable_resource_group()
            .disable_location()
            .disable_auto_naming();
        assert!(ambients().setup(&config, None).resource_transformations.is_empty());
    }

    #[test]
    fn appends_after_existing_transformations() {
        let mut existing = StackOptions::new();
        existing
            .resource_transformations
            .register("user:first", |_| None)
            .unwrap();

        let config = AmbientsConfig::new().disable_resource_group();
        let options = ambients().setup(&config, Some(existing));
        assert_eq!(
            options.resource_transformations.names(),
            vec![
                "user:first",
                "ambients:subscription",
                "ambients:location",
                "ambients:auto-naming",
            ]
        );
    }

    #[test]
    fn second_setup_only_adds_missing_stages() {
        let ambients = ambients();
        let first = ambients.setup(&AmbientsConfig::new().disable_subscription(), None);
        let second = ambients.setup(&AmbientsConfig::default(), Some(first));

        assert_eq!(
            second.resource_transformations.names(),
            vec![
                "ambients:resource-group",
                "ambients:location",
                "ambients:auto-naming",
                "ambients:subscription",
            ]
        );
    }

    #[test]
    fn setup_twice_registers_once() {
        let ambients = ambients();
        let once = ambients.setup(&AmbientsConfig::default(), None);
        let twice = ambients.setup(&AmbientsConfig::default(), Some(once));
        assert_eq!(twice.resource_transformations.len(), 4);
    }
}
