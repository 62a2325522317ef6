//! Plugins applying the stages to a [`Stack`].
//!
//! Use [`AmbientsPlugin`] for the whole pipeline configured through an
//! [`AmbientsConfig`], or the [`AmbientPlugins`] group to pick stages by
//! type:
//!
//! ```
//! use ambients_system::catalog::Catalog;
//! use ambients_system::plugin::PluginGroup;
//! use ambients_system::stack::Stack;
//! use ambients_transform::{AmbientPlugins, AutoNamingPlugin};
//!
//! let mut stack = Stack::new();
//! stack.add_plugins(
//!     AmbientPlugins::new(Catalog::new())
//!         .build()
//!         .disable::<AutoNamingPlugin>(),
//! );
//! stack.finish();
//!
//! assert_eq!(stack.options().resource_transformations.len(), 3);
//! ```

use std::sync::Arc;

use ambients_catalog::CapabilityRegistry;
use ambients_system::catalog::Catalog;
use ambients_system::plugin::{Plugin, PluginGroup, PluginGroupBuilder};
use ambients_system::stack::Stack;
use ambients_system::transform::ResourceTransformation;

use crate::setup::{Ambients, AmbientsConfig};
use crate::stages::{auto_naming, location, resource_group, subscription};

// ─────────────────────────────────────────────────────────────────────────────
// AmbientsPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Registers the enabled stages on the stack during the build phase.
#[derive(Debug, Clone)]
pub struct AmbientsPlugin {
    ambients: Ambients,
    config: AmbientsConfig,
    warm_up: bool,
}

impl AmbientsPlugin {
    /// Creates the plugin for `catalog` with every stage enabled.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::from_ambients(Ambients::new(catalog))
    }

    /// Creates the plugin from an existing [`Ambients`].
    #[must_use]
    pub fn from_ambients(ambients: Ambients) -> Self {
        Self {
            ambients,
            config: AmbientsConfig::default(),
            warm_up: false,
        }
    }

    /// Sets which stages are registered.
    #[must_use]
    pub fn with_config(mut self, config: AmbientsConfig) -> Self {
        self.config = config;
        self
    }

    /// Discovers every variant's capabilities when the stack becomes ready
    /// instead of on first declaration.
    #[must_use]
    pub fn with_warm_up(mut self, warm_up: bool) -> Self {
        self.warm_up = warm_up;
        self
    }
}

impl Plugin for AmbientsPlugin {
    fn build(&self, stack: &mut Stack) {
        let options = core::mem::take(stack.options_mut());
        *stack.options_mut() = self.ambients.setup(&self.config, Some(options));
    }

    fn ready(&self, _stack: &mut Stack) {
        if self.warm_up {
            self.ambients.registry().warm_up();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-stage plugins
// ─────────────────────────────────────────────────────────────────────────────

fn register_stage(stack: &mut Stack, name: &'static str, stage: ResourceTransformation) {
    if stack
        .options_mut()
        .resource_transformations
        .register_shared(name, stage)
        .is_err()
    {
        tracing::warn!(stage = name, "stage already registered, keeping the first registration");
    }
}

macro_rules! stage_plugin {
    ($(#[$meta:meta])* $plugin:ident => $stage:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $plugin {
            registry: Arc<CapabilityRegistry>,
        }

        impl $plugin {
            /// Creates the plugin over a shared capability registry.
            #[must_use]
            pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
                Self { registry }
            }
        }

        impl Plugin for $plugin {
            fn build(&self, stack: &mut Stack) {
                register_stage(
                    stack,
                    $stage::NAME,
                    $stage::transformation(Arc::clone(&self.registry)),
                );
            }
        }
    };
}

stage_plugin! {
    /// Registers subscription binding.
    SubscriptionPlugin => subscription
}

stage_plugin! {
    /// Registers resource-group defaulting.
    ResourceGroupPlugin => resource_group
}

stage_plugin! {
    /// Registers location defaulting.
    LocationPlugin => location
}

stage_plugin! {
    /// Registers auto-naming.
    AutoNamingPlugin => auto_naming
}

// ─────────────────────────────────────────────────────────────────────────────
// AmbientPlugins
// ─────────────────────────────────────────────────────────────────────────────

/// One plugin per stage, in pipeline order.
///
/// Includes:
/// - [`SubscriptionPlugin`]
/// - [`ResourceGroupPlugin`]
/// - [`LocationPlugin`]
/// - [`AutoNamingPlugin`]
#[derive(Debug, Clone)]
pub struct AmbientPlugins {
    registry: Arc<CapabilityRegistry>,
}

impl AmbientPlugins {
    /// Creates the group for `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_registry(Arc::new(CapabilityRegistry::new(catalog)))
    }

    /// Creates the group over an existing registry.
    #[must_use]
    pub fn with_registry(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }
}

impl PluginGroup for AmbientPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new()
            .add(SubscriptionPlugin::new(Arc::clone(&self.registry)))
            .add(ResourceGroupPlugin::new(Arc::clone(&self.registry)))
            .add(LocationPlugin::new(Arc::clone(&self.registry)))
            .add(AutoNamingPlugin::new(self.registry))
    }
}
