//! # Ambients Internal Library
//!
//! Re-exports the ambients crates for convenience.

/// Layer 1: host declaration interfaces.
pub use ambients_system;

/// Layer 2: variant capabilities and the value cloner.
pub use ambients_catalog;

/// Layer 2: scoped ambient values and the provider cache.
pub use ambients_scope;

/// Layer 3: the defaulting stages.
pub use ambients_transform;

/// Layer 3: infrastructure plugins.
pub use ambients_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use ambients_core_plugins::{TracingFormat, TracingPlugin};
    pub use ambients_scope::{
        AmbientLocation, AmbientResourceGroup, AmbientSubscription, Branch, Location,
        ResourceGroup, ScopeError, ScopedContext, Subscription, spawn,
    };
    pub use ambients_system::prelude::*;
    pub use ambients_transform::{AmbientPlugins, Ambients, AmbientsConfig, AmbientsPlugin};
}
