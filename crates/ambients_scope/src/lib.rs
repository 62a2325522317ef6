//! Call-tree scoped ambient values for ambients (Layer 2).
//!
//! - [`ScopedContext`] - Generic guard putting an [`Ambient`] value in effect
//! - [`Subscription`], [`ResourceGroup`], [`Location`] - The three axes
//! - [`Branch`] and [`spawn`] - Carrying ambient values into child tasks
//! - [`ProviderCache`] - Provider handles per subscription id
//!
//! # Example
//!
//! ```
//! use ambients_scope::{AmbientLocation, AmbientResourceGroup, ScopeError};
//!
//! let mut location = AmbientLocation::new("westus").unwrap();
//! assert_eq!(AmbientLocation::current().unwrap().as_str(), "westus");
//!
//! // A resource group fixes the location, so the two cannot nest that way.
//! let group = AmbientResourceGroup::new("rg1", "westus").unwrap();
//! assert!(matches!(AmbientLocation::new("eastus"), Err(ScopeError::ConflictingScope(_))));
//!
//! drop(group);
//! location.release().unwrap();
//! assert!(AmbientLocation::current().is_none());
//! ```

mod axes;
mod branch;
mod context;
mod error;
mod provider_cache;

pub use axes::{
    AmbientLocation, AmbientResourceGroup, AmbientSubscription, Location, ResourceGroup,
    Subscription,
};
pub use branch::{Branch, spawn};
pub use context::{Ambient, AxisId, ScopedContext};
pub use error::ScopeError;
pub use provider_cache::{ProviderCache, provider_name};
