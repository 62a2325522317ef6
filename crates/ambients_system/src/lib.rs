//! Host declaration interfaces for ambients (Layer 1).
//!
//! `ambients_system` provides the pieces every other crate builds on:
//!
//! - [`catalog`] - Static variant schemas and the catalog that collects them
//! - [`resource`] - Argument values, registration options, identities
//! - [`transform`] - The ordered transformation registry
//! - [`stack`] - The `Stack` engine resources are declared against
//! - [`plugin`] - Plugin trait for configuring a `Stack`
//!
//! # Architecture
//!
//! - **Layer 1** (`ambients_system`): host interfaces (this crate)
//! - **Layer 2** (`ambients_catalog`, `ambients_scope`): capabilities and scopes
//! - **Layer 3** (`ambients_transform`, plugins): the defaulting stages
//!
//! # Example
//!
//! ```
//! use ambients_system::catalog::VariantSchema;
//! use ambients_system::plugin::Plugin;
//! use ambients_system::resource::{ResourceArgs, ResourceOptions};
//! use ambients_system::stack::Stack;
//!
//! static TOPIC: VariantSchema =
//!     VariantSchema::new("TopicArgs", "azure-nextgen:eventgrid/latest:Topic", &["topicName"]);
//!
//! struct AlwaysProtect;
//!
//! impl Plugin for AlwaysProtect {
//!     fn build(&self, stack: &mut Stack) {
//!         stack
//!             .options_mut()
//!             .resource_transformations
//!             .register("always-protect", |declaration| {
//!                 let options = declaration.options.clone().protect(true);
//!                 Some(ambients_system::transform::ResourceTransformationResult::new(
//!                     declaration.args.clone(),
//!                     options,
//!                 ))
//!             })
//!             .expect("unique name");
//!     }
//! }
//!
//! let mut stack = Stack::new();
//! stack.add_plugins(AlwaysProtect);
//! stack.finish();
//!
//! let topic = stack
//!     .declare("events", ResourceArgs::new(&TOPIC), ResourceOptions::new())
//!     .unwrap();
//! assert!(topic.options().protect);
//! ```

/// Static variant schemas.
pub mod catalog;

/// Plugin trait for extensible setup.
pub mod plugin;

/// Argument values, options and identities.
pub mod resource;

/// The host declaration engine.
pub mod stack;

/// Transformation registry.
pub mod transform;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::plugin::*;
    pub use crate::resource::*;
    pub use crate::stack::*;
    pub use crate::transform::*;
}
