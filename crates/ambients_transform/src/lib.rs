//! Ambient defaulting stages for ambients stacks (Layer 3).
//!
//! Four stages patch declarations with the ambient values in effect:
//!
//! 1. subscription binding attaches the subscription's provider
//! 2. resource-group defaulting fills the group reference and location
//! 3. location defaulting fills the location
//! 4. auto-naming fills the name from the logical name
//!
//! Register them with [`Ambients::setup`] on [`StackOptions`], or add
//! [`AmbientsPlugin`] / [`AmbientPlugins`] to a [`Stack`].
//!
//! # Example
//!
//! ```
//! use ambients_scope::AmbientResourceGroup;
//! use ambients_system::catalog::{Catalog, VariantSchema};
//! use ambients_system::resource::{Input, ResourceArgs, ResourceOptions};
//! use ambients_system::stack::Stack;
//! use ambients_transform::AmbientsPlugin;
//!
//! static STORAGE_ACCOUNT: VariantSchema = VariantSchema::new(
//!     "StorageAccountArgs",
//!     "azure-nextgen:storage/latest:StorageAccount",
//!     &["accountName", "resourceGroupName", "location"],
//! );
//!
//! let mut stack = Stack::new();
//! stack.add_plugins(AmbientsPlugin::new(Catalog::from_variants([&STORAGE_ACCOUNT])));
//! stack.finish();
//!
//! let _group = AmbientResourceGroup::new("rg1", "westus").unwrap();
//! let account = stack
//!     .declare("sa", ResourceArgs::new(&STORAGE_ACCOUNT), ResourceOptions::new())
//!     .unwrap();
//!
//! let field = |name| account.args().get(name).and_then(Input::as_str);
//! assert_eq!(field("resourceGroupName"), Some("rg1"));
//! assert_eq!(field("location"), Some("westus"));
//! assert_eq!(field("accountName"), Some("sa"));
//! ```
//!
//! [`StackOptions`]: ambients_system::stack::StackOptions
//! [`Stack`]: ambients_system::stack::Stack

mod plugin;
mod setup;
pub mod stages;

pub use plugin::{
    AmbientPlugins, AmbientsPlugin, AutoNamingPlugin, LocationPlugin, ResourceGroupPlugin,
    SubscriptionPlugin,
};
pub use setup::{Ambients, AmbientsConfig};
