//! Scoped ambient defaults for infrastructure declarations.
//!
//! Open an ambient subscription, resource group or location for a region of
//! code, and every resource declared inside it picks up the value unless it
//! sets one explicitly. Names default to the declaration's logical name.
//!
//! # Example
//!
//! ```
//! use ambients::prelude::*;
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
//! assert_eq!(
//!     account.args().get("resourceGroupName").and_then(Input::as_str),
//!     Some("rg1")
//! );
//! ```

pub use ambients_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use ambients_internal::prelude::*;
}
