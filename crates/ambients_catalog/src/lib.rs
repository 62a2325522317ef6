//! Field capabilities and argument cloning for ambients (Layer 2).
//!
//! Everything here works over the static [`VariantSchema`] tables of a
//! [`Catalog`]:
//!
//! - [`naming`] - Pure functions picking the field that plays a role
//! - [`CapabilityRegistry`] - Cached per-variant [`Capabilities`]
//! - [`ValueCloner`] - Independent copies of argument values
//!
//! [`VariantSchema`]: ambients_system::catalog::VariantSchema
//! [`Catalog`]: ambients_system::catalog::Catalog

mod capabilities;
mod cloner;
mod error;
pub mod naming;

pub use capabilities::{Capabilities, CapabilityRegistry, FieldAccessor, FieldRole};
pub use cloner::ValueCloner;
pub use error::CatalogError;
