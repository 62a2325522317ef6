//! Resource transformations.
//!
//! A transformation is a synchronous function the [`Stack`](crate::stack::Stack)
//! runs on every declaration before recording it. It receives the pending
//! declaration and either returns `None` (leave it as is) or a
//! [`ResourceTransformationResult`] that replaces the argument value and the
//! options for the next transformation in line.
//!
//! # Design Principles
//!
//! - Transformations execute in registration order
//! - Each transformation sees the output of the previous one
//! - A transformation never mutates the values it is given
//!
//! # Example
//!
//! ```
//! use ambients_system::resource::ResourceOptions;
//! use ambients_system::transform::{ResourceTransformationResult, ResourceTransformations};
//!
//! let mut transformations = ResourceTransformations::new();
//! transformations
//!     .register("protect-everything", |declaration| {
//!         if declaration.options.protect {
//!             return None;
//!         }
//!         let options = declaration.options.clone().protect(true);
//!         Some(ResourceTransformationResult::new(declaration.args.clone(), options))
//!     })
//!     .expect("unique name");
//!
//! assert!(transformations.contains("protect-everything"));
//! ```

use std::sync::Arc;

use crate::resource::{ResourceArgs, ResourceIdentity, ResourceOptions};

// ─────────────────────────────────────────────────────────────────────────────
// Arguments and Results
// ─────────────────────────────────────────────────────────────────────────────

/// A pending declaration as seen by a transformation.
#[derive(Debug)]
pub struct ResourceTransformationArgs {
    /// What is being declared.
    pub resource: ResourceIdentity,
    /// The current argument value.
    pub args: Arc<ResourceArgs>,
    /// The current registration options.
    pub options: ResourceOptions,
}

impl ResourceTransformationArgs {
    /// Creates a pending declaration.
    #[must_use]
    pub fn new(resource: ResourceIdentity, args: Arc<ResourceArgs>, options: ResourceOptions) -> Self {
        Self {
            resource,
            args,
            options,
        }
    }
}

/// Replacement argument value and options produced by a transformation.
#[derive(Debug)]
pub struct ResourceTransformationResult {
    /// The replacement argument value.
    pub args: Arc<ResourceArgs>,
    /// The replacement registration options.
    pub options: ResourceOptions,
}

impl ResourceTransformationResult {
    /// Creates a replacement.
    #[must_use]
    pub fn new(args: Arc<ResourceArgs>, options: ResourceOptions) -> Self {
        Self { args, options }
    }
}

/// A shareable transformation function.
pub type ResourceTransformation = Arc<
    dyn Fn(&ResourceTransformationArgs) -> Option<ResourceTransformationResult> + Send + Sync,
>;

// ─────────────────────────────────────────────────────────────────────────────
// TransformationRegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during transformation registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformationRegistrationError {
    /// A transformation with this name is already registered.
    #[error("transformation '{name}' is already registered")]
    DuplicateName {
        /// The duplicate name.
        name: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceTransformations
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the transformation list.
#[derive(Clone)]
struct TransformationEntry {
    /// Human-readable name for debugging and logging.
    name: String,
    /// The transformation function.
    transformation: ResourceTransformation,
}

/// Ordered, name-keyed list of transformations.
///
/// The list is part of [`StackOptions`](crate::stack::StackOptions); plugins
/// and setup helpers append to it before the stack starts accepting
/// declarations.
#[derive(Clone, Default)]
pub struct ResourceTransformations {
    entries: Vec<TransformationEntry>,
}

impl core::fmt::Debug for ResourceTransformations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceTransformations")
            .field("entries", &self.names())
            .finish()
    }
}

impl ResourceTransformations {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a transformation.
    ///
    /// # Errors
    ///
    /// Returns [`TransformationRegistrationError::DuplicateName`] if a
    /// transformation with the same name is already registered.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        transformation: F,
    ) -> Result<&mut Self, TransformationRegistrationError>
    where
        F: Fn(&ResourceTransformationArgs) -> Option<ResourceTransformationResult>
            + Send
            + Sync
            + 'static,
    {
        self.register_shared(name, Arc::new(transformation))
    }

    /// Appends an already shared transformation.
    ///
    /// # Errors
    ///
    /// Returns [`TransformationRegistrationError::DuplicateName`] if a
    /// transformation with the same name is already registered.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        transformation: ResourceTransformation,
    ) -> Result<&mut Self, TransformationRegistrationError> {
        let name = name.into();

        if self.contains(&name) {
            return Err(TransformationRegistrationError::DuplicateName { name });
        }

        self.entries.push(TransformationEntry {
            name,
            transformation,
        });
        Ok(self)
    }

    /// Threads a declaration through every transformation in order.
    ///
    /// Each transformation receives the output of the previous one; a `None`
    /// result leaves the declaration untouched for the next transformation.
    #[must_use]
    pub fn apply(&self, mut declaration: ResourceTransformationArgs) -> ResourceTransformationArgs {
        for entry in &self.entries {
            if let Some(result) = (entry.transformation)(&declaration) {
                tracing::trace!(
                    transformation = %entry.name,
                    resource = %declaration.resource,
                    "transformation replaced declaration"
                );
                declaration.args = result.args;
                declaration.options = result.options;
            }
        }
        declaration
    }

    /// Returns the number of registered transformations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no transformations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks if a transformation with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Returns the registered names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }
}
