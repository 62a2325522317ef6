//! The defaulting stages, in the order they run.
//!
//! | Stage | Fills | Needs |
//! |-------|-------|-------|
//! | [`subscription`] | options provider | ambient subscription |
//! | [`resource_group`] | group reference, location | ambient resource group |
//! | [`location`] | location | ambient location, no ambient group |
//! | [`auto_naming`] | name | nothing |
//!
//! Every stage leaves provider resources and variants outside the catalog
//! alone, and never overwrites a field that is already set.

use std::sync::Arc;

use ambients_catalog::{Capabilities, CapabilityRegistry, FieldAccessor, ValueCloner};
use ambients_system::transform::{ResourceTransformationArgs, ResourceTransformationResult};

pub mod auto_naming;
pub mod location;
pub mod resource_group;
pub mod subscription;

/// Returns the declared variant's capabilities, or `None` if `stage` must not
/// touch the declaration.
pub(crate) fn eligible(
    stage: &'static str,
    registry: &CapabilityRegistry,
    declaration: &ResourceTransformationArgs,
) -> Option<Arc<Capabilities>> {
    if declaration.resource.is_provider() {
        tracing::debug!(stage, resource = %declaration.resource, "skipping provider resource");
        return None;
    }

    let capabilities = registry
        .capabilities_of(&declaration.args)
        .filter(|capabilities| core::ptr::eq(capabilities.schema(), declaration.args.schema()));

    if capabilities.is_none() {
        tracing::debug!(
            stage,
            resource = %declaration.resource,
            variant = declaration.args.variant(),
            "skipping variant outside the catalog"
        );
    }
    capabilities
}

/// Copies the declaration's arguments and writes `assignments` into the copy.
///
/// The options are passed through unchanged. A copy that cannot be made is
/// logged and leaves the declaration as it was.
pub(crate) fn fill(
    stage: &'static str,
    registry: &CapabilityRegistry,
    declaration: &ResourceTransformationArgs,
    assignments: &[(&FieldAccessor, &str)],
) -> Option<ResourceTransformationResult> {
    let mut args = match ValueCloner::new(registry.catalog()).clone_args(&declaration.args) {
        Ok(args) => args,
        Err(error) => {
            tracing::warn!(stage, resource = %declaration.resource, %error, "could not copy arguments");
            return None;
        }
    };

    for (accessor, value) in assignments {
        if let Err(error) = accessor.set(&mut args, *value) {
            tracing::warn!(stage, resource = %declaration.resource, %error, "could not set default");
            return None;
        }
    }

    tracing::debug!(
        stage,
        resource = %declaration.resource,
        fields = ?assignments.iter().map(|(accessor, _)| accessor.field()).collect::<Vec<_>>(),
        "applied ambient defaults"
    );

    Some(ResourceTransformationResult::new(
        Arc::new(args),
        declaration.options.clone(),
    ))
}
