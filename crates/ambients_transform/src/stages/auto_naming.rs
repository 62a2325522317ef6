//! Auto-naming: fills the resource's name field with its logical name.

use std::sync::Arc;

use ambients_catalog::{CapabilityRegistry, FieldRole};
use ambients_system::transform::{
    ResourceTransformation, ResourceTransformationArgs, ResourceTransformationResult,
};

/// Registration name of the stage.
pub const NAME: &str = "ambients:auto-naming";

/// Sets the name field to the declared logical name when it is empty.
pub fn apply(
    registry: &CapabilityRegistry,
    declaration: &ResourceTransformationArgs,
) -> Option<ResourceTransformationResult> {
    let capabilities = super::eligible(NAME, registry, declaration)?;

    let Some(accessor) = capabilities.accessor(FieldRole::Name) else {
        tracing::debug!(
            stage = NAME,
            resource = %declaration.resource,
            variant = declaration.args.variant(),
            "no name field found"
        );
        return None;
    };

    if accessor.is_set(&declaration.args) {
        tracing::debug!(
            stage = NAME,
            resource = %declaration.resource,
            field = accessor.field(),
            "name already specified"
        );
        return None;
    }

    super::fill(
        NAME,
        registry,
        declaration,
        &[(accessor, declaration.resource.name())],
    )
}

/// Wraps [`apply`] as a registrable transformation.
#[must_use]
pub fn transformation(registry: Arc<CapabilityRegistry>) -> ResourceTransformation {
    Arc::new(move |declaration: &ResourceTransformationArgs| apply(&registry, declaration))
}
