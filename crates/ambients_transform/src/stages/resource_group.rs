//! Resource-group defaulting: places declarations in the ambient resource
//! group and, when the group has one, its location.

use std::sync::Arc;

use ambients_catalog::{CapabilityRegistry, FieldRole};
use ambients_scope::AmbientResourceGroup;
use ambients_system::resource::ResourceKind;
use ambients_system::transform::{
    ResourceTransformation, ResourceTransformationArgs, ResourceTransformationResult,
};

/// Registration name of the stage.
pub const NAME: &str = "ambients:resource-group";

/// Fills the resource-group reference and the location, each independently,
/// when supported and empty.
pub fn apply(
    registry: &CapabilityRegistry,
    declaration: &ResourceTransformationArgs,
) -> Option<ResourceTransformationResult> {
    let group = AmbientResourceGroup::current()?;
    let capabilities = super::eligible(NAME, registry, declaration)?;

    if declaration.resource.kind() == ResourceKind::ResourceGroup {
        tracing::debug!(stage = NAME, resource = %declaration.resource, "skipping resource group");
        return None;
    }

    let args = &declaration.args;
    let mut assignments = Vec::with_capacity(2);

    if let Some(accessor) = capabilities.accessor(FieldRole::ResourceGroupReference) {
        if accessor.is_set(args) {
            tracing::debug!(
                stage = NAME,
                resource = %declaration.resource,
                field = accessor.field(),
                "resource group already specified"
            );
        } else {
            assignments.push((accessor, group.name()));
        }
    }

    if let (Some(accessor), Some(location)) =
        (capabilities.accessor(FieldRole::Location), group.location())
    {
        if accessor.is_set(args) {
            tracing::debug!(
                stage = NAME,
                resource = %declaration.resource,
                field = accessor.field(),
                "location already specified"
            );
        } else {
            assignments.push((accessor, location));
        }
    }

    if assignments.is_empty() {
        return None;
    }
    super::fill(NAME, registry, declaration, &assignments)
}

/// Wraps [`apply`] as a registrable transformation.
#[must_use]
pub fn transformation(registry: Arc<CapabilityRegistry>) -> ResourceTransformation {
    Arc::new(move |declaration: &ResourceTransformationArgs| apply(&registry, declaration))
}
