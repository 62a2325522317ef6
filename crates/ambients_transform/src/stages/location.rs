//! Location defaulting.

use std::sync::Arc;

use ambients_catalog::{CapabilityRegistry, FieldRole};
use ambients_scope::{AmbientLocation, AmbientResourceGroup};
use ambients_system::transform::{
    ResourceTransformation, ResourceTransformationArgs, ResourceTransformationResult,
};

/// Registration name of the stage.
pub const NAME: &str = "ambients:location";

/// Fills the location from the ambient location.
///
/// Does nothing while an ambient resource group is in effect; the group
/// stage owns the location then.
pub fn apply(
    registry: &CapabilityRegistry,
    declaration: &ResourceTransformationArgs,
) -> Option<ResourceTransformationResult> {
    let location = AmbientLocation::current()?;
    let capabilities = super::eligible(NAME, registry, declaration)?;

    if AmbientResourceGroup::current().is_some() {
        tracing::debug!(
            stage = NAME,
            resource = %declaration.resource,
            "ambient resource group in effect, it sets the location"
        );
        return None;
    }

    let Some(accessor) = capabilities.accessor(FieldRole::Location) else {
        tracing::debug!(
            stage = NAME,
            resource = %declaration.resource,
            variant = declaration.args.variant(),
            "variant has no location"
        );
        return None;
    };

    if accessor.is_set(&declaration.args) {
        tracing::debug!(
            stage = NAME,
            resource = %declaration.resource,
            field = accessor.field(),
            "location already specified"
        );
        return None;
    }

    super::fill(NAME, registry, declaration, &[(accessor, location.as_str())])
}

/// Wraps [`apply`] as a registrable transformation.
#[must_use]
pub fn transformation(registry: Arc<CapabilityRegistry>) -> ResourceTransformation {
    Arc::new(move |declaration: &ResourceTransformationArgs| apply(&registry, declaration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::fixtures::*;
    use ambients_scope::{Branch, ResourceGroup, ScopedContext};
    use ambients_system::resource::{Input, ResourceArgs};

    #[test]
    fn fills_empty_location() {
        let _location = AmbientLocation::new("westus").unwrap();
        let declaration = declare("sa", ResourceArgs::new(&STORAGE_ACCOUNT));

        let result = apply(&registry(), &declaration).unwrap();
        assert_eq!(
            result.args.get("location").and_then(Input::as_str),
            Some("westus")
        );
        assert!(result.args.get("resourceGroupName").is_none());
    }

    #[test]
    fn explicit_location_wins() {
        let _location = AmbientLocation::new("westus").unwrap();
        let declaration = declare(
            "sa",
            ResourceArgs::new(&STORAGE_ACCOUNT).with("location", "eastus"),
        );

        assert!(apply(&registry(), &declaration).is_none());
    }

    #[test]
    fn empty_string_counts_as_unset() {
        let _location = AmbientLocation::new("westus").unwrap();
        let declaration = declare("sa", ResourceArgs::new(&STORAGE_ACCOUNT).with("location", ""));

        assert!(apply(&registry(), &declaration).is_some());
    }

    #[test]
    fn ambient_group_suppresses_location() {
        let _location = AmbientLocation::new("westus").unwrap();
        // Opened in this order the group is allowed; it still wins the location
        let _group = ScopedContext::open(ResourceGroup::without_location("rg1").unwrap()).unwrap();
        let declaration = declare("sa", ResourceArgs::new(&STORAGE_ACCOUNT));

        assert!(apply(&registry(), &declaration).is_none());
    }

    #[test]
    fn variants_without_location_are_skipped() {
        let _location = AmbientLocation::new("westus").unwrap();
        assert!(apply(&registry(), &declare("c", ResourceArgs::new(&BLOB_CONTAINER))).is_none());
        assert!(apply(&registry(), &declare("p", ResourceArgs::new(&PROVIDER))).is_none());
    }

    #[test]
    fn scope_in_other_branch_is_not_applied() {
        let declaration = declare("sa", ResourceArgs::new(&STORAGE_ACCOUNT));
        Branch::empty().enter(|| {
            let _location = AmbientLocation::new("westus").unwrap();
        });
        assert!(apply(&registry(), &declaration).is_none());
    }
}
