//! Subscription binding: routes declarations to the ambient subscription's
//! provider.

use std::sync::Arc;

use ambients_catalog::CapabilityRegistry;
use ambients_scope::AmbientSubscription;
use ambients_system::transform::{
    ResourceTransformation, ResourceTransformationArgs, ResourceTransformationResult,
};

/// Registration name of the stage.
pub const NAME: &str = "ambients:subscription";

/// Attaches the ambient subscription's provider unless one is already set.
pub fn apply(
    registry: &CapabilityRegistry,
    declaration: &ResourceTransformationArgs,
) -> Option<ResourceTransformationResult> {
    let subscription = AmbientSubscription::current()?;
    super::eligible(NAME, registry, declaration)?;

    if let Some(provider) = &declaration.options.provider {
        tracing::debug!(
            stage = NAME,
            resource = %declaration.resource,
            subscription = subscription.subscription_id(),
            provider = provider.name(),
            "resource is already routed to a provider"
        );
        return None;
    }

    let options = declaration
        .options
        .clone()
        .with_provider(subscription.provider().clone());
    Some(ResourceTransformationResult::new(
        Arc::clone(&declaration.args),
        options,
    ))
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
    use ambients_system::resource::{ProviderHandle, ResourceArgs};

    #[test]
    fn no_scope_no_change() {
        let declaration = declare("sa", ResourceArgs::new(&STORAGE_ACCOUNT));
        assert!(apply(&registry(), &declaration).is_none());
    }

    #[test]
    fn attaches_provider_and_keeps_args() {
        let _subscription = AmbientSubscription::new("sub-attach").unwrap();
        let declaration = declare("sa", ResourceArgs::new(&STORAGE_ACCOUNT));

        let result = apply(&registry(), &declaration).unwrap();
        let provider = result.options.provider.unwrap();

        assert_eq!(provider.subscription_id(), "sub-attach");
        assert_eq!(&provider, AmbientSubscription::current().unwrap().provider());
        assert!(Arc::ptr_eq(&result.args, &declaration.args));
        assert!(declaration.options.provider.is_none());
    }

    #[test]
    fn explicit_provider_is_kept() {
        let _subscription = AmbientSubscription::new("sub-keep").unwrap();
        let mut declaration = declare("sa", ResourceArgs::new(&STORAGE_ACCOUNT));
        declaration.options = declaration
            .options
            .clone()
            .with_provider(ProviderHandle::new("explicit", "other"));

        assert!(apply(&registry(), &declaration).is_none());
    }

    #[test]
    fn providers_and_foreign_variants_are_skipped() {
        let _subscription = AmbientSubscription::new("sub-skip").unwrap();
        let registry = registry();

        let provider = declare("p", ResourceArgs::new(&PROVIDER));
        assert!(apply(&registry, &provider).is_none());

        let foreign = declare("b", ResourceArgs::new(&FOREIGN));
        assert!(apply(&registry, &foreign).is_none());
    }
}
