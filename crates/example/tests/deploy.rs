use std::sync::Arc;

use ambients_scope::{AmbientLocation, AmbientResourceGroup, AmbientSubscription, Branch};
use ambients_system::resource::Input;
use ambients_system::stack::{RegisteredResource, Stack};
use ambients_transform::AmbientsPlugin;
use example::{DeployError, DeploymentConfig, deploy, variants};

fn stack() -> Arc<Stack> {
    let mut stack = Stack::new();
    stack.add_plugins(AmbientsPlugin::new(variants::catalog()));
    stack.finish();
    Arc::new(stack)
}

fn field<'a>(resource: &'a RegisteredResource, name: &str) -> Option<&'a str> {
    resource.args().get(name).and_then(Input::as_str)
}

fn subscription(resource: &RegisteredResource) -> Option<&str> {
    resource
        .options()
        .provider
        .as_ref()
        .map(|provider| provider.subscription_id())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deploys_with_ambient_defaults() {
    let stack = stack();
    let config = DeploymentConfig::new("sub-example", "rg-web", "westus")
        .with_app("api")
        .with_app("admin");

    let deployment = Branch::empty()
        .scope(deploy(Arc::clone(&stack), &config))
        .await
        .unwrap();

    assert_eq!(field(&deployment.resource_group, "location"), Some("westus"));
    assert_eq!(subscription(&deployment.resource_group), Some("sub-example"));

    for resource in [&deployment.storage, &deployment.plan] {
        assert_eq!(field(resource, "resourceGroupName"), Some("rg-web"));
        assert_eq!(field(resource, "location"), Some("westus"));
        assert_eq!(subscription(resource), Some("sub-example"));
    }
    assert_eq!(field(&deployment.storage, "accountName"), Some("storage"));
    assert_eq!(field(&deployment.plan, "name"), Some("plan"));

    assert_eq!(deployment.apps.len(), 2);
    for (app, name) in deployment.apps.iter().zip(["api", "admin"]) {
        assert_eq!(field(&app.web_app, "name"), Some(name));
        assert_eq!(field(&app.web_app, "location"), Some("westus"));
        assert_eq!(field(&app.web_app, "resourceGroupName"), Some("rg-web"));
        assert_eq!(field(&app.container, "containerName"), Some(name));
        assert_eq!(field(&app.container, "accountName"), Some("storage"));
        assert_eq!(subscription(&app.container), Some("sub-example"));
    }

    // 1 group + storage + plan + 2 per app
    assert_eq!(stack.len(), 7);
}

#[tokio::test]
async fn scopes_are_released_after_deploy() {
    let stack = stack();
    let config = DeploymentConfig::new("sub-released", "rg-released", "eastus");

    Branch::empty()
        .scope(async {
            deploy(Arc::clone(&stack), &config).await.unwrap();

            assert!(AmbientSubscription::current().is_none());
            assert!(AmbientResourceGroup::current().is_none());
            assert!(AmbientLocation::current().is_none());
        })
        .await;
}

#[tokio::test]
async fn redeploying_the_same_group_fails() {
    let stack = stack();
    let config = DeploymentConfig::new("sub-twice", "rg-twice", "eastus");

    Branch::empty()
        .scope(deploy(Arc::clone(&stack), &config))
        .await
        .unwrap();
    let second = Branch::empty()
        .scope(deploy(Arc::clone(&stack), &config))
        .await;

    assert!(matches!(second, Err(DeployError::Stack(_))));
}

#[tokio::test]
async fn deploy_under_an_open_group_conflicts() {
    let stack = stack();
    let config = DeploymentConfig::new("sub-conflict", "rg-conflict", "eastus");

    let result = Branch::empty()
        .scope(async {
            let _outer = AmbientResourceGroup::new("rg-outer", "westus").unwrap();
            deploy(Arc::clone(&stack), &config).await
        })
        .await;

    assert!(matches!(result, Err(DeployError::Scope(_))));
    assert!(stack.is_empty());
}
