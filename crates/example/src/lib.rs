//! Example deployment declared under ambient scopes.
//!
//! A resource group, a storage account and an app service plan, then one web
//! app and blob container per app, each app declared from its own task. None
//! of the declarations spell out a subscription, resource group, location or
//! name: the ambient scopes fill them in.
//!
//! # Scopes
//!
//! ```text
//! subscription ───────────────────────────────────────────────┐
//! │ location ──────────┐                                      │
//! │ │ resource group   │                                      │
//! │ └──────────────────┘                                      │
//! │ resource group (from the declared group) ───────────────┐ │
//! │ │ storage account, app service plan                     │ │
//! │ │ ┌ task ┐ ┌ task ┐                                     │ │
//! │ │ │ app  │ │ app  │  web app + blob container          │ │
//! │ │ └──────┘ └──────┘                                     │ │
//! │ └───────────────────────────────────────────────────────┘ │
//! └───────────────────────────────────────────────────────────┘
//! ```

mod config;
pub mod variants;

pub use config::{ConfigError, DeploymentConfig};

use std::sync::Arc;

use ambients_scope::{
    AmbientLocation, AmbientSubscription, ResourceGroup, ScopeError, ScopedContext,
};
use ambients_system::resource::{ResourceArgs, ResourceOptions};
use ambients_system::stack::{RegisteredResource, Stack, StackError};

use crate::variants::{
    APP_SERVICE_PLAN, BLOB_CONTAINER, RESOURCE_GROUP, STORAGE_ACCOUNT, WEB_APP,
};

/// Errors from [`deploy`].
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// An ambient scope could not be opened or released.
    #[error(transparent)]
    Scope(#[from] ScopeError),
    /// A resource could not be declared.
    #[error(transparent)]
    Stack(#[from] StackError),
    /// An app task panicked or was cancelled.
    #[error("app task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Resources declared for one app.
#[derive(Debug, Clone)]
pub struct AppResources {
    /// The web app.
    pub web_app: RegisteredResource,
    /// The app's blob container.
    pub container: RegisteredResource,
}

/// Everything [`deploy`] declared.
#[derive(Debug, Clone)]
pub struct Deployment {
    /// The resource group.
    pub resource_group: RegisteredResource,
    /// The shared storage account.
    pub storage: RegisteredResource,
    /// The shared app service plan.
    pub plan: RegisteredResource,
    /// Per-app resources, in config order.
    pub apps: Vec<AppResources>,
}

/// Declares the deployment described by `config` on `stack`.
///
/// The stack is expected to carry the ambient stages. Every scope opened
/// here is released before returning.
///
/// # Errors
///
/// Returns [`DeployError`] if a scope conflicts, a resource is declared
/// twice or an app task fails.
pub async fn deploy(stack: Arc<Stack>, config: &DeploymentConfig) -> Result<Deployment, DeployError> {
    let _subscription = AmbientSubscription::new(config.subscription_id.as_str())?;

    let mut location = AmbientLocation::new(config.location.as_str())?;
    let resource_group = stack.declare(
        config.resource_group.as_str(),
        ResourceArgs::new(&RESOURCE_GROUP).with("resourceGroupName", config.resource_group.as_str()),
        ResourceOptions::new(),
    )?;
    location.release()?;

    let _group = ScopedContext::open(ResourceGroup::from_registered(&resource_group)?)?;

    let storage = stack.declare(
        "storage",
        ResourceArgs::new(&STORAGE_ACCOUNT)
            .with("kind", "StorageV2")
            .with("sku", "Standard_LRS"),
        ResourceOptions::new(),
    )?;
    let plan = stack.declare(
        "plan",
        ResourceArgs::new(&APP_SERVICE_PLAN).with("sku", "B1"),
        ResourceOptions::new(),
    )?;

    let tasks: Vec<_> = config
        .apps
        .iter()
        .map(|app| {
            let stack = Arc::clone(&stack);
            let app = app.clone();
            let account = storage.name().to_string();
            let plan = plan.name().to_string();
            ambients_scope::spawn(async move { declare_app(&stack, &app, &account, &plan) })
        })
        .collect();

    let mut apps = Vec::with_capacity(tasks.len());
    for task in tasks {
        apps.push(task.await??);
    }

    tracing::info!(
        resource_group = %resource_group.identity(),
        apps = apps.len(),
        "deployment declared"
    );

    Ok(Deployment {
        resource_group,
        storage,
        plan,
        apps,
    })
}

fn declare_app(
    stack: &Stack,
    app: &str,
    account: &str,
    plan: &str,
) -> Result<AppResources, StackError> {
    let web_app = stack.declare(
        app,
        ResourceArgs::new(&WEB_APP).with("serverFarmId", plan),
        ResourceOptions::new().depends_on(plan),
    )?;
    let container = stack.declare(
        app,
        ResourceArgs::new(&BLOB_CONTAINER).with("accountName", account),
        ResourceOptions::new().with_parent(account),
    )?;
    Ok(AppResources { web_app, container })
}
