//! Example deployment CLI.
//!
//! Declares a small web deployment with ambient defaults and logs every
//! declaration as it is recorded.
//!
//! # Usage
//!
//! ```bash
//! deploy <subscription> <resource-group> <location> [apps...]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=info deploy 00000000-0000 rg-web westus api admin
//! ```

use std::sync::Arc;

use ambients_core_plugins::{TracingFormat, TracingPlugin};
use ambients_scope::Branch;
use ambients_system::stack::Stack;
use ambients_transform::AmbientsPlugin;
use example::{DeploymentConfig, deploy, variants};

#[tokio::main]
async fn main() {
    let mut stack = Stack::new();
    stack
        .add_plugins(AmbientsPlugin::new(variants::catalog()).with_warm_up(true))
        .add_plugins(
            TracingPlugin::new()
                .with_format(TracingFormat::Compact)
                .with_env_filter("ambients_scope=info,ambients_core_plugins=info,example=info")
                .with_declaration_events(true),
        );
    stack.finish();

    let config = match DeploymentConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            tracing::error!("usage: deploy <subscription> <resource-group> <location> [apps...]");
            std::process::exit(2);
        }
    };

    let stack = Arc::new(stack);
    let result = Branch::empty().scope(deploy(Arc::clone(&stack), &config)).await;

    match result {
        Ok(deployment) => {
            tracing::info!(
                resources = stack.len(),
                apps = deployment.apps.len(),
                "done"
            );
        }
        Err(e) => {
            tracing::error!("Error: {e}");
            std::process::exit(1);
        }
    }
}
