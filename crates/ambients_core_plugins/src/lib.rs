//! Infrastructure plugins for ambients stacks.
//!
//! - [`TracingPlugin`] - Logging and observability via the `tracing` crate
//!
//! # Example
//!
//! ```
//! use ambients_core_plugins::TracingPlugin;
//! use ambients_system::stack::Stack;
//! use tracing::Level;
//!
//! let mut stack = Stack::new();
//! stack.add_plugins(TracingPlugin::default().with_level(Level::DEBUG));
//! stack.finish();
//! ```
//!
//! # Architecture
//!
//! This crate is part of Layer 3, next to `ambients_transform`. Library
//! crates below it only emit events; installing a subscriber is left to
//! this plugin or to the application.

mod tracing_plugin;

pub use tracing_plugin::{DECLARATION_EVENTS, TracingConfig, TracingFormat, TracingPlugin};
