//! Plugin system for extending a [`Stack`].
//!
//! Plugins are the unit of composition for a stack: transformations,
//! logging configuration and any other setup are delivered through plugins
//! that run once, before the stack accepts declarations.
//!
//! # Example
//!
//! ```
//! use ambients_system::plugin::Plugin;
//! use ambients_system::stack::Stack;
//!
//! struct ProtectEverything;
//!
//! impl Plugin for ProtectEverything {
//!     fn build(&self, stack: &mut Stack) {
//!         stack
//!             .options_mut()
//!             .resource_transformations
//!             .register("protect", |_| None)
//!             .expect("unique transformation name");
//!     }
//! }
//!
//! let mut stack = Stack::new();
//! stack.add_plugins(ProtectEverything);
//! stack.finish();
//! assert!(stack.options().resource_transformations.contains("protect"));
//! ```

use core::any::TypeId;

use crate::stack::Stack;

// ─────────────────────────────────────────────────────────────────────────────
// PluginId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a plugin type.
///
/// Used for duplicate detection. Based on [`TypeId`], so each plugin type has
/// exactly one `PluginId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId {
    type_id: TypeId,
    type_name: &'static str,
}

impl PluginId {
    /// Creates a `PluginId` for the given plugin type.
    #[must_use]
    pub fn of<P: Plugin>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: core::any::type_name::<P>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of setup that configures a [`Stack`].
///
/// Plugins follow a strict lifecycle managed by the stack:
///
/// 1. **Build Phase** - `build()` is called in insertion order
/// 2. **Ready Phase** - `ready()` is called in insertion order
/// 3. **Cleanup Phase** - `cleanup()` is called in reverse order
pub trait Plugin: Send + Sync + 'static {
    /// Configures the stack. Called once by [`Stack::finish`].
    ///
    /// Use this to append transformations to
    /// [`StackOptions`](crate::stack::StackOptions) or add sub-plugins.
    fn build(&self, stack: &mut Stack);

    /// Called after all plugins have been built.
    ///
    /// Plugins added from here are built at once and have their own
    /// `ready()` called after the current round.
    fn ready(&self, _stack: &mut Stack) {}

    /// Called when the stack is shutting down, in reverse order.
    fn cleanup(&self, _stack: &mut Stack) {}

    /// Returns the plugin's name for debugging and error messages.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Returns true if this plugin can only be added once.
    ///
    /// Default is `true`; adding the same plugin type twice will panic.
    fn is_unique(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugins Trait (for add_plugins polymorphism)
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for types that can be added to a stack as plugins.
///
/// This trait enables `stack.add_plugins()` to accept both single plugins
/// and plugin groups via [`PluginGroupBuilder`].
pub trait Plugins {
    /// Adds these plugins to the stack.
    fn add_to_stack(self, stack: &mut Stack);
}

impl<P: Plugin> Plugins for P {
    fn add_to_stack(self, stack: &mut Stack) {
        // Capture PluginId while we still have the concrete type
        let id = PluginId::of::<P>();
        stack.add_plugin_boxed(id, Box::new(self));
    }
}

impl Plugins for PluginGroupBuilder {
    fn add_to_stack(self, stack: &mut Stack) {
        for boxed in self.plugins {
            stack.add_plugin_boxed(boxed.id, boxed.plugin);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginGroup
// ─────────────────────────────────────────────────────────────────────────────

/// A collection of plugins that can be added together.
///
/// Users can customize the group before adding it to the stack:
///
/// ```ignore
/// stack.add_plugins(
///     AmbientPlugins::new(catalog)
///         .build()
///         .disable::<AutoNamingPlugin>(),
/// );
/// ```
pub trait PluginGroup {
    /// Returns the plugins in this group.
    fn build(self) -> PluginGroupBuilder;
}

/// A boxed plugin with its captured [`PluginId`].
pub(crate) struct BoxedPlugin {
    /// The plugin's unique identifier (captured before boxing).
    pub(crate) id: PluginId,
    /// The boxed plugin instance.
    pub(crate) plugin: Box<dyn Plugin>,
}

impl BoxedPlugin {
    /// Returns the plugin's name (delegating to the inner plugin).
    pub(crate) fn name(&self) -> &str {
        self.plugin.name()
    }
}

/// Builder for customizing plugin groups.
#[derive(Default)]
pub struct PluginGroupBuilder {
    /// The plugins in this group, in order.
    pub(crate) plugins: Vec<BoxedPlugin>,
}

impl PluginGroupBuilder {
    /// Creates a new empty plugin group builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Adds a plugin to the end of the group.
    #[must_use]
    #[expect(
        clippy::should_implement_trait,
        reason = "This is a builder method, not std::ops::Add"
    )]
    pub fn add<P: Plugin>(mut self, plugin: P) -> Self {
        let id = PluginId::of::<P>();
        self.plugins.push(BoxedPlugin {
            id,
            plugin: Box::new(plugin),
        });
        self
    }

    /// Removes a plugin from the group by type.
    ///
    /// If the plugin is not found, this is a no-op.
    #[must_use]
    pub fn disable<P: Plugin>(mut self) -> Self {
        let target = PluginId::of::<P>();
        self.plugins.retain(|p| p.id != target);
        self
    }

    /// Returns the plugin names in group order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(BoxedPlugin::name).collect()
    }

    /// Returns the number of plugins in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if the group contains no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
