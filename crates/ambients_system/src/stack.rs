//! The host declaration engine.
//!
//! A [`Stack`] is the minimal engine that resources are declared against. It
//! owns the [`StackOptions`] (and with them the ordered transformation
//! registry), orchestrates plugins, and records every declaration after
//! threading it through the registered transformations.
//!
//! # Lifecycle
//!
//! 1. **Build Phase** - `plugin.build()` in insertion order
//! 2. **Ready Phase** - `plugin.ready()` in insertion order
//! 3. **Declarations** - [`Stack::declare`] from any number of threads or tasks
//! 4. **Cleanup Phase** - `plugin.cleanup()` in reverse order
//!
//! ```
//! use std::sync::Arc;
//!
//! use ambients_system::catalog::VariantSchema;
//! use ambients_system::resource::{ResourceArgs, ResourceOptions};
//! use ambients_system::stack::Stack;
//!
//! static VAULT: VariantSchema =
//!     VariantSchema::new("VaultArgs", "azure-nextgen:keyvault/latest:Vault", &["vaultName"]);
//!
//! let mut stack = Stack::new();
//! stack.finish();
//!
//! let vault = stack
//!     .declare("vault", ResourceArgs::new(&VAULT).with("vaultName", "kv1"), ResourceOptions::new())
//!     .unwrap();
//! assert_eq!(vault.identity().name(), "vault");
//! ```

use std::sync::Arc;

use hashbrown::HashSet;
use indexmap::map::Entry;
use indexmap::{Equivalent, IndexMap};
use parking_lot::RwLock;

use crate::plugin::{Plugin, PluginId, Plugins};
use crate::resource::{ResourceArgs, ResourceIdentity, ResourceOptions};
use crate::transform::{ResourceTransformationArgs, ResourceTransformations};

// ─────────────────────────────────────────────────────────────────────────────
// StackOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Stack-wide options consulted on every declaration.
#[derive(Debug, Clone, Default)]
pub struct StackOptions {
    /// Transformations applied to each declaration, in order.
    pub resource_transformations: ResourceTransformations,
}

impl StackOptions {
    /// Creates options with no transformations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RegisteredResource
// ─────────────────────────────────────────────────────────────────────────────

/// A declaration as recorded by the stack, after all transformations ran.
#[derive(Debug, Clone)]
pub struct RegisteredResource {
    identity: ResourceIdentity,
    args: Arc<ResourceArgs>,
    options: ResourceOptions,
}

impl RegisteredResource {
    /// Returns the resource identity.
    #[must_use]
    pub fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    /// Returns the final argument value.
    #[must_use]
    pub fn args(&self) -> &Arc<ResourceArgs> {
        &self.args
    }

    /// Returns the final registration options.
    #[must_use]
    pub fn options(&self) -> &ResourceOptions {
        &self.options
    }

    /// Returns the logical name the resource was declared with.
    #[must_use]
    pub fn name(&self) -> &str {
        self.identity.name()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StackError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by [`Stack::declare`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// A resource with the same type and name was already declared.
    #[error("resource '{type_token}::{name}' is already declared")]
    DuplicateResource {
        /// Type token of the duplicate.
        type_token: &'static str,
        /// Logical name of the duplicate.
        name: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Stack
// ─────────────────────────────────────────────────────────────────────────────

/// Represents the build state of the stack.
///
/// The stack progresses through these states linearly:
/// `NotStarted` → `Building` → `Built`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BuildState {
    /// `finish()` has not been called yet.
    #[default]
    NotStarted,
    /// `finish()` is executing plugin build and ready phases.
    Building,
    /// `finish()` has returned.
    Built,
}

/// Internal entry for a registered plugin.
struct PluginEntry {
    id: PluginId,
    plugin: Box<dyn Plugin>,
    /// Cached for log and panic messages.
    name: String,
}

type ResourceKey = (&'static str, String);

/// Borrowed form of [`ResourceKey`] for lookups. Hashes like the owned tuple.
#[derive(Hash)]
struct ResourceKeyRef<'a>(&'a str, &'a str);

impl Equivalent<ResourceKey> for ResourceKeyRef<'_> {
    fn equivalent(&self, key: &ResourceKey) -> bool {
        self.0 == key.0 && self.1 == key.1
    }
}

/// The engine resources are declared against.
///
/// Plugin management takes `&mut self`; declaring takes `&self`, so a built
/// stack can be shared behind an [`Arc`] by concurrent tasks.
pub struct Stack {
    options: StackOptions,
    pending_plugins: Vec<PluginEntry>,
    built_plugins: Vec<PluginEntry>,
    plugin_ids: HashSet<PluginId>,
    build_state: BuildState,
    resources: RwLock<IndexMap<ResourceKey, RegisteredResource>>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Stack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stack")
            .field("options", &self.options)
            .field("build_state", &self.build_state)
            .field("resources", &self.len())
            .finish_non_exhaustive()
    }
}

impl Stack {
    /// Creates an empty stack with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(StackOptions::default())
    }

    /// Creates an empty stack with the given options.
    #[must_use]
    pub fn with_options(options: StackOptions) -> Self {
        Self {
            options,
            pending_plugins: Vec::new(),
            built_plugins: Vec::new(),
            plugin_ids: HashSet::new(),
            build_state: BuildState::NotStarted,
            resources: RwLock::new(IndexMap::new()),
        }
    }

    /// Returns the stack options.
    #[must_use]
    pub fn options(&self) -> &StackOptions {
        &self.options
    }

    /// Returns the stack options for modification.
    ///
    /// Plugins use this during their build phase to register transformations.
    pub fn options_mut(&mut self) -> &mut StackOptions {
        &mut self.options
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Plugin Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds one or more plugins to the stack.
    ///
    /// Accepts either a single [`Plugin`] or a
    /// [`PluginGroupBuilder`](crate::plugin::PluginGroupBuilder).
    ///
    /// # Panics
    ///
    /// Panics if a unique plugin is added twice, or if the stack has already
    /// been finished.
    pub fn add_plugins<P: Plugins>(&mut self, plugins: P) -> &mut Self {
        plugins.add_to_stack(self);
        self
    }

    /// Adds a boxed plugin with its captured ID.
    ///
    /// Called by [`Plugins::add_to_stack`] implementations.
    pub(crate) fn add_plugin_boxed(&mut self, id: PluginId, plugin: Box<dyn Plugin>) {
        let name = plugin.name().to_string();

        assert!(
            self.build_state != BuildState::Built,
            "Plugin '{}' was added after Stack::finish(). Add all plugins before finishing.",
            name
        );

        if plugin.is_unique() && self.plugin_ids.contains(&id) {
            panic!(
                "Plugin '{}' is unique and was already added.\n\
                 If you intended to add this plugin multiple times, \
                 set `is_unique()` to return `false`.",
                name
            );
        }

        self.plugin_ids.insert(id);

        let entry = PluginEntry { id, plugin, name };

        // Plugins added by another plugin's build() are built right away
        if self.build_state == BuildState::Building {
            tracing::debug!(plugin = %entry.name, "building nested plugin");
            entry.plugin.build(self);
            self.built_plugins.push(entry);
        } else {
            self.pending_plugins.push(entry);
        }
    }

    /// Returns true if a plugin of the given type has been added.
    #[must_use]
    pub fn has_plugin<P: Plugin>(&self) -> bool {
        let id = PluginId::of::<P>();
        self.pending_plugins
            .iter()
            .chain(self.built_plugins.iter())
            .any(|entry| entry.id == id)
    }

    /// Runs the build and ready phases of every added plugin.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn finish(&mut self) {
        assert!(
            self.build_state == BuildState::NotStarted,
            "Stack::finish() was already called. Cannot build twice."
        );

        self.build_state = BuildState::Building;
        for entry in core::mem::take(&mut self.pending_plugins) {
            tracing::debug!(plugin = %entry.name, "building plugin");
            entry.plugin.build(self);
            self.built_plugins.push(entry);
        }

        // Plugins added from ready() are built immediately and get their own
        // ready() in a later round, after the plugins that were already there.
        let mut ready = Vec::with_capacity(self.built_plugins.len());
        let mut round = core::mem::take(&mut self.built_plugins);
        while !round.is_empty() {
            for entry in &round {
                entry.plugin.ready(self);
            }
            ready.append(&mut round);
            round = core::mem::take(&mut self.built_plugins);
        }
        self.built_plugins = ready;

        self.build_state = BuildState::Built;
        tracing::info!(
            plugins = self.built_plugins.len(),
            transformations = self.options.resource_transformations.len(),
            "stack ready"
        );
    }

    /// Returns true once [`finish`](Self::finish) has returned.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.build_state == BuildState::Built
    }

    /// Calls `cleanup()` on all built plugins in reverse order.
    pub fn cleanup(&mut self) {
        let built = core::mem::take(&mut self.built_plugins);
        for entry in built.iter().rev() {
            entry.plugin.cleanup(self);
        }
        self.built_plugins = built;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Declarations
    // ─────────────────────────────────────────────────────────────────────────

    /// Declares a resource.
    ///
    /// The identity is derived from the argument variant and `name`; the
    /// declaration is threaded through every registered transformation and
    /// the final value is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::DuplicateResource`] if a resource with the same
    /// type and name was already declared.
    ///
    /// # Panics
    ///
    /// Panics if plugins were added but [`finish`](Self::finish) was not
    /// called.
    pub fn declare(
        &self,
        name: impl Into<String>,
        args: impl Into<Arc<ResourceArgs>>,
        options: ResourceOptions,
    ) -> Result<RegisteredResource, StackError> {
        assert!(
            self.pending_plugins.is_empty(),
            "Stack::declare() called with {} plugin(s) not yet built. Call Stack::finish() first.",
            self.pending_plugins.len()
        );

        let args = args.into();
        let identity = ResourceIdentity::for_variant(args.schema(), name);

        if self.resource(identity.type_token(), identity.name()).is_some() {
            return Err(duplicate(&identity));
        }

        let declaration = self.options.resource_transformations.apply(
            ResourceTransformationArgs::new(identity, args, options),
        );

        let registered = RegisteredResource {
            identity: declaration.resource,
            args: declaration.args,
            options: declaration.options,
        };

        let key = (
            registered.identity.type_token(),
            registered.identity.name().to_string(),
        );
        match self.resources.write().entry(key) {
            // Lost a race with a concurrent declaration of the same resource
            Entry::Occupied(_) => Err(duplicate(&registered.identity)),
            Entry::Vacant(slot) => {
                tracing::debug!(resource = %registered.identity, "resource declared");
                slot.insert(registered.clone());
                Ok(registered)
            }
        }
    }

    /// Looks up a declared resource by type token and name.
    #[must_use]
    pub fn resource(&self, type_token: &str, name: &str) -> Option<RegisteredResource> {
        self.resources
            .read()
            .get(&ResourceKeyRef(type_token, name))
            .cloned()
    }

    /// Returns every declared resource in declaration order.
    #[must_use]
    pub fn resources(&self) -> Vec<RegisteredResource> {
        self.resources.read().values().cloned().collect()
    }

    /// Returns the number of declared resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// Returns true if nothing was declared yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

fn duplicate(identity: &ResourceIdentity) -> StackError {
    StackError::DuplicateResource {
        type_token: identity.type_token(),
        name: identity.name().to_string(),
    }
}
