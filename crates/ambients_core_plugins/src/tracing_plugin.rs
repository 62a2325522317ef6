//! Tracing and observability plugin.
//!
//! Provides [`TracingPlugin`] which configures the `tracing` subscriber for
//! a stack and, optionally, logs every declaration once the other
//! transformations have run.
//!
//! # Lifecycle
//!
//! - **`build()`** registers the declaration logger when enabled. Added
//!   after the ambient stages, it sees the final argument values.
//! - **`ready()`** initializes the tracing subscriber. This deferred
//!   initialization lets the rest of the stack build before the subscriber
//!   is installed.
//!
//! # Example
//!
//! ```
//! use ambients_core_plugins::{TracingFormat, TracingPlugin};
//! use ambients_system::stack::Stack;
//! use tracing::Level;
//!
//! let mut stack = Stack::new();
//! stack.add_plugins(
//!     TracingPlugin::default()
//!         .with_level(Level::DEBUG)
//!         .with_format(TracingFormat::Compact)
//!         .with_declaration_events(true),
//! );
//! stack.finish();
//!
//! assert!(stack.options().resource_transformations.contains("ambients:trace-declarations"));
//! ```

use ambients_system::plugin::Plugin;
use ambients_system::resource::ProviderHandle;
use ambients_system::stack::Stack;
use ambients_system::transform::{ResourceTransformationArgs, ResourceTransformationResult};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Registration name of the declaration logger.
pub const DECLARATION_EVENTS: &str = "ambients:trace-declarations";

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// The settings a [`TracingPlugin`] installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingConfig {
    /// The configured log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing and logging plugin.
///
/// Configures the `tracing` subscriber. Uses the [`tracing`] and
/// [`tracing_subscriber`] crates under the hood. If a global subscriber is
/// already installed the existing one is kept.
///
/// # Configuration Options
///
/// ```
/// use ambients_core_plugins::{TracingPlugin, TracingFormat};
/// use tracing::Level;
///
/// // Development: pretty output, stage decisions included
/// let dev_plugin = TracingPlugin::default()
///     .with_level(Level::DEBUG)
///     .with_format(TracingFormat::Pretty)
///     .with_span_events(true);
///
/// // CI: JSON output, provider creation and final declarations only
/// let ci_plugin = TracingPlugin::default()
///     .with_format(TracingFormat::Json)
///     .with_env_filter("ambients_scope=info,ambients_core_plugins=info")
///     .with_declaration_events(true);
/// ```
#[derive(Debug, Clone)]
pub struct TracingPlugin {
    /// Maximum log level.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., "ambients_transform=debug").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
    /// Whether to log each declaration after the transformations.
    declaration_events: bool,
}

impl Default for TracingPlugin {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
            declaration_events: false,
        }
    }
}

impl TracingPlugin {
    /// Creates a new `TracingPlugin` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`. An invalid filter falls back
    /// to the configured level.
    ///
    /// # Example
    ///
    /// ```
    /// use ambients_core_plugins::TracingPlugin;
    ///
    /// TracingPlugin::new()
    ///     .with_env_filter("ambients_transform=debug,ambients_scope=info");
    /// ```
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Logs every declaration at `info` once the transformations registered
    /// before this plugin have run.
    #[must_use]
    pub fn with_declaration_events(mut self, enabled: bool) -> Self {
        self.declaration_events = enabled;
        self
    }

    /// Returns the level and format this plugin installs.
    #[must_use]
    pub fn config(&self) -> TracingConfig {
        TracingConfig {
            level: self.level,
            format: self.format,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }
}

fn log_declaration(declaration: &ResourceTransformationArgs) -> Option<ResourceTransformationResult> {
    tracing::info!(
        resource = %declaration.resource,
        variant = declaration.args.variant(),
        args = ?declaration.args,
        provider = declaration.options.provider.as_ref().map(ProviderHandle::name),
        "resource declared"
    );
    None
}

impl Plugin for TracingPlugin {
    fn build(&self, stack: &mut Stack) {
        if !self.declaration_events {
            return;
        }
        if stack
            .options_mut()
            .resource_transformations
            .register(DECLARATION_EVENTS, log_declaration)
            .is_err()
        {
            tracing::debug!(
                transformation = DECLARATION_EVENTS,
                "declaration logger already registered"
            );
        }
    }

    fn ready(&self, _stack: &mut Stack) {
        let env_filter = self.env_filter();

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        // try_init().ok() keeps a subscriber that is already installed
        match self.format {
            TracingFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }

        tracing::info!(
            level = %self.level,
            format = ?self.format,
            "TracingPlugin initialized"
        );
    }

    fn cleanup(&self, _stack: &mut Stack) {
        tracing::info!("TracingPlugin shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_format_default_is_pretty() {
        assert_eq!(TracingFormat::default(), TracingFormat::Pretty);
    }

    #[test]
    fn tracing_plugin_defaults() {
        let plugin = TracingPlugin::default();
        assert_eq!(
            plugin.config(),
            TracingConfig {
                level: Level::INFO,
                format: TracingFormat::Pretty,
            }
        );
        assert!(!plugin.span_events);
        assert!(!plugin.declaration_events);
    }

    #[test]
    fn tracing_plugin_builders() {
        let plugin = TracingPlugin::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Json)
            .with_env_filter("ambients_scope=debug")
            .with_span_events(true)
            .with_declaration_events(true);

        assert_eq!(plugin.config().level, Level::DEBUG);
        assert_eq!(plugin.config().format, TracingFormat::Json);
        assert_eq!(plugin.env_filter, Some("ambients_scope=debug".to_string()));
        assert!(plugin.span_events);
        assert!(plugin.declaration_events);
    }

    #[test]
    fn invalid_env_filter_falls_back_to_level() {
        let plugin = TracingPlugin::new()
            .with_level(Level::WARN)
            .with_env_filter("ambients_scope=[");
        assert_eq!(
            plugin.env_filter().max_level_hint(),
            Some(tracing::level_filters::LevelFilter::WARN)
        );
    }

    #[test]
    fn declaration_logger_is_opt_in() {
        let mut stack = Stack::new();
        stack.add_plugins(TracingPlugin::default());
        stack.finish();
        assert!(stack.options().resource_transformations.is_empty());

        let mut stack = Stack::new();
        stack.add_plugins(TracingPlugin::default().with_declaration_events(true));
        stack.finish();
        assert_eq!(
            stack.options().resource_transformations.names(),
            vec![DECLARATION_EVENTS]
        );
    }
}
