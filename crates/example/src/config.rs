//! Command-line configuration.

/// What to deploy and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// Subscription every resource is bound to.
    pub subscription_id: String,
    /// Name of the resource group holding the deployment.
    pub resource_group: String,
    /// Location of the resource group.
    pub location: String,
    /// One web app and blob container per entry.
    pub apps: Vec<String>,
}

/// Errors from parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required positional argument is missing.
    #[error("missing argument <{0}>")]
    Missing(&'static str),
    /// The same app name was given twice.
    #[error("app '{0}' is listed more than once")]
    DuplicateApp(String),
}

impl DeploymentConfig {
    /// Creates a config without apps.
    #[must_use]
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            location: location.into(),
            apps: Vec::new(),
        }
    }

    /// Adds an app.
    #[must_use]
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.apps.push(app.into());
        self
    }

    /// Parses `<subscription> <resource-group> <location> [apps...]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a positional argument is missing or an app
    /// is repeated.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut next = |name| args.next().ok_or(ConfigError::Missing(name));

        let mut config = Self::new(
            next("subscription")?,
            next("resource-group")?,
            next("location")?,
        );
        for app in args {
            if config.apps.contains(&app) {
                return Err(ConfigError::DuplicateApp(app));
            }
            config.apps.push(app);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_positionals_and_apps() {
        let config =
            DeploymentConfig::from_args(args(&["sub-1", "rg-web", "westus", "api", "admin"]))
                .unwrap();
        assert_eq!(
            config,
            DeploymentConfig::new("sub-1", "rg-web", "westus")
                .with_app("api")
                .with_app("admin")
        );
    }

    #[test]
    fn missing_location() {
        assert_eq!(
            DeploymentConfig::from_args(args(&["sub-1", "rg-web"])),
            Err(ConfigError::Missing("location"))
        );
    }

    #[test]
    fn repeated_app() {
        assert_eq!(
            DeploymentConfig::from_args(args(&["sub-1", "rg", "westus", "api", "api"])),
            Err(ConfigError::DuplicateApp("api".to_string()))
        );
    }
}
