//! Server catalog parsing and validation.
//!
//! A catalog is a TOML file naming the MCP servers this tool may probe,
//! each entry carrying the launch command, arguments, environment
//! overrides, and a per-server discovery timeout:
//!
//! ```toml
//! [servers.github]
//! command = "npx"
//! args = ["-y", "@modelcontextprotocol/server-github"]
//! timeout_seconds = 15
//!
//! [servers.github.env]
//! GITHUB_TOKEN = "..."
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::discovery::LaunchSpec;
use crate::{AppError, Result};

fn default_timeout_seconds() -> u64 {
    15
}

/// One named MCP server in the catalog.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ServerEntry {
    /// Executable path or name to launch.
    pub command: String,
    /// Arguments passed to the command, in order.
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment overrides merged over the inherited environment.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Discovery timeout for this server.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Skip this entry when probing the whole catalog.
    #[serde(default)]
    pub disabled: bool,
}

impl ServerEntry {
    /// Build the launch spec used to probe this server.
    #[must_use]
    pub fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec {
            command: self.command.clone(),
            args: self.args.clone(),
            env: self.env.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

/// Server catalog parsed from a TOML file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ScoutConfig {
    /// Named servers keyed by catalog name. Name order is the probe order.
    #[serde(default)]
    pub servers: BTreeMap<String, ServerEntry>,
}

impl ScoutConfig {
    /// Parse and validate a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the TOML is malformed or an entry
    /// fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a catalog from a file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or fails
    /// [`Self::from_toml_str`] validation.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("cannot read {}: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Look up a named entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no entry with that name exists.
    pub fn entry(&self, name: &str) -> Result<&ServerEntry> {
        self.servers
            .get(name)
            .ok_or_else(|| AppError::Config(format!("unknown server '{name}'")))
    }

    /// Entries that are not disabled, in name order.
    #[must_use]
    pub fn enabled(&self) -> Vec<(&str, &ServerEntry)> {
        self.servers
            .iter()
            .filter(|(_, entry)| !entry.disabled)
            .map(|(name, entry)| (name.as_str(), entry))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        for (name, entry) in &self.servers {
            if entry.command.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "server '{name}' has an empty command"
                )));
            }
        }
        Ok(())
    }
}
