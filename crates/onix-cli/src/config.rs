//! Configuration loading and layering
//!
//! Values are resolved in order: defaults, configuration file, environment,
//! command-line flags. Environment and flags are both read through clap, so
//! this module only merges the file with the parsed arguments.

use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{WrapErr, eyre};
use onix_client::{AuthMode, ClientSettings, Credentials, normalize_uri};
use serde::{Deserialize, Serialize};

use crate::cli::ConnectionArgs;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub onix: OnixConfig,
}

/// `[onix]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnixConfig {
    /// Network address of the WAPI
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Natural key of the inventory to import
    pub inventory_key: Option<String>,
    /// Tag of the inventory snapshot to import
    pub inventory_tag: Option<String>,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default)]
    pub auth_mode: AuthMode,
    pub token_uri: Option<String>,
    pub client_id: Option<String>,
    pub secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log filter used when `OX_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for OnixConfig {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            inventory_key: None,
            inventory_tag: None,
            verify_ssl: default_verify_ssl(),
            auth_mode: AuthMode::default(),
            token_uri: None,
            client_id: None,
            secret: None,
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

fn default_verify_ssl() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load the explicit path if given, else the first default path that exists
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_default(explicit: Option<&Path>) -> eyre::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let paths = [
            Some(PathBuf::from("onix.toml")),
            dirs::config_dir().map(|p| p.join("onix/onix.toml")),
        ];

        for path in paths.into_iter().flatten() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Config::default())
    }
}

/// Effective connection settings after layering
#[derive(Debug, Clone)]
pub struct Settings {
    pub uri: Option<String>,
    pub verify_ssl: bool,
    pub auth_mode: AuthMode,
    pub credentials: Credentials,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Settings {
    /// Merge the configuration file with command-line/environment values
    #[must_use]
    pub fn resolve(file: &OnixConfig, args: &ConnectionArgs) -> Self {
        fn pick(arg: Option<&String>, file: Option<&String>) -> Option<String> {
            arg.or(file).cloned()
        }

        Self {
            uri: pick(args.uri.as_ref(), file.host.as_ref()).map(|uri| normalize_uri(&uri)),
            verify_ssl: args.verify_ssl.unwrap_or(file.verify_ssl),
            auth_mode: args.auth_mode.unwrap_or(file.auth_mode),
            credentials: Credentials {
                username: pick(args.username.as_ref(), file.username.as_ref()),
                password: pick(args.password.as_ref(), file.password.as_ref()),
                token_uri: pick(args.token_uri.as_ref(), file.token_uri.as_ref()),
                client_id: pick(args.client_id.as_ref(), file.client_id.as_ref()),
                secret: pick(args.secret.as_ref(), file.secret.as_ref()),
            },
            token: args.token.clone().filter(|token| !token.is_empty()),
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(file.timeout_secs)),
        }
    }

    /// Client settings; fails when no WAPI address was configured
    ///
    /// # Errors
    /// Returns error if the host is missing
    pub fn client_settings(&self) -> eyre::Result<ClientSettings> {
        let uri = self
            .uri
            .clone()
            .ok_or_else(|| eyre!("the WAPI host is not set (use --uri or OX_HOST)"))?;

        Ok(ClientSettings {
            uri,
            verify_ssl: self.verify_ssl,
            timeout: self.timeout,
        })
    }
}
