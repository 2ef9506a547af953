//! Configuration for a synchronized root
//!
//! Two layers: an optional user-level file under the platform config
//! directory, overridden by `.foldsync.toml` inside the synchronized root.
//! Every field has a default, so running with no config file at all works.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-root configuration file.
pub const CONFIG_FILE_NAME: &str = ".foldsync.toml";

fn default_branch() -> String {
    "master".to_string()
}

fn default_local_prefix() -> String {
    "LOCAL_".to_string()
}

fn default_remote_prefix() -> String {
    "REMOTE_".to_string()
}

fn default_log_file() -> String {
    "sync_log.txt".to_string()
}

fn default_store_file() -> String {
    ".file_hashes.txt".to_string()
}

fn default_probe_host() -> String {
    "github.com".to_string()
}

fn default_probe_port() -> u16 {
    443
}

fn default_timeout_secs() -> u64 {
    5
}

/// Reachability probe settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkSection {
    /// Well-known endpoint whose reachability stands in for "online"
    #[serde(default = "default_probe_host")]
    pub probe_host: String,

    #[serde(default = "default_probe_port")]
    pub probe_port: u16,

    /// Bounded connection timeout; a timeout counts as unreachable
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            probe_host: default_probe_host(),
            probe_port: default_probe_port(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Configuration for one synchronized root, parsed from TOML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    /// Synchronized root; usually supplied on the command line, but an
    /// unattended install can pin it here
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Branch shared by every machine syncing this root
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Prefix for the preserved local version of a conflicted file
    #[serde(default = "default_local_prefix")]
    pub local_prefix: String,

    /// Prefix for the preserved remote version of a conflicted file
    #[serde(default = "default_remote_prefix")]
    pub remote_prefix: String,

    /// Run journal, relative to the root
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Fingerprint store, relative to the root
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Applied to the backend once per run when non-empty
    #[serde(default)]
    pub http_proxy: Option<String>,

    #[serde(default)]
    pub https_proxy: Option<String>,

    #[serde(default)]
    pub network: NetworkSection,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: None,
            branch: default_branch(),
            local_prefix: default_local_prefix(),
            remote_prefix: default_remote_prefix(),
            log_file: default_log_file(),
            store_file: default_store_file(),
            http_proxy: None,
            https_proxy: None,
            network: NetworkSection::default(),
        }
    }
}

impl SyncConfig {
    /// Parse a configuration from TOML content.
    ///
    /// # Example
    ///
    /// ```
    /// use sync_core::SyncConfig;
    ///
    /// let config = SyncConfig::parse(r#"
    /// branch = "main"
    ///
    /// [network]
    /// probe_host = "example.com"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.branch, "main");
    /// assert_eq!(config.local_prefix, "LOCAL_");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Merge another configuration into this one.
    ///
    /// `other` takes precedence for every field it sets away from the
    /// default; unset fields keep this configuration's values.
    pub fn merge(&mut self, other: &SyncConfig) {
        if other.root.is_some() {
            self.root = other.root.clone();
        }
        if other.branch != default_branch() {
            self.branch = other.branch.clone();
        }
        if other.local_prefix != default_local_prefix() {
            self.local_prefix = other.local_prefix.clone();
        }
        if other.remote_prefix != default_remote_prefix() {
            self.remote_prefix = other.remote_prefix.clone();
        }
        if other.log_file != default_log_file() {
            self.log_file = other.log_file.clone();
        }
        if other.store_file != default_store_file() {
            self.store_file = other.store_file.clone();
        }
        if other.http_proxy.is_some() {
            self.http_proxy = other.http_proxy.clone();
        }
        if other.https_proxy.is_some() {
            self.https_proxy = other.https_proxy.clone();
        }
        if other.network != NetworkSection::default() {
            self.network = other.network.clone();
        }
    }

    /// Resolve the effective configuration for `root`.
    ///
    /// Layering, lowest precedence first: built-in defaults, the user-level
    /// file under the platform config directory, then `.foldsync.toml`
    /// inside the root.
    pub fn discover(root: &Path) -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_dir) = dirs::config_dir() {
            let user_file = config_dir.join("foldsync/config.toml");
            if user_file.exists() {
                config.merge(&Self::parse(&fs::read_to_string(&user_file)?)?);
            }
        }

        let root_file = root.join(CONFIG_FILE_NAME);
        if root_file.exists() {
            config.merge(&Self::parse(&fs::read_to_string(&root_file)?)?);
        }

        Ok(config)
    }

    /// Resolve the synchronized root from an explicit override, this
    /// configuration, or the current directory, canonicalized.
    pub fn resolve_root(&self, cli_root: Option<&Path>) -> Result<PathBuf> {
        let candidate = match cli_root {
            Some(path) => path.to_path_buf(),
            None => match &self.root {
                Some(path) => path.clone(),
                None => std::env::current_dir()?,
            },
        };

        let resolved = dunce::canonicalize(&candidate).map_err(|_| Error::InvalidConfig {
            message: format!("synchronized root does not exist: {}", candidate.display()),
        })?;

        if !resolved.is_dir() {
            return Err(Error::InvalidConfig {
                message: format!("synchronized root is not a directory: {}", resolved.display()),
            });
        }
        Ok(resolved)
    }
}
