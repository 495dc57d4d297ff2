//! Job definition loading
//!
//! A job definition declares the remotes a checkout fetches from and the
//! checkout decorators (extensions) applied to it. It is read from
//! `.lfs-checkout.toml`, either next to the build's working directory or at
//! the root of the enclosing repository's work tree.
//!
//! # File Format
//!
//! ```toml
//! [[remotes]]
//! name = "origin"
//! url = "https://git.example.com/${PROJECT}.git"
//!
//! [[remotes]]
//! name = "upstream"
//! url = "https://git.example.com/upstream/${PROJECT}.git"
//!
//! [[extensions]]
//! kind = "git-lfs-pull"
//! fetch_include = "assets/**"
//! fetch_exclude = "*.psd"
//! ```
//!
//! Remote order is preserved exactly as written. Extension parameters other
//! than `kind` are kept as a raw table and interpreted by the descriptor
//! registered for that kind.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::constants::CONFIG_FILE_NAME;

/// Top-level job definition
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct JobConfig {
    /// Remotes in configuration order; the first one is authoritative
    #[serde(default)]
    pub remotes: Vec<RemoteConfig>,

    /// Checkout decorators, applied in the order they are listed
    #[serde(default)]
    pub extensions: Vec<ExtensionConfig>,
}

/// A named remote repository location
///
/// Both fields may contain `${VAR}` placeholders that are expanded per build.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RemoteConfig {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl RemoteConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One `[[extensions]]` entry
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExtensionConfig {
    /// Registry identifier of the decorator, e.g. `git-lfs-pull`
    pub kind: String,

    /// Remaining keys, passed verbatim to the decorator factory
    #[serde(flatten)]
    pub params: toml::Table,
}

impl JobConfig {
    /// Parses a job definition from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse job definition")
    }

    /// Loads configuration using `path` as the lookup context
    ///
    /// Lookup order:
    ///
    /// 1. `path/.lfs-checkout.toml`
    /// 2. `.lfs-checkout.toml` at the root of the repository discovered from `path`
    ///
    /// Returns the default (empty) configuration when neither exists.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use git_lfs_checkout::config::JobConfig;
    /// use std::path::Path;
    ///
    /// let config = JobConfig::load_from_path(Path::new("/path/to/workspace"))
    ///     .expect("Failed to load job definition");
    /// println!("{} remote(s) configured", config.remotes.len());
    /// ```
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let local = path.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Ok(repo) = git2::Repository::discover(path) {
            if let Some(workdir) = repo.workdir() {
                let config_path = workdir.join(CONFIG_FILE_NAME);
                if config_path.exists() {
                    return Self::load_from_file(&config_path);
                }
            }
        }

        debug!("No {} found from {}", CONFIG_FILE_NAME, path.display());
        Ok(JobConfig::default())
    }

    /// Loads configuration from a specific file
    ///
    /// Unlike the lookup in [`JobConfig::load_from_path`], a file that cannot
    /// be read or parsed is an error: a broken job definition must not
    /// silently turn into an empty one.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid job definition in {}", path.display()))?;

        debug!(
            "Loaded {} remote(s) and {} extension(s) from {}",
            config.remotes.len(),
            config.extensions.len(),
            path.display()
        );
        Ok(config)
    }
}
