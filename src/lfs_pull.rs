//! Git LFS pull after checkout
//!
//! [`GitLfsPull`] is a checkout decorator that asks the git client to pull
//! LFS objects once the checkout is done, limited to the configured
//! include/exclude patterns and pinned to a single remote.
//!
//! # Remote Selection
//!
//! A job may declare several remotes, but only one repository is treated as
//! authoritative: the first remote in configuration order. Independent
//! multi-repository jobs are not supported, so selection is purely
//! positional. See [`select_lfs_remote`].
//!
//! # Configuration
//!
//! ```toml
//! [[extensions]]
//! kind = "git-lfs-pull"
//! fetch_include = "assets/**"
//! fetch_exclude = "*.psd"
//! ```
//!
//! Both keys are optional. Pattern syntax is not checked here; the values
//! are passed to `git lfs` as given.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

use crate::build::{BuildContext, TaskListener};
use crate::checkout::CheckoutCommand;
use crate::config::RemoteConfig;
use crate::constants::{
    DISPLAY_NULL, LFS_PULL_DISPLAY_NAME, LFS_PULL_ID, LOG_ENABLING_LFS_PULL,
};
use crate::decorator::{CheckoutDecorator, DecoratorDescriptor};

/// Pull LFS objects after the checkout
///
/// Equality and hashing are structural over both patterns. An absent
/// pattern (`None`) and an empty one (`Some("")`) are different values even
/// though both mean "no filter" to `git lfs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GitLfsPull {
    #[serde(default)]
    fetch_include: Option<String>,
    #[serde(default)]
    fetch_exclude: Option<String>,
}

impl GitLfsPull {
    pub fn new(fetch_include: Option<String>, fetch_exclude: Option<String>) -> Self {
        Self {
            fetch_include,
            fetch_exclude,
        }
    }

    pub fn fetch_include(&self) -> Option<&str> {
        self.fetch_include.as_deref()
    }

    pub fn fetch_exclude(&self) -> Option<&str> {
        self.fetch_exclude.as_deref()
    }
}

/// Picks the remote LFS objects are pulled from
///
/// Returns the name of the first remote, or `None` for an empty list. The
/// remaining entries are ignored.
///
/// # Example
///
/// ```
/// use git_lfs_checkout::config::RemoteConfig;
/// use git_lfs_checkout::lfs_pull::select_lfs_remote;
///
/// let remotes = vec![
///     RemoteConfig::new("origin", "https://example.com/a.git"),
///     RemoteConfig::new("upstream", "https://example.com/b.git"),
/// ];
/// assert_eq!(select_lfs_remote(&remotes), Some("origin"));
/// assert_eq!(select_lfs_remote(&[]), None);
/// ```
pub fn select_lfs_remote(remotes: &[RemoteConfig]) -> Option<&str> {
    remotes.first().map(|remote| remote.name.as_str())
}

impl CheckoutDecorator for GitLfsPull {
    fn decorate_checkout_command(
        &self,
        build: &dyn BuildContext,
        listener: &mut dyn TaskListener,
        cmd: &mut dyn CheckoutCommand,
    ) -> Result<()> {
        writeln!(listener.logger(), "{}", LOG_ENABLING_LFS_PULL)?;

        let remotes = build.param_expanded_remotes(listener)?;
        // Should never be empty; tolerate it and let git lfs pick the remote.
        if let Some(remote) = select_lfs_remote(&remotes) {
            cmd.lfs_remote(Some(remote));
        }
        cmd.lfs_fetch_options(self.fetch_include(), self.fetch_exclude());
        Ok(())
    }
}

impl fmt::Display for GitLfsPull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GitLfsPull{{fetch_include={}, fetch_exclude={}}}",
            Quoted(self.fetch_include()),
            Quoted(self.fetch_exclude())
        )
    }
}

/// `'value'`, or a bare `null` when absent
struct Quoted<'a>(Option<&'a str>);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "'{}'", value),
            None => f.write_str(DISPLAY_NULL),
        }
    }
}

/// Registry entry for [`GitLfsPull`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLfsPullDescriptor;

impl DecoratorDescriptor for GitLfsPullDescriptor {
    fn id(&self) -> &'static str {
        LFS_PULL_ID
    }

    fn display_name(&self) -> &'static str {
        LFS_PULL_DISPLAY_NAME
    }

    fn create(&self, params: &toml::Table) -> Result<Box<dyn CheckoutDecorator>> {
        let decorator: GitLfsPull = toml::Value::Table(params.clone())
            .try_into()
            .with_context(|| format!("Invalid parameters for '{}'", LFS_PULL_ID))?;
        Ok(Box::new(decorator))
    }
}
