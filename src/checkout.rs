//! Checkout command builder
//!
//! The checkout pipeline hands every decorator a mutable [`CheckoutCommand`].
//! Decorators only ever touch the LFS settings of the command; everything
//! else about the checkout belongs to the git client.

use anyhow::{bail, Result};

use crate::constants::{LFS_EXCLUDE_FLAG, LFS_INCLUDE_FLAG, LFS_PULL};

/// Mutators a checkout decorator may apply to the pending checkout
pub trait CheckoutCommand {
    /// Pull LFS objects from `remote` after checkout
    ///
    /// `None` lets the LFS tool resolve its default remote.
    fn lfs_remote(&mut self, remote: Option<&str>);

    /// Restrict the LFS pull to paths matching `include` and not matching
    /// `exclude`
    ///
    /// Absent and empty patterns both mean "no restriction".
    fn lfs_fetch_options(&mut self, include: Option<&str>, exclude: Option<&str>);
}

/// Checkout command for the command-line git client
///
/// Any call to one of the [`CheckoutCommand`] mutators requests an LFS pull.
/// Later calls replace the values set by earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitCheckoutCommand {
    lfs_requested: bool,
    lfs_remote: Option<String>,
    lfs_include: Option<String>,
    lfs_exclude: Option<String>,
}

impl GitCheckoutCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lfs_requested(&self) -> bool {
        self.lfs_requested
    }

    pub fn lfs_remote_name(&self) -> Option<&str> {
        self.lfs_remote.as_deref()
    }

    pub fn lfs_include(&self) -> Option<&str> {
        self.lfs_include.as_deref()
    }

    pub fn lfs_exclude(&self) -> Option<&str> {
        self.lfs_exclude.as_deref()
    }

    /// Arguments for `git lfs`, or `None` when no decorator asked for a pull
    ///
    /// The remote is passed positionally, so a name starting with `-` is
    /// rejected rather than handed to `git lfs` as an option.
    ///
    /// # Example
    ///
    /// ```
    /// use git_lfs_checkout::checkout::{CheckoutCommand, GitCheckoutCommand};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let mut cmd = GitCheckoutCommand::new();
    /// cmd.lfs_remote(Some("origin"));
    /// cmd.lfs_fetch_options(Some("*.bin"), Some(""));
    ///
    /// assert_eq!(
    ///     cmd.lfs_pull_args()?,
    ///     Some(vec!["pull".to_string(), "origin".to_string(), "-I".to_string(), "*.bin".to_string()])
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn lfs_pull_args(&self) -> Result<Option<Vec<String>>> {
        if !self.lfs_requested {
            return Ok(None);
        }

        let mut args = vec![LFS_PULL.to_string()];
        if let Some(remote) = non_empty(self.lfs_remote.as_deref()) {
            if remote.starts_with('-') {
                bail!("Invalid LFS remote name '{}': must not start with '-'", remote);
            }
            args.push(remote.to_string());
        }
        if let Some(include) = non_empty(self.lfs_include.as_deref()) {
            args.push(LFS_INCLUDE_FLAG.to_string());
            args.push(include.to_string());
        }
        if let Some(exclude) = non_empty(self.lfs_exclude.as_deref()) {
            args.push(LFS_EXCLUDE_FLAG.to_string());
            args.push(exclude.to_string());
        }
        Ok(Some(args))
    }
}

impl CheckoutCommand for GitCheckoutCommand {
    fn lfs_remote(&mut self, remote: Option<&str>) {
        self.lfs_requested = true;
        self.lfs_remote = remote.map(str::to_string);
    }

    fn lfs_fetch_options(&mut self, include: Option<&str>, exclude: Option<&str>) {
        self.lfs_requested = true;
        self.lfs_include = include.map(str::to_string);
        self.lfs_exclude = exclude.map(str::to_string);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
