//! Git client abstraction
//!
//! The checkout pipeline talks to the work tree through [`GitInterface`] so
//! decorator chains can be exercised without a repository or an installed
//! `git-lfs`. [`RealGitInterface`] uses `git2` to inspect the repository and
//! shells out to `git lfs` for the transfer itself; [`MockGitInterface`]
//! records what would have been run.

use anyhow::Result;
use std::path::PathBuf;

pub mod mock_git;
pub mod real_git;

pub use mock_git::MockGitInterface;
pub use real_git::RealGitInterface;

/// Operations the checkout pipeline needs from the git client
pub trait GitInterface: Send {
    /// Root of the work tree the checkout populates
    fn workdir(&self) -> Result<PathBuf>;

    /// URL of remote `name`, or `None` if the work tree has no such remote
    fn remote_url(&self, name: &str) -> Result<Option<String>>;

    /// Runs `git lfs <args>` in the work tree and returns its standard output
    fn run_lfs(&self, args: &[String]) -> Result<String>;
}
