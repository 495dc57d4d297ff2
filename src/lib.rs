//! Git LFS Checkout - checkout decorators for build pipelines
//!
//! This crate implements the contract between a checkout pipeline and the
//! decorators that may adjust a checkout before it runs, together with one
//! decorator: pulling Git LFS objects after the checkout from the job's
//! authoritative remote.
//!
//! # Features
//!
//! - **LFS Pull**: Pull LFS objects limited by include/exclude patterns
//! - **Remote Selection**: The first configured remote is authoritative
//! - **Decorator Registry**: Explicit registration of available decorator kinds
//! - **Job Definitions**: Remotes and decorators declared in `.lfs-checkout.toml`
//! - **Parameter Expansion**: `${VAR}` placeholders in remote names and URLs
//!
//! # Architecture
//!
//! - [`build`] - Build context, parameter expansion and the build log
//! - [`checkout`] - The checkout command decorators mutate
//! - [`config`] - Job definition loading
//! - [`constants`] - Fixed strings shared with the host system
//! - [`decorator`] - Decorator contract and registry
//! - [`git_interface`] - Git client abstraction (real and mock)
//! - [`lfs_pull`] - The LFS pull decorator and remote selection
//! - [`pipeline`] - Sequential decorator chain and LFS execution
//!
//! # Usage Example
//!
//! ```no_run
//! use git_lfs_checkout::build::{JobBuild, StreamListener};
//! use git_lfs_checkout::config::JobConfig;
//! use git_lfs_checkout::decorator::DecoratorRegistry;
//! use git_lfs_checkout::git_interface::RealGitInterface;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let workspace = Path::new("/path/to/workspace");
//! let config = JobConfig::load_from_path(workspace)?;
//! let pipeline = DecoratorRegistry::with_defaults().build_pipeline(&config)?;
//!
//! let build = JobBuild::new(config.remotes.clone()).with_environment();
//! let git = RealGitInterface::discover(workspace)?;
//! let mut listener = StreamListener::new(std::io::stdout());
//!
//! pipeline.run(&build, &mut listener, &git)?;
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod checkout;
pub mod config;
pub mod constants;
pub mod decorator;
pub mod git_interface;
pub mod lfs_pull;
pub mod pipeline;
