//! Checkout pipeline
//!
//! The pipeline owns the ordered list of decorators configured for a job.
//! For each checkout it creates a fresh [`GitCheckoutCommand`], lets every
//! decorator adjust it in turn and then asks the git client to carry out the
//! LFS pull the decorators requested.
//!
//! Decorators run sequentially on the calling thread. The first failure
//! stops the chain and is returned as is; nothing is retried.

use anyhow::Result;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::build::{BuildContext, TaskListener};
use crate::checkout::{CheckoutCommand, GitCheckoutCommand};
use crate::decorator::CheckoutDecorator;
use crate::git_interface::GitInterface;

/// Ordered chain of checkout decorators
#[derive(Debug, Default)]
pub struct CheckoutPipeline {
    decorators: Vec<Box<dyn CheckoutDecorator>>,
}

impl CheckoutPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decorator to the end of the chain
    pub fn push(&mut self, decorator: Box<dyn CheckoutDecorator>) {
        self.decorators.push(decorator);
    }

    pub fn decorators(&self) -> impl Iterator<Item = &dyn CheckoutDecorator> {
        self.decorators.iter().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Applies every decorator to `cmd`, in order
    pub fn decorate(
        &self,
        build: &dyn BuildContext,
        listener: &mut dyn TaskListener,
        cmd: &mut dyn CheckoutCommand,
    ) -> Result<()> {
        for decorator in &self.decorators {
            debug!("Applying checkout decorator {}", decorator);
            decorator.decorate_checkout_command(build, listener, cmd)?;
        }
        Ok(())
    }

    /// Decorates a new checkout command and runs the requested LFS pull
    ///
    /// Returns the decorated command so callers can inspect what was run.
    pub fn run(
        &self,
        build: &dyn BuildContext,
        listener: &mut dyn TaskListener,
        git: &dyn GitInterface,
    ) -> Result<GitCheckoutCommand> {
        let mut cmd = GitCheckoutCommand::new();
        self.decorate(build, listener, &mut cmd)?;

        let Some(args) = cmd.lfs_pull_args()? else {
            debug!("No decorator requested an LFS pull");
            return Ok(cmd);
        };

        if let Some(remote) = cmd.lfs_remote_name().filter(|r| !r.is_empty()) {
            check_remote(git, remote);
        }

        info!("Running git lfs {}", args.join(" "));
        let output = git.run_lfs(&args)?;
        if !output.is_empty() {
            writeln!(listener.logger(), "{}", output)?;
        }
        Ok(cmd)
    }
}

/// Warns when `remote` is unknown to the work tree; lookup errors are
/// only logged and never stop the checkout
fn check_remote(git: &dyn GitInterface, remote: &str) {
    match git.remote_url(remote) {
        Ok(Some(_)) => {}
        Ok(None) => match git.workdir() {
            Ok(workdir) => warn!(
                "LFS remote '{}' is not configured in {}",
                remote,
                workdir.display()
            ),
            Err(_) => warn!("LFS remote '{}' is not configured in the work tree", remote),
        },
        Err(e) => warn!("Failed to look up LFS remote '{}': {:#}", remote, e),
    }
}
