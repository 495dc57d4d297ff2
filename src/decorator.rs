//! Checkout decorator contract and registry
//!
//! A checkout decorator observes a pending checkout and adjusts the command
//! before the git client runs it. Decorators are plain trait objects; the
//! host lists the available kinds through a [`DecoratorRegistry`] populated
//! explicitly at startup.
//!
//! # Example
//!
//! ```
//! use git_lfs_checkout::decorator::DecoratorRegistry;
//!
//! let registry = DecoratorRegistry::with_defaults();
//! let names: Vec<&str> = registry.descriptors().map(|d| d.display_name()).collect();
//! assert_eq!(names, vec!["Git LFS pull after checkout"]);
//! ```

use anyhow::{anyhow, bail, Result};
use std::fmt;
use tracing::debug;

use crate::build::{BuildContext, TaskListener};
use crate::checkout::CheckoutCommand;
use crate::config::JobConfig;
use crate::lfs_pull::GitLfsPullDescriptor;
use crate::pipeline::CheckoutPipeline;

/// A unit that may modify a checkout before it runs
///
/// Implementations hold only immutable configuration, so one instance can be
/// shared by concurrent builds.
pub trait CheckoutDecorator: fmt::Debug + fmt::Display + Send + Sync {
    /// Adjusts `cmd` for the checkout performed by `build`
    ///
    /// Failures raised by `build`, `listener` or `cmd` are returned unchanged.
    fn decorate_checkout_command(
        &self,
        build: &dyn BuildContext,
        listener: &mut dyn TaskListener,
        cmd: &mut dyn CheckoutCommand,
    ) -> Result<()>;
}

/// Registration metadata and factory for one kind of decorator
pub trait DecoratorDescriptor: Send + Sync {
    /// Identifier used as `kind` in job definitions
    fn id(&self) -> &'static str;

    /// Human-readable name shown when listing available decorators
    fn display_name(&self) -> &'static str;

    /// Builds a decorator from the parameters of an `[[extensions]]` entry
    fn create(&self, params: &toml::Table) -> Result<Box<dyn CheckoutDecorator>>;
}

/// Ordered set of known decorator kinds
#[derive(Default)]
pub struct DecoratorRegistry {
    descriptors: Vec<Box<dyn DecoratorDescriptor>>,
}

impl DecoratorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry containing every decorator shipped with this crate
    pub fn with_defaults() -> Self {
        Self {
            descriptors: vec![Box::new(GitLfsPullDescriptor)],
        }
    }

    /// Adds a descriptor; identifiers must be unique
    pub fn register(&mut self, descriptor: Box<dyn DecoratorDescriptor>) -> Result<()> {
        if self.find(descriptor.id()).is_some() {
            bail!("Checkout decorator '{}' is already registered", descriptor.id());
        }
        debug!("Registered checkout decorator '{}'", descriptor.id());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &dyn DecoratorDescriptor> {
        self.descriptors.iter().map(|d| d.as_ref())
    }

    pub fn find(&self, id: &str) -> Option<&dyn DecoratorDescriptor> {
        self.descriptors().find(|d| d.id() == id)
    }

    /// Instantiates the decorator registered as `id`
    pub fn create(&self, id: &str, params: &toml::Table) -> Result<Box<dyn CheckoutDecorator>> {
        let descriptor = self
            .find(id)
            .ok_or_else(|| anyhow!("Unknown checkout decorator '{}'", id))?;
        descriptor.create(params)
    }

    /// Builds the decorator chain declared by `config`, in declaration order
    pub fn build_pipeline(&self, config: &JobConfig) -> Result<CheckoutPipeline> {
        let mut pipeline = CheckoutPipeline::new();
        for extension in &config.extensions {
            pipeline.push(self.create(&extension.kind, &extension.params)?);
        }
        Ok(pipeline)
    }
}

impl fmt::Debug for DecoratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.descriptors().map(|d| d.id()))
            .finish()
    }
}
