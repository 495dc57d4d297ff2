//! lfs-checkout - run the checkout decorators of a job definition
//!
//! Loads `.lfs-checkout.toml` for a workspace, applies the declared checkout
//! decorators and runs the resulting `git lfs` command in the work tree.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use git_lfs_checkout::build::{JobBuild, StreamListener};
use git_lfs_checkout::checkout::GitCheckoutCommand;
use git_lfs_checkout::config::JobConfig;
use git_lfs_checkout::constants::{
    section_header, DEFAULT_LOG_FILTER, ENV_LOG_FILTER, GIT_COMMAND, LFS_SUBCOMMAND,
};
use git_lfs_checkout::decorator::DecoratorRegistry;
use git_lfs_checkout::git_interface::RealGitInterface;

/// Command-line arguments for lfs-checkout
#[derive(Parser)]
#[command(name = "lfs-checkout")]
#[command(version, about = "Apply checkout decorators and pull Git LFS objects", long_about = None)]
struct Cli {
    /// Work tree to operate on
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    /// Job definition file (defaults to .lfs-checkout.toml lookup from --repo)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build parameter used for ${VAR} expansion, as KEY=VALUE
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Print the git lfs command instead of running it
    #[arg(long)]
    dry_run: bool,

    /// List available checkout decorators and exit
    #[arg(short, long)]
    list: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let registry = DecoratorRegistry::with_defaults();

    if cli.list {
        println!("{}", section_header("Checkout decorators"));
        for descriptor in registry.descriptors() {
            println!(
                "  {}  {}",
                descriptor.id().bright_white().bold(),
                descriptor.display_name()
            );
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => JobConfig::load_from_file(path)?,
        None => JobConfig::load_from_path(&cli.repo)?,
    };
    let pipeline = registry
        .build_pipeline(&config)
        .context("Failed to set up checkout decorators")?;

    // Explicit --param values win over the process environment
    let build = JobBuild::new(config.remotes.clone())
        .with_environment()
        .with_parameters(cli.params);
    let mut listener = StreamListener::new(io::stdout());

    if cli.dry_run {
        let mut cmd = GitCheckoutCommand::new();
        pipeline.decorate(&build, &mut listener, &mut cmd)?;
        match cmd.lfs_pull_args()? {
            Some(args) => println!(
                "{} {} {}",
                GIT_COMMAND,
                LFS_SUBCOMMAND,
                args.join(" ").bright_green()
            ),
            None => println!("{}", "No LFS pull requested".yellow()),
        }
        return Ok(());
    }

    let git = RealGitInterface::discover(&cli.repo)?;
    let cmd = pipeline.run(&build, &mut listener, &git)?;
    if !cmd.is_lfs_requested() {
        println!("{}", "No LFS pull requested".yellow());
    }
    Ok(())
}
