use super::*;
use anyhow::{anyhow, bail, Context};
use git2::{ErrorCode, Repository};
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::constants::{GIT_COMMAND, LFS_SUBCOMMAND};

/// Implementation of GitInterface backed by a repository on disk
pub struct RealGitInterface {
    repo: Repository,
    workdir: PathBuf,
}

impl RealGitInterface {
    /// Open the repository containing `path`
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| anyhow!("Repository has no working directory"))?
            .to_path_buf();

        Ok(Self { repo, workdir })
    }
}

impl GitInterface for RealGitInterface {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(Some(remote.url().unwrap_or_default().to_string())),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to look up remote '{}'", name)),
        }
    }

    fn run_lfs(&self, args: &[String]) -> Result<String> {
        debug!("git lfs {:?} in {}", args, self.workdir.display());
        let output = Command::new(GIT_COMMAND)
            .arg(LFS_SUBCOMMAND)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .context("Failed to execute git lfs")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git lfs {} failed: {}", args.join(" "), stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
