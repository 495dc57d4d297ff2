use super::*;
use anyhow::bail;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Mock implementation of GitInterface for testing
///
/// Clones share the recorded invocations, so a test can hand one clone to
/// the code under test and inspect another.
#[derive(Clone)]
pub struct MockGitInterface {
    state: Arc<Mutex<GitState>>,
}

#[derive(Debug, Clone)]
struct GitState {
    workdir: PathBuf,
    remotes: HashMap<String, String>,
    lfs_output: String,
    lfs_failure: Option<String>,
    remote_lookup_failure: Option<String>,
    lfs_invocations: Vec<Vec<String>>,
}

impl Default for MockGitInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGitInterface {
    /// Create a new mock with no remotes and a succeeding `git lfs`
    pub fn new() -> Self {
        let state = GitState {
            workdir: PathBuf::from("/mock/repo"),
            remotes: HashMap::new(),
            lfs_output: String::new(),
            lfs_failure: None,
            remote_lookup_failure: None,
            lfs_invocations: Vec::new(),
        };

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Add a remote to the mock work tree
    pub fn with_remote(self, name: &str, url: &str) -> Self {
        self.lock().remotes.insert(name.to_string(), url.to_string());
        self
    }

    /// Make every `git lfs` invocation print `output`
    pub fn with_output(self, output: &str) -> Self {
        self.lock().lfs_output = output.to_string();
        self
    }

    /// Make every `git lfs` invocation fail with `message`
    pub fn failing_with(self, message: &str) -> Self {
        self.lock().lfs_failure = Some(message.to_string());
        self
    }

    /// Make every remote lookup fail with `message`
    pub fn failing_remote_lookup(self, message: &str) -> Self {
        self.lock().remote_lookup_failure = Some(message.to_string());
        self
    }

    /// Arguments of every `git lfs` invocation, in call order
    pub fn lfs_invocations(&self) -> Vec<Vec<String>> {
        self.lock().lfs_invocations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GitInterface for MockGitInterface {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.lock().workdir.clone())
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        let state = self.lock();
        if let Some(message) = &state.remote_lookup_failure {
            bail!("Failed to look up remote '{}': {}", name, message);
        }
        Ok(state.remotes.get(name).cloned())
    }

    fn run_lfs(&self, args: &[String]) -> Result<String> {
        let mut state = self.lock();
        state.lfs_invocations.push(args.to_vec());
        if let Some(message) = &state.lfs_failure {
            bail!("git lfs {} failed: {}", args.join(" "), message);
        }
        Ok(state.lfs_output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_invocations_across_clones() -> Result<()> {
        let mock = MockGitInterface::new();
        let handle = mock.clone();

        mock.run_lfs(&["pull".to_string()])?;
        mock.run_lfs(&["pull".to_string(), "origin".to_string()])?;

        assert_eq!(handle.lfs_invocations().len(), 2);
        assert_eq!(handle.lfs_invocations()[1][1], "origin");
        Ok(())
    }

    #[test]
    fn test_failure_is_still_recorded() {
        let mock = MockGitInterface::new().failing_with("offline");
        assert!(mock.run_lfs(&["pull".to_string()]).is_err());
        assert_eq!(mock.lfs_invocations().len(), 1);
    }

    #[test]
    fn test_remote_lookup() -> Result<()> {
        let mock = MockGitInterface::new().with_remote("origin", "https://example.com/r.git");
        assert_eq!(
            mock.remote_url("origin")?,
            Some("https://example.com/r.git".to_string())
        );
        assert_eq!(mock.remote_url("fork")?, None);
        Ok(())
    }

    #[test]
    fn test_remote_lookup_failure() {
        let mock = MockGitInterface::new().failing_remote_lookup("locked");
        assert!(mock.remote_url("origin").is_err());
    }
}
