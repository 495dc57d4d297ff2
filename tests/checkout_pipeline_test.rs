//! End-to-end checkout scenarios: job definition -> registry -> pipeline -> git

use anyhow::Result;
use git_lfs_checkout::build::{JobBuild, StreamListener};
use git_lfs_checkout::checkout::GitCheckoutCommand;
use git_lfs_checkout::config::JobConfig;
use git_lfs_checkout::decorator::DecoratorRegistry;
use git_lfs_checkout::git_interface::MockGitInterface;
use serial_test::serial;

const TWO_REMOTES: &str = r#"
[[remotes]]
name = "origin"
url = "https://example.com/game.git"

[[remotes]]
name = "upstream"
url = "https://example.com/upstream/game.git"

[[extensions]]
kind = "git-lfs-pull"
fetch_include = "*.bin"
fetch_exclude = ""
"#;

fn log_of(listener: StreamListener<Vec<u8>>) -> String {
    String::from_utf8_lossy(&listener.into_inner()).to_string()
}

#[test]
fn test_two_remotes_pull_from_origin() -> Result<()> {
    let config = JobConfig::from_toml(TWO_REMOTES)?;
    let pipeline = DecoratorRegistry::with_defaults().build_pipeline(&config)?;
    let build = JobBuild::new(config.remotes.clone());
    let git = MockGitInterface::new().with_remote("origin", "https://example.com/game.git");
    let mut listener = StreamListener::new(Vec::new());

    let cmd = pipeline.run(&build, &mut listener, &git)?;

    assert_eq!(cmd.lfs_remote_name(), Some("origin"));
    assert_eq!(cmd.lfs_include(), Some("*.bin"));
    assert_eq!(cmd.lfs_exclude(), Some(""));
    assert_eq!(
        git.lfs_invocations(),
        vec![vec![
            "pull".to_string(),
            "origin".to_string(),
            "-I".to_string(),
            "*.bin".to_string()
        ]]
    );
    assert_eq!(log_of(listener), "Enabling Git LFS pull\n");
    Ok(())
}

#[test]
fn test_no_remotes_still_applies_filters() -> Result<()> {
    let config = JobConfig::from_toml(
        r#"
        [[extensions]]
        kind = "git-lfs-pull"
        fetch_include = ""
        fetch_exclude = ""
        "#,
    )?;
    let pipeline = DecoratorRegistry::with_defaults().build_pipeline(&config)?;
    let mut listener = StreamListener::new(Vec::new());
    let mut cmd = GitCheckoutCommand::new();

    pipeline.decorate(&JobBuild::new(config.remotes.clone()), &mut listener, &mut cmd)?;

    assert!(cmd.is_lfs_requested());
    assert_eq!(cmd.lfs_remote_name(), None);
    assert_eq!(cmd.lfs_include(), Some(""));
    assert_eq!(cmd.lfs_exclude(), Some(""));
    assert_eq!(cmd.lfs_pull_args()?, Some(vec!["pull".to_string()]));
    Ok(())
}

#[test]
fn test_job_without_extensions_does_not_pull() -> Result<()> {
    let config = JobConfig::from_toml(
        r#"
        [[remotes]]
        name = "origin"
        url = "https://example.com/game.git"
        "#,
    )?;
    let pipeline = DecoratorRegistry::with_defaults().build_pipeline(&config)?;
    let git = MockGitInterface::new();
    let mut listener = StreamListener::new(Vec::new());

    let cmd = pipeline.run(&JobBuild::new(config.remotes.clone()), &mut listener, &git)?;

    assert!(pipeline.is_empty());
    assert!(!cmd.is_lfs_requested());
    assert!(git.lfs_invocations().is_empty());
    assert!(log_of(listener).is_empty());
    Ok(())
}

#[test]
fn test_each_decorator_instance_logs_once() -> Result<()> {
    let config = JobConfig::from_toml(
        r#"
        [[remotes]]
        name = "origin"

        [[extensions]]
        kind = "git-lfs-pull"
        fetch_include = "a/*"

        [[extensions]]
        kind = "git-lfs-pull"
        fetch_include = "b/*"
        "#,
    )?;
    let pipeline = DecoratorRegistry::with_defaults().build_pipeline(&config)?;
    let git = MockGitInterface::new().with_remote("origin", "");
    let mut listener = StreamListener::new(Vec::new());

    let cmd = pipeline.run(&JobBuild::new(config.remotes.clone()), &mut listener, &git)?;

    assert_eq!(pipeline.len(), 2);
    // The last decorator's filters win; LFS is pulled once
    assert_eq!(cmd.lfs_include(), Some("b/*"));
    assert_eq!(git.lfs_invocations().len(), 1);
    assert_eq!(log_of(listener).matches("Enabling Git LFS pull").count(), 2);
    Ok(())
}

#[test]
fn test_unknown_extension_kind_fails_setup() -> Result<()> {
    let config = JobConfig::from_toml(
        r#"
        [[extensions]]
        kind = "sparse-checkout"
        "#,
    )?;
    let err = DecoratorRegistry::with_defaults()
        .build_pipeline(&config)
        .expect_err("unknown kind");
    assert!(err.to_string().contains("sparse-checkout"));
    Ok(())
}

#[test]
#[serial]
fn test_remote_name_expanded_from_environment() -> Result<()> {
    std::env::set_var("LFS_CHECKOUT_TEST_REMOTE", "mirror");
    let config = JobConfig::from_toml(
        r#"
        [[remotes]]
        name = "${LFS_CHECKOUT_TEST_REMOTE}"
        url = "https://mirror.example.com/game.git"

        [[extensions]]
        kind = "git-lfs-pull"
        "#,
    )?;
    let pipeline = DecoratorRegistry::with_defaults().build_pipeline(&config)?;
    let build = JobBuild::new(config.remotes.clone()).with_environment();
    let mut listener = StreamListener::new(Vec::new());
    let mut cmd = GitCheckoutCommand::new();

    let result = pipeline.decorate(&build, &mut listener, &mut cmd);
    std::env::remove_var("LFS_CHECKOUT_TEST_REMOTE");
    result?;

    assert_eq!(cmd.lfs_remote_name(), Some("mirror"));
    Ok(())
}
