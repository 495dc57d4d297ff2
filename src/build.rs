//! Build context and build log
//!
//! A checkout runs on behalf of one build. The build exposes two things to
//! checkout decorators:
//!
//! - a [`TaskListener`], whose logger is the build's textual log stream
//! - a [`BuildContext`], which resolves the job's remotes with the build's
//!   parameters substituted into them
//!
//! # Parameter Expansion
//!
//! [`JobBuild`] expands `${NAME}` and `$NAME` placeholders in remote names
//! and URLs. Placeholders without a matching parameter are left untouched.

use anyhow::Result;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Write;
use tracing::debug;

use crate::config::RemoteConfig;

/// Access to the build's log stream
pub trait TaskListener {
    /// The writer backing the build log
    fn logger(&mut self) -> &mut dyn Write;
}

/// [`TaskListener`] writing to any [`Write`] implementation
pub struct StreamListener<W: Write> {
    out: W,
}

impl<W: Write> StreamListener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TaskListener for StreamListener<W> {
    fn logger(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}

/// The build a checkout is running for
pub trait BuildContext {
    /// Returns the job's remotes, in configuration order, with build
    /// parameters expanded
    fn param_expanded_remotes(&self, listener: &mut dyn TaskListener) -> Result<Vec<RemoteConfig>>;
}

/// A build of a job defined by a list of remotes and a set of parameters
#[derive(Debug, Clone, Default)]
pub struct JobBuild {
    remotes: Vec<RemoteConfig>,
    parameters: HashMap<String, String>,
}

impl JobBuild {
    pub fn new(remotes: Vec<RemoteConfig>) -> Self {
        Self {
            remotes,
            parameters: HashMap::new(),
        }
    }

    /// Adds a single build parameter, replacing any previous value
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Adds every `(name, value)` pair, e.g. from `--param` flags
    pub fn with_parameters<I, K, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters
            .extend(parameters.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds every `(name, value)` pair that is valid UTF-8
    ///
    /// Pairs that are not valid UTF-8 cannot appear in a job definition's
    /// placeholders and are skipped.
    pub fn with_os_parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        for (name, value) in parameters {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => {
                    self.parameters.insert(name, value);
                }
                (name, _) => debug!(
                    "Skipping non UTF-8 build parameter {:?}",
                    name.unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
                ),
            }
        }
        self
    }

    /// Adds the process environment as build parameters
    pub fn with_environment(self) -> Self {
        self.with_os_parameters(std::env::vars_os())
    }

    pub fn remotes(&self) -> &[RemoteConfig] {
        &self.remotes
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }
}

impl BuildContext for JobBuild {
    fn param_expanded_remotes(&self, _listener: &mut dyn TaskListener) -> Result<Vec<RemoteConfig>> {
        let remotes: Vec<RemoteConfig> = self
            .remotes
            .iter()
            .map(|remote| RemoteConfig {
                name: expand_parameters(&remote.name, &self.parameters),
                url: expand_parameters(&remote.url, &self.parameters),
            })
            .collect();

        debug!("Resolved {} remote(s) for build", remotes.len());
        Ok(remotes)
    }
}

/// Substitutes `${NAME}` and `$NAME` placeholders from `parameters`
///
/// Names consist of ASCII letters, digits and `_`. Unknown names, a lone `$`
/// and an unterminated `${` are copied through unchanged.
///
/// # Example
///
/// ```
/// use git_lfs_checkout::build::expand_parameters;
/// use std::collections::HashMap;
///
/// let mut params = HashMap::new();
/// params.insert("PROJECT".to_string(), "game".to_string());
///
/// assert_eq!(
///     expand_parameters("https://example.com/${PROJECT}.git", &params),
///     "https://example.com/game.git"
/// );
/// assert_eq!(expand_parameters("$MISSING", &params), "$MISSING");
/// ```
pub fn expand_parameters(input: &str, parameters: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                let name = &braced[..end];
                match parameters.get(name) {
                    Some(value) => out.push_str(value),
                    // "${" + name + "}"
                    None => out.push_str(&rest[pos..pos + end + 3]),
                }
                rest = &braced[end + 1..];
                continue;
            }
        } else {
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if len > 0 {
                let name = &after[..len];
                match parameters.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('$');
                        out.push_str(name);
                    }
                }
                rest = &after[len..];
                continue;
            }
        }

        out.push('$');
        rest = after;
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_expand_braced_and_bare() {
        let p = params(&[("HOST", "git.example.com"), ("REPO", "assets")]);
        assert_eq!(
            expand_parameters("https://${HOST}/$REPO.git", &p),
            "https://git.example.com/assets.git"
        );
    }

    #[test]
    fn test_expand_leaves_unknown_verbatim() {
        let p = params(&[]);
        assert_eq!(expand_parameters("${NOPE}/$ALSO_NOPE", &p), "${NOPE}/$ALSO_NOPE");
    }

    #[test]
    fn test_expand_edge_cases() {
        let p = params(&[("A", "x")]);
        assert_eq!(expand_parameters("", &p), "");
        assert_eq!(expand_parameters("$", &p), "$");
        assert_eq!(expand_parameters("cost $5", &p), "cost $5");
        assert_eq!(expand_parameters("${A", &p), "${A");
        assert_eq!(expand_parameters("$$A", &p), "$x");
        assert_eq!(expand_parameters("${A}${A}", &p), "xx");
        assert_eq!(expand_parameters("pre-$A-post", &p), "pre-x-post");
    }

    #[test]
    fn test_job_build_expands_names_and_urls_in_order() -> Result<()> {
        let build = JobBuild::new(vec![
            RemoteConfig::new("${PRIMARY}", "https://example.com/${PRIMARY}.git"),
            RemoteConfig::new("mirror", "https://mirror.example.com/repo.git"),
        ])
        .with_parameter("PRIMARY", "origin");

        let mut listener = StreamListener::new(Vec::new());
        let remotes = build.param_expanded_remotes(&mut listener)?;

        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url, "https://example.com/origin.git");
        assert_eq!(remotes[1].name, "mirror");
        // Configured remotes are never rewritten
        assert_eq!(build.remotes()[0].name, "${PRIMARY}");
        Ok(())
    }

    #[test]
    fn test_os_parameters_keep_utf8_pairs() {
        let build = JobBuild::default().with_os_parameters(vec![
            (OsString::from("PROJECT"), OsString::from("game")),
            (OsString::from("EMPTY"), OsString::new()),
        ]);

        assert_eq!(build.parameters().get("PROJECT"), Some(&"game".to_string()));
        assert_eq!(build.parameters().get("EMPTY"), Some(&String::new()));
    }

    #[cfg(unix)]
    #[test]
    fn test_os_parameters_skip_non_utf8() {
        use std::os::unix::ffi::OsStringExt;

        let build = JobBuild::default().with_os_parameters(vec![
            (OsString::from("BINARY"), OsString::from_vec(vec![0xff, 0xfe])),
            (OsString::from_vec(vec![0xc3, 0x28]), OsString::from("value")),
            (OsString::from("REMOTE"), OsString::from("origin")),
        ]);

        assert_eq!(build.parameters().len(), 1);
        assert_eq!(build.parameters().get("REMOTE"), Some(&"origin".to_string()));
    }

    #[test]
    fn test_stream_listener_collects_output() -> Result<()> {
        let mut listener = StreamListener::new(Vec::new());
        writeln!(listener.logger(), "hello")?;
        assert_eq!(listener.into_inner(), b"hello\n");
        Ok(())
    }
}
