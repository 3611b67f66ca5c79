use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{Error, Result};

static REPO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(http|https?://github\.com/)([\w,\-_]+)/([\w,\-_.]+)")
        .expect("repository url pattern is valid")
});

/// Owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSpec {
    pub owner: String,
    pub name: String,
}

impl RepoSpec {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Extracts owner/name from a loosely formatted repository URL.
    ///
    /// Accepts `http://` or `https://`, an optional `.git` suffix and an
    /// optional trailing slash.
    pub fn from_url(url: &str) -> Result<Self> {
        let captures = REPO_URL_RE
            .captures(url)
            .ok_or_else(|| Error::InvalidRepositoryUrl(url.to_string()))?;

        let owner = captures.get(2).map(|m| m.as_str());
        let name = captures.get(3).map(|m| {
            let name = m.as_str();
            let split = name.len().saturating_sub(4);
            match (name.get(..split), name.get(split..)) {
                (Some(stem), Some(suffix)) if suffix.eq_ignore_ascii_case(".git") => stem,
                _ => name,
            }
        });

        match (owner, name) {
            (Some(owner), Some(name)) if !name.is_empty() => Ok(Self::new(owner, name)),
            _ => Err(Error::InvalidRepositoryUrl(url.to_string())),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_url() {
        let spec = RepoSpec::from_url("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(spec, RepoSpec::new("rust-lang", "cargo"));
    }

    #[test]
    fn test_parse_url_with_git_suffix_and_slash() {
        let spec = RepoSpec::from_url("https://github.com/tokio-rs/tokio.git").unwrap();
        assert_eq!(spec.full_name(), "tokio-rs/tokio");

        let spec = RepoSpec::from_url("http://github.com/serde-rs/json/").unwrap();
        assert_eq!(spec.full_name(), "serde-rs/json");
    }

    #[test]
    fn test_parse_name_with_dots() {
        let spec = RepoSpec::from_url("https://github.com/vercel/next.js").unwrap();
        assert_eq!(spec, RepoSpec::new("vercel", "next.js"));

        let spec = RepoSpec::from_url("https://github.com/vercel/next.js.git/").unwrap();
        assert_eq!(spec.name, "next.js");

        let spec = RepoSpec::from_url("https://github.com/octo/Hello.GIT").unwrap();
        assert_eq!(spec.name, "Hello");
    }

    #[test]
    fn test_parse_url_case_insensitive() {
        let spec = RepoSpec::from_url("HTTPS://GitHub.com/foo_bar/baz-qux").unwrap();
        assert_eq!(spec.owner, "foo_bar");
        assert_eq!(spec.name, "baz-qux");
    }

    #[test]
    fn test_reject_invalid_url() {
        assert!(matches!(
            RepoSpec::from_url("https://gitlab.com/foo/bar"),
            Err(Error::InvalidRepositoryUrl(_))
        ));
        assert!(RepoSpec::from_url("not a url").is_err());
        assert!(RepoSpec::from_url("https://github.com/only-owner").is_err());
        assert!(RepoSpec::from_url("https://github.com/octo/.git").is_err());
    }
}
