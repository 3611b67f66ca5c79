use crate::error::{Error, Result};
use crate::models::DateWindow;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "master";

/// Process-level settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub api_base_url: String,
    pub workers: usize,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_base_url: DEFAULT_API_URL.to_string(),
            workers: 10,
            request_timeout: Duration::from_secs(15),
            max_retries: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let api_base_url = env::var("GITHUB_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let workers = parse_var("REPOANALYZER_WORKERS")?.unwrap_or(defaults.workers);
        if workers == 0 {
            return Err(Error::Config("REPOANALYZER_WORKERS must be at least 1".to_string()));
        }

        let request_timeout = parse_var("REPOANALYZER_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_retries = parse_var("REPOANALYZER_RETRIES")?.unwrap_or(defaults.max_retries);

        Ok(Self {
            github_token,
            api_base_url,
            workers,
            request_timeout,
            max_retries,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", name, value))),
        Err(_) => Ok(None),
    }
}

/// What to analyze for a single run, built from the command line.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub url: String,
    /// `None` means the default branch was not overridden.
    pub branch: Option<String>,
    pub window: DateWindow,
    pub personal_access_token: Option<String>,
}

impl AnalysisConfig {
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    /// Token from the command line wins over the environment.
    pub fn token<'a>(&'a self, config: &'a Config) -> Option<&'a str> {
        self.personal_access_token
            .as_deref()
            .or(config.github_token.as_deref())
    }
}
