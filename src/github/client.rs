use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::fetcher::JsonSource;
use crate::models::{FetchTask, RepoSpec};

const ACCEPT_TEXT_MATCH: &str = "application/vnd.github.v3.text-match+json";
const USER_AGENT: &str = "repoanalyzer/0.1";
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Shared GitHub API session. Cloning is cheap and reuses the connection pool.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    max_retries: u32,
}

impl GitHubClient {
    pub fn new(config: &Config, token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(ACCEPT_TEXT_MATCH),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );
        if let Some(token) = token {
            let mut value = header::HeaderValue::from_str(&format!("token {}", token))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.workers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn repo_url(&self, repo: &RepoSpec) -> String {
        format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name)
    }

    pub fn branch_url(&self, repo: &RepoSpec, branch: &str) -> String {
        format!("{}/branches/{}", self.repo_url(repo), branch)
    }

    pub fn contributor_stats_url(&self, repo: &RepoSpec) -> String {
        format!("{}/stats/contributors", self.repo_url(repo))
    }

    pub fn search_issues_url(&self) -> String {
        format!("{}/search/issues", self.base_url)
    }

    /// Resolves the repository from `url` and confirms it exists.
    ///
    /// The branch is only checked when one was given explicitly.
    pub async fn check_repository(&self, url: &str, branch: Option<&str>) -> Result<RepoSpec> {
        let repo = RepoSpec::from_url(url)?;
        tracing::info!("Checking repository: {}", repo);

        let status = self.status(&self.repo_url(&repo)).await?;
        if status != StatusCode::OK {
            tracing::debug!("Repository lookup for {} returned {}", repo, status);
            return Err(Error::RepoNotFound(repo.full_name()));
        }

        if let Some(branch) = branch {
            let status = self.status(&self.branch_url(&repo, branch)).await?;
            if status != StatusCode::OK {
                tracing::debug!("Branch lookup for {}@{} returned {}", repo, branch, status);
                return Err(Error::BranchNotFound(branch.to_string()));
            }
        }

        Ok(repo)
    }

    async fn status(&self, url: &str) -> Result<StatusCode> {
        let response = self.send(url, &[]).await?;
        Ok(response.status())
    }

    /// GET with the transport retry policy. Only connection level failures
    /// are retried; any HTTP status is returned as is.
    async fn send(&self, url: &str, query: &[(String, String)]) -> Result<Response> {
        let mut attempt = 0;
        loop {
            let result = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(Error::from);

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        "Request to {} failed ({}), retry {}/{}",
                        url,
                        e,
                        attempt,
                        self.max_retries
                    );
                    sleep(RETRY_DELAY * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl JsonSource for GitHubClient {
    async fn get_json(&self, task: &FetchTask) -> Result<Value> {
        let response = self.send(&task.url, &task.query).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("GitHub API returned {} for {}", status, task.url);
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        let config = Config {
            api_base_url: "https://api.example.com".to_string(),
            ..Config::default()
        };
        GitHubClient::new(&config, Some("secret")).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client();
        let repo = RepoSpec::new("octo", "hello");
        assert_eq!(client.repo_url(&repo), "https://api.example.com/repos/octo/hello");
        assert_eq!(
            client.contributor_stats_url(&repo),
            "https://api.example.com/repos/octo/hello/stats/contributors"
        );
        assert_eq!(
            client.branch_url(&repo, "main"),
            "https://api.example.com/repos/octo/hello/branches/main"
        );
        assert_eq!(client.search_issues_url(), "https://api.example.com/search/issues");
    }

    #[test]
    fn test_rejects_token_with_invalid_characters() {
        let result = GitHubClient::new(&Config::default(), Some("bad\ntoken"));
        assert!(matches!(result, Err(Error::InvalidHeader(_))));
    }

    #[tokio::test]
    async fn test_check_repository_rejects_malformed_url() {
        let result = client().check_repository("ftp://example.com/x", None).await;
        assert!(matches!(result, Err(Error::InvalidRepositoryUrl(_))));
    }
}
