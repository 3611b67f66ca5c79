use chrono::Local;
use std::sync::Arc;

use crate::analysis::{Analyst, ContributorAnalyst, SearchAnalyst, SearchKind};
use crate::config::{AnalysisConfig, Config};
use crate::error::Result;
use crate::github::{GitHubClient, TaskFetcher};
use crate::models::RepoSpec;

const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Runs analysts one after another, each with its own concurrent fetch
/// batch, and collects their reports.
pub struct Orchestrator {
    fetcher: TaskFetcher,
    analysts: Vec<Box<dyn Analyst>>,
}

impl Orchestrator {
    pub fn new(fetcher: TaskFetcher, analysts: Vec<Box<dyn Analyst>>) -> Self {
        Self { fetcher, analysts }
    }

    /// Contributors, pull requests and issues for an already validated repository.
    pub fn for_repository(
        client: GitHubClient,
        config: &Config,
        repo: &RepoSpec,
        analysis: &AnalysisConfig,
    ) -> Self {
        let analysts: Vec<Box<dyn Analyst>> = vec![
            Box::new(ContributorAnalyst::new(
                client.contributor_stats_url(repo),
                analysis.window,
            )),
            Box::new(SearchAnalyst::new(
                SearchKind::PullRequest,
                client.search_issues_url(),
                repo.clone(),
                analysis.branch(),
                analysis.window,
            )),
            Box::new(SearchAnalyst::new(
                SearchKind::Issue,
                client.search_issues_url(),
                repo.clone(),
                analysis.branch(),
                analysis.window,
            )),
        ];

        let fetcher = TaskFetcher::new(Arc::new(client), config.workers);
        Self::new(fetcher, analysts)
    }

    /// Validates the repository named in `analysis` and prepares the full run.
    pub async fn connect(config: &Config, analysis: &AnalysisConfig) -> Result<Self> {
        let client = GitHubClient::new(config, analysis.token(config))?;
        let repo = client
            .check_repository(&analysis.url, analysis.branch.as_deref())
            .await?;
        Ok(Self::for_repository(client, config, &repo, analysis))
    }

    pub fn analysts(&self) -> &[Box<dyn Analyst>] {
        &self.analysts
    }

    pub async fn run(&mut self) {
        for analyst in self.analysts.iter_mut() {
            tracing::info!(
                "Start {} analysis at {}",
                analyst.name(),
                Local::now().format(TIMESTAMP_FORMAT)
            );

            let results = self.fetcher.fetch_all(analyst.tasks()).await;
            for result in results {
                analyst.fold(result.data, result.tag);
            }

            tracing::info!(
                "End {} analysis at {}",
                analyst.name(),
                Local::now().format(TIMESTAMP_FORMAT)
            );
        }
    }

    pub fn render(&self) -> String {
        self.analysts.iter().map(|a| a.render()).collect()
    }

    pub fn display(&self) {
        print!("{}", self.render());
    }
}
