pub mod analysis;
pub mod config;
pub mod error;
pub mod github;
pub mod models;

pub use analysis::{Analyst, ContributorAnalyst, Orchestrator, SearchAnalyst, SearchKind};
pub use config::{AnalysisConfig, Config};
pub use error::{Error, Result};
pub use github::{GitHubClient, JsonSource, TaskFetcher};
pub use models::{DateWindow, FetchResult, FetchTask, RepoSpec, Tag};
