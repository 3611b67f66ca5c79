pub mod client;
pub mod fetcher;

pub use client::GitHubClient;
pub use fetcher::{JsonSource, TaskFetcher, DEFAULT_WORKERS};
