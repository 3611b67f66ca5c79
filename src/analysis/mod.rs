pub mod contributors;
pub mod orchestrator;
pub mod search;

pub use contributors::ContributorAnalyst;
pub use orchestrator::Orchestrator;
pub use search::{SearchAnalyst, SearchCounts, SearchKind};

use serde_json::Value;

use crate::models::{FetchTask, Tag};

/// One analysis over the GitHub API: which requests to make, how to fold
/// their responses, and how to present the result.
///
/// Folding is called once per response after the whole batch is fetched,
/// in no particular order.
pub trait Analyst: Send {
    fn name(&self) -> &str;

    fn tasks(&self) -> Vec<FetchTask>;

    fn fold(&mut self, data: Value, tag: Option<Tag>);

    fn render(&self) -> String;
}
