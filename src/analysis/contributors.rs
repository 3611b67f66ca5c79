use serde_json::Value;

use crate::analysis::Analyst;
use crate::models::{ContributorCommits, ContributorStats, DateWindow, FetchTask, Tag};

pub const MAX_CONTRIBUTORS: usize = 30;

/// Ranks contributors by commits made inside the date window.
pub struct ContributorAnalyst {
    stats_url: String,
    window: DateWindow,
    contributors: Vec<ContributorCommits>,
}

impl ContributorAnalyst {
    pub fn new(stats_url: impl Into<String>, window: DateWindow) -> Self {
        Self {
            stats_url: stats_url.into(),
            window,
            contributors: Vec::new(),
        }
    }

    pub fn contributors(&self) -> &[ContributorCommits] {
        &self.contributors
    }

    fn commits_in_window(&self, stats: &ContributorStats) -> u64 {
        stats
            .weeks
            .iter()
            .filter(|week| week.c > 0 && self.window.contains_week(week.w))
            .map(|week| week.c as u64)
            .sum()
    }
}

/// Top contributors by commit count, highest first. Ties keep their input
/// order and contributors without commits are dropped.
pub fn rank_contributors(mut entries: Vec<ContributorCommits>) -> Vec<ContributorCommits> {
    entries.retain(|c| c.commit_count > 0);
    entries.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));
    entries.truncate(MAX_CONTRIBUTORS);
    entries
}

impl Analyst for ContributorAnalyst {
    fn name(&self) -> &str {
        "Contributors"
    }

    fn tasks(&self) -> Vec<FetchTask> {
        vec![FetchTask::new(self.stats_url.clone(), None)]
    }

    fn fold(&mut self, data: Value, _tag: Option<Tag>) {
        let entries = match data {
            Value::Array(entries) => entries,
            other => {
                // GitHub answers 202 with an empty object while stats are computed
                tracing::warn!("Contributor statistics unavailable: {}", other);
                Vec::new()
            }
        };

        let counted = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<ContributorStats>(entry) {
                Ok(stats) => Some(stats),
                Err(e) => {
                    tracing::debug!("Skipping malformed contributor entry: {}", e);
                    None
                }
            })
            .map(|stats| ContributorCommits {
                login: stats.login().to_string(),
                commit_count: self.commits_in_window(&stats),
            })
            .collect();

        self.contributors = rank_contributors(counted);
    }

    fn render(&self) -> String {
        let mut output = String::from("\nTHE LIST OF MOST ACTIVE CONTRIBUTORS\n\n");

        if self.contributors.is_empty() {
            output.push_str("No data\n\n");
            return output;
        }

        output.push_str(&format!("{:>5}|{:<20}|{:<13}|\n", "#", "Login", "Commits count"));
        for (idx, contributor) in self.contributors.iter().enumerate() {
            output.push_str(&format!(
                "{:>5}|{:<20}|{:>13}|\n",
                idx + 1,
                contributor.login,
                contributor.commit_count
            ));
        }
        output.push_str("\n\n");

        output
    }
}
