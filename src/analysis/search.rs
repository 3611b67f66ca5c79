use chrono::{Local, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::Analyst;
use crate::models::{DateWindow, FetchTask, RepoSpec, Tag};

/// Open items created before `now - STALE_AFTER_DAYS` count as "old".
pub const STALE_AFTER_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchKind {
    PullRequest,
    Issue,
}

impl SearchKind {
    /// Value of the `is:` search qualifier.
    pub fn qualifier(&self) -> &'static str {
        match self {
            SearchKind::PullRequest => "pr",
            SearchKind::Issue => "issue",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchKind::PullRequest => "Pull Request",
            SearchKind::Issue => "Issue",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            SearchKind::PullRequest => "pull requests",
            SearchKind::Issue => "issues",
        }
    }
}

/// Open/closed/old totals. `None` renders as `N/A`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCounts {
    pub open: Option<u64>,
    pub closed: Option<u64>,
    pub old: Option<u64>,
}

impl SearchCounts {
    fn slot(&mut self, tag: Tag) -> &mut Option<u64> {
        match tag {
            Tag::Open => &mut self.open,
            Tag::Closed => &mut self.closed,
            Tag::Old => &mut self.old,
        }
    }
}

fn display_count(count: Option<u64>) -> String {
    count.map_or_else(|| "N/A".to_string(), |n| n.to_string())
}

/// Counts pull requests or issues through the search API.
pub struct SearchAnalyst {
    kind: SearchKind,
    search_url: String,
    repo: RepoSpec,
    branch: String,
    window: DateWindow,
    bound_date: NaiveDate,
    counts: SearchCounts,
}

impl SearchAnalyst {
    pub fn new(
        kind: SearchKind,
        search_url: impl Into<String>,
        repo: RepoSpec,
        branch: impl Into<String>,
        window: DateWindow,
    ) -> Self {
        let bound_date = Local::now().date_naive() - TimeDelta::days(STALE_AFTER_DAYS);
        Self {
            kind,
            search_url: search_url.into(),
            repo,
            branch: branch.into(),
            window,
            bound_date,
            counts: SearchCounts::default(),
        }
    }

    pub fn with_bound_date(mut self, bound_date: NaiveDate) -> Self {
        self.bound_date = bound_date;
        self
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn bound_date(&self) -> NaiveDate {
        self.bound_date
    }

    pub fn counts(&self) -> SearchCounts {
        self.counts
    }

    /// Space separated search qualifiers for one state. The stale query
    /// ignores the user window and only looks at items older than the bound.
    pub fn search_query(&self, state: Tag, stale: bool) -> String {
        let mut qualifiers = vec![
            format!("repo:{}", self.repo.full_name()),
            format!("is:{}", self.kind.qualifier()),
        ];
        // base: only exists on pull requests, an issue search would match nothing
        if self.kind == SearchKind::PullRequest {
            qualifiers.push(format!("base:{}", self.branch));
        }
        qualifiers.push(format!("state:{}", state));

        if stale {
            qualifiers.push(format!("created:<{}", self.bound_date.format("%Y-%m-%d")));
        } else if let Some(created) = self.window.created_qualifier() {
            qualifiers.push(created);
        }

        qualifiers.join(" ")
    }

    fn task(&self, state: Tag, stale: bool, tag: Tag) -> FetchTask {
        FetchTask::new(self.search_url.clone(), Some(tag)).with_query("q", self.search_query(state, stale))
    }
}

impl Analyst for SearchAnalyst {
    fn name(&self) -> &str {
        self.kind.label()
    }

    fn tasks(&self) -> Vec<FetchTask> {
        vec![
            self.task(Tag::Open, false, Tag::Open),
            self.task(Tag::Closed, false, Tag::Closed),
            self.task(Tag::Open, true, Tag::Old),
        ]
    }

    fn fold(&mut self, data: Value, tag: Option<Tag>) {
        let Some(tag) = tag else {
            tracing::debug!("Ignoring untagged search response");
            return;
        };
        *self.counts.slot(tag) = data.get("total_count").and_then(Value::as_u64);
    }

    fn render(&self) -> String {
        let plural = self.kind.plural();
        let mut output = format!("Result of {} analysis\n", plural);
        output.push_str(&format!(
            "Number of open {} - {}\n",
            plural,
            display_count(self.counts.open)
        ));
        output.push_str(&format!(
            "Number of closed {} - {}\n",
            plural,
            display_count(self.counts.closed)
        ));
        output.push_str(&format!(
            "Number of 'old' {} - {}\n\n",
            plural,
            display_count(self.counts.old)
        ));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyst(kind: SearchKind, window: DateWindow) -> SearchAnalyst {
        SearchAnalyst::new(
            kind,
            "https://api.example.com/search/issues",
            RepoSpec::new("octo", "hello"),
            "master",
            window,
        )
        .with_bound_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn query(task: &FetchTask) -> &str {
        &task.query[0].1
    }

    #[test]
    fn test_pull_request_tasks() {
        let tasks = analyst(SearchKind::PullRequest, DateWindow::unbounded()).tasks();
        assert_eq!(tasks.len(), 3);

        assert_eq!(tasks[0].tag, Some(Tag::Open));
        assert_eq!(query(&tasks[0]), "repo:octo/hello is:pr base:master state:open");

        assert_eq!(tasks[1].tag, Some(Tag::Closed));
        assert_eq!(query(&tasks[1]), "repo:octo/hello is:pr base:master state:closed");

        assert_eq!(tasks[2].tag, Some(Tag::Old));
        assert_eq!(
            query(&tasks[2]),
            "repo:octo/hello is:pr base:master state:open created:<2024-05-01"
        );
    }

    #[test]
    fn test_window_applies_except_to_old() {
        let window = DateWindow::parse(Some("2023-01-01"), Some("2023-06-01")).unwrap();
        let tasks = analyst(SearchKind::PullRequest, window).tasks();

        assert!(query(&tasks[0]).ends_with("state:open created:2023-01-01..2023-06-01"));
        assert!(query(&tasks[1]).ends_with("state:closed created:2023-01-01..2023-06-01"));
        assert!(query(&tasks[2]).ends_with("state:open created:<2024-05-01"));
        assert!(!query(&tasks[2]).contains("2023-01-01"));
    }

    #[test]
    fn test_issue_queries() {
        let tasks = analyst(SearchKind::Issue, DateWindow::unbounded()).tasks();
        assert_eq!(query(&tasks[0]), "repo:octo/hello is:issue state:open");
        assert!(tasks.iter().all(|t| !query(t).contains("base:")));
    }

    #[test]
    fn test_default_bound_date_is_thirty_days_back() {
        let analyst = SearchAnalyst::new(
            SearchKind::Issue,
            "https://api.example.com/search/issues",
            RepoSpec::new("octo", "hello"),
            "master",
            DateWindow::unbounded(),
        );
        let today = Local::now().date_naive();
        assert_eq!((today - analyst.bound_date()).num_days(), STALE_AFTER_DAYS);
    }

    #[test]
    fn test_fold_by_tag() {
        let mut analyst = analyst(SearchKind::PullRequest, DateWindow::unbounded());
        assert_eq!(analyst.counts(), SearchCounts::default());

        analyst.fold(json!({ "total_count": 7 }), Some(Tag::Open));
        analyst.fold(json!({ "total_count": 3 }), Some(Tag::Closed));
        analyst.fold(json!({}), Some(Tag::Old));
        analyst.fold(json!({ "total_count": 99 }), None);

        assert_eq!(
            analyst.counts(),
            SearchCounts {
                open: Some(7),
                closed: Some(3),
                old: None
            }
        );
    }

    #[test]
    fn test_render() {
        let mut analyst = analyst(SearchKind::PullRequest, DateWindow::unbounded());
        analyst.fold(json!({ "total_count": 4 }), Some(Tag::Open));
        assert_eq!(
            analyst.render(),
            "Result of pull requests analysis\n\
             Number of open pull requests - 4\n\
             Number of closed pull requests - N/A\n\
             Number of 'old' pull requests - N/A\n\n"
        );
    }
}
