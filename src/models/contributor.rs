use serde::{Deserialize, Serialize};

pub const UNKNOWN_LOGIN: &str = "Not defined";

/// One entry of `GET /repos/{owner}/{repo}/stats/contributors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributorStats {
    #[serde(default)]
    pub author: Option<ContributorAuthor>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub weeks: Vec<WeekStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributorAuthor {
    #[serde(default)]
    pub login: Option<String>,
}

/// Weekly bucket: `w` is the week start as a unix timestamp, `c` the commit count.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeekStats {
    #[serde(default)]
    pub w: i64,
    #[serde(default)]
    pub a: i64,
    #[serde(default)]
    pub d: i64,
    #[serde(default)]
    pub c: i64,
}

impl ContributorStats {
    pub fn login(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| a.login.as_deref())
            .unwrap_or(UNKNOWN_LOGIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorCommits {
    pub login: String,
    pub commit_count: u64,
}
