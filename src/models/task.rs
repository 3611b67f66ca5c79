use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Routes a fetched response to the accumulator slot it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Open,
    Closed,
    Old,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Open => "open",
            Tag::Closed => "closed",
            Tag::Old => "old",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single GET request plus the tag its response is folded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub tag: Option<Tag>,
}

impl FetchTask {
    pub fn new(url: impl Into<String>, tag: Option<Tag>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            tag,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Substitute payload for a request that failed: `{}` for tagged
    /// requests, `[]` for untagged ones.
    pub fn empty_payload(&self) -> Value {
        match self.tag {
            Some(_) => Value::Object(serde_json::Map::new()),
            None => Value::Array(Vec::new()),
        }
    }
}

/// Response body of a finished task, carrying the task's tag.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub data: Value,
    pub tag: Option<Tag>,
}
