use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{FetchResult, FetchTask};

pub const DEFAULT_WORKERS: usize = 10;

/// Anything that can turn a request descriptor into a JSON body.
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn get_json(&self, task: &FetchTask) -> Result<Value>;
}

/// Runs independent GET tasks concurrently with a fixed worker limit.
///
/// A failed task never fails the batch: its body is replaced by
/// [`FetchTask::empty_payload`]. Results come back in completion order,
/// one per task.
pub struct TaskFetcher {
    source: Arc<dyn JsonSource>,
    workers: usize,
}

impl TaskFetcher {
    pub fn new(source: Arc<dyn JsonSource>, workers: usize) -> Self {
        Self {
            source,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn fetch_all(&self, tasks: Vec<FetchTask>) -> Vec<FetchResult> {
        if tasks.is_empty() {
            return Vec::new();
        }

        let pb = ProgressBar::new(tasks.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos}/{len} requests")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let results = stream::iter(tasks)
            .map(|task| {
                let source = self.source.clone();
                let pb = pb.clone();
                async move {
                    let data = match source.get_json(&task).await {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::warn!("Request to {} failed: {}", task.url, e);
                            task.empty_payload()
                        }
                    };
                    pb.inc(1);
                    FetchResult {
                        data,
                        tag: task.tag,
                    }
                }
            })
            .buffer_unordered(self.workers)
            .collect::<Vec<_>>()
            .await;

        pb.finish_and_clear();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Tag;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fails every url containing "fail", echoes the url otherwise, and
    /// tracks the peak number of requests in flight.
    struct FakeSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl JsonSource for FakeSource {
        async fn get_json(&self, task: &FetchTask) -> Result<Value> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if task.url.contains("fail") {
                Err(Error::from(serde_json::from_str::<Value>("boom").unwrap_err()))
            } else {
                Ok(json!({ "url": task.url }))
            }
        }
    }

    #[tokio::test]
    async fn test_empty_task_list() {
        let fetcher = TaskFetcher::new(Arc::new(FakeSource::new()), DEFAULT_WORKERS);
        assert!(fetcher.fetch_all(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_one_result_per_task_despite_failures() {
        let fetcher = TaskFetcher::new(Arc::new(FakeSource::new()), DEFAULT_WORKERS);
        let tasks = vec![
            FetchTask::new("ok-1", Some(Tag::Open)),
            FetchTask::new("fail-1", Some(Tag::Closed)),
            FetchTask::new("fail-2", None),
            FetchTask::new("ok-2", None),
        ];

        let results = fetcher.fetch_all(tasks).await;
        assert_eq!(results.len(), 4);

        let closed = results.iter().find(|r| r.tag == Some(Tag::Closed)).unwrap();
        assert_eq!(closed.data, json!({}));

        assert!(results.iter().any(|r| r.tag.is_none() && r.data == json!([])));
        assert!(results
            .iter()
            .any(|r| r.tag.is_none() && r.data == json!({ "url": "ok-2" })));
    }

    #[tokio::test]
    async fn test_parallelism_is_bounded() {
        let source = Arc::new(FakeSource::new());
        let fetcher = TaskFetcher::new(source.clone(), 3);
        let tasks = (0..12)
            .map(|i| FetchTask::new(format!("ok-{}", i), None))
            .collect();

        let results = fetcher.fetch_all(tasks).await;
        assert_eq!(results.len(), 12);
        assert!(source.peak.load(Ordering::SeqCst) <= 3);
        assert!(source.peak.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_zero_workers_clamped() {
        let fetcher = TaskFetcher::new(Arc::new(FakeSource::new()), 0);
        assert_eq!(fetcher.workers(), 1);
    }
}
