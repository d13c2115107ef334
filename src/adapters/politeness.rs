use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::settings::PolitenessPolicy;
use crate::domain::model::Candidate;
use crate::domain::ports::SearchGateway;
use crate::utils::error::{Result, ScanError};

/// Throttles and time-boxes every query sent to the wrapped engine.
///
/// Failures never escape: transport errors, non-2xx answers and timeouts all
/// come back as an empty hit list so one bad query can't sink the run.
pub struct PoliteGateway<G: SearchGateway> {
    inner: G,
    policy: PolitenessPolicy,
    permits: Arc<Semaphore>,
}

impl<G: SearchGateway> PoliteGateway<G> {
    pub fn new(inner: G, policy: PolitenessPolicy) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(policy.max_concurrent.max(1))),
            policy,
        }
    }

    pub fn policy(&self) -> &PolitenessPolicy {
        &self.policy
    }

    fn jitter(&self) -> Duration {
        let min = self.policy.min_delay.as_millis() as u64;
        let max = self.policy.max_delay.as_millis() as u64;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    async fn guarded_search(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ScanError::ProcessingError {
                message: format!("search throttle closed: {}", e),
            })?;

        let delay = self.jitter();
        if !delay.is_zero() {
            debug!(?delay, "waiting before query");
            tokio::time::sleep(delay).await;
        }

        match tokio::time::timeout(self.policy.timeout, self.inner.search(query, max_results)).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Timeout {
                operation: format!("{} search", self.inner.name()),
                seconds: self.policy.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl<G: SearchGateway> SearchGateway for PoliteGateway<G> {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
        match self.guarded_search(query, max_results).await {
            Ok(hits) => {
                debug!(engine = self.inner.name(), query, hits = hits.len(), "query answered");
                Ok(hits)
            }
            Err(e) => {
                warn!(
                    engine = self.inner.name(),
                    query,
                    error = %e,
                    "search failed; treating as no results"
                );
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowGateway {
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowGateway {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SearchGateway for SlowGateway {
        async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<Candidate>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![Candidate {
                title: "t".to_string(),
                url: "https://x.org".to_string(),
                snippet: String::new(),
                query_used: query.to_string(),
            }])
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl SearchGateway for FailingGateway {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<Candidate>> {
            Err(ScanError::SearchError {
                engine: "failing".to_string(),
                message: "HTTP 503".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn policy(max_concurrent: usize, timeout: Duration) -> PolitenessPolicy {
        PolitenessPolicy {
            max_concurrent,
            ..PolitenessPolicy::immediate(timeout)
        }
    }

    #[tokio::test]
    async fn test_errors_become_empty() {
        let gateway = PoliteGateway::new(FailingGateway, policy(1, Duration::from_secs(1)));
        assert!(gateway.search("q", 5).await.unwrap().is_empty());
        assert_eq!(gateway.name(), "failing");
    }

    #[tokio::test]
    async fn test_timeout_becomes_empty() {
        let gateway = PoliteGateway::new(
            SlowGateway::new(Duration::from_millis(500)),
            policy(1, Duration::from_millis(20)),
        );
        assert!(gateway.search("q", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_is_capped() {
        let gateway = Arc::new(PoliteGateway::new(
            SlowGateway::new(Duration::from_millis(30)),
            policy(2, Duration::from_secs(5)),
        ));

        let tasks: Vec<_> = (0..6)
            .map(|i| {
                let gateway = Arc::clone(&gateway);
                tokio::spawn(async move { gateway.search(&format!("q{}", i), 1).await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().len(), 1);
        }

        assert!(gateway.inner.peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let gateway = PoliteGateway::new(
            FailingGateway,
            PolitenessPolicy {
                max_concurrent: 1,
                min_delay: Duration::from_millis(10),
                max_delay: Duration::from_millis(20),
                timeout: Duration::from_secs(1),
            },
        );
        for _ in 0..50 {
            let d = gateway.jitter();
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
        }
    }
}
