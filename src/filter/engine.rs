use crate::config::FilteringConfig;
use crate::filter::local::LocalMatcher;
use crate::filter::merge;
use crate::filter::remote::RelevanceFilter;
use crate::metrics;
use crate::models::{FilterReport, KeywordSet, KeywordSummary, LogDocument, RemoteOutcome};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{info, warn};

/// Engine tuning knobs, derived from [`FilteringConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum concurrent remote relevance calls per run
    pub max_concurrent_remote: usize,

    /// Per-keyword remote call timeout
    pub remote_timeout: Duration,
}

impl From<&FilteringConfig> for EngineConfig {
    fn from(config: &FilteringConfig) -> Self {
        Self {
            max_concurrent_remote: config.max_concurrent_remote.max(1),
            remote_timeout: Duration::from_secs(config.remote_timeout_secs),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_remote: 4,
            remote_timeout: Duration::from_secs(45),
        }
    }
}

/// Orchestrates both matching strategies per keyword and merges the union.
///
/// The local matcher always runs; the remote strategy is best-effort
/// enrichment. A remote failure for one keyword degrades that keyword to
/// local-only matching and never aborts the run.
pub struct FilterEngine {
    local: LocalMatcher,
    remote: Option<Arc<dyn RelevanceFilter>>,
    config: EngineConfig,
}

/// Per-keyword intermediate result, tagged with the keyword's input position
/// so reporting stays stable under unordered completion.
struct KeywordResult {
    index: usize,
    keyword: String,
    candidates: Vec<String>,
    local_matches: usize,
    remote: RemoteOutcome,
}

impl FilterEngine {
    pub fn new(remote: Option<Arc<dyn RelevanceFilter>>, config: EngineConfig) -> Self {
        Self {
            local: LocalMatcher::new(),
            remote,
            config,
        }
    }

    /// Whether the remote relevance strategy is available.
    pub fn remote_available(&self) -> bool {
        self.remote.is_some()
    }

    /// Run one filtering pass: per-keyword local + remote candidates,
    /// deduplicated and restored to original document order.
    pub async fn filter(&self, document: &LogDocument, keywords: &KeywordSet) -> FilterReport {
        let start = Instant::now();
        let log_text = document.as_text();
        let log_text = log_text.as_str();

        // Remote calls for distinct keywords are independent; run them
        // concurrently up to the configured limit. Completion order does not
        // affect the merge, only the summary, which is re-sorted by input
        // position below.
        let indexed: Vec<(usize, String)> = keywords
            .keywords()
            .iter()
            .enumerate()
            .map(|(index, keyword)| (index, keyword.clone()))
            .collect();

        let mut results: Vec<KeywordResult> = stream::iter(indexed)
        .map(|(index, keyword)| async move {
            let local_matches = self.local.find_matches(document, &keyword);
            let (remote_lines, remote) = self.run_remote(log_text, &keyword).await;

            let mut candidates = local_matches.clone();
            candidates.extend(remote_lines);

            KeywordResult {
                index,
                keyword,
                candidates,
                local_matches: local_matches.len(),
                remote,
            }
        })
        .buffer_unordered(self.config.max_concurrent_remote.max(1))
        .collect()
        .await;

        results.sort_by_key(|r| r.index);

        let candidate_set: HashSet<String> =
            merge::collect_candidates(results.iter().flat_map(|r| r.candidates.iter()));

        let lines = merge::resolve(document, &candidate_set);

        let summaries: Vec<KeywordSummary> = results
            .into_iter()
            .map(|r| KeywordSummary {
                keyword: r.keyword,
                local_matches: r.local_matches,
                remote: r.remote,
            })
            .collect();

        let fallbacks = summaries.iter().filter(|s| s.remote.is_fallback()).count();

        metrics::FILTER_RUNS_TOTAL.inc();
        metrics::FILTER_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());
        metrics::RESULT_LINES.observe(lines.len() as f64);

        info!(
            keywords = summaries.len(),
            document_lines = document.len(),
            result_lines = lines.len(),
            remote_fallbacks = fallbacks,
            duration_ms = start.elapsed().as_millis() as u64,
            "Filtering run completed"
        );

        FilterReport {
            lines,
            keywords: summaries,
        }
    }

    /// Run the remote strategy for one keyword, degrading every failure mode
    /// to an explicit fallback outcome.
    async fn run_remote(&self, log_text: &str, keyword: &str) -> (Vec<String>, RemoteOutcome) {
        let Some(remote) = &self.remote else {
            metrics::REMOTE_REQUESTS_TOTAL
                .with_label_values(&["unavailable"])
                .inc();
            return (
                Vec::new(),
                RemoteOutcome::FailedFallback {
                    reason: "remote relevance filtering unavailable".to_string(),
                },
            );
        };

        match timeout(
            self.config.remote_timeout,
            remote.find_related(log_text, keyword),
        )
        .await
        {
            Ok(Ok(lines)) => {
                metrics::REMOTE_REQUESTS_TOTAL
                    .with_label_values(&["matched"])
                    .inc();
                let outcome = RemoteOutcome::Matched { lines: lines.len() };
                (lines, outcome)
            }
            Ok(Err(e)) => {
                warn!(
                    keyword = %keyword,
                    strategy = remote.name(),
                    error = %e,
                    "Remote relevance call failed; falling back to local matches"
                );
                metrics::REMOTE_REQUESTS_TOTAL
                    .with_label_values(&["failed"])
                    .inc();
                (
                    Vec::new(),
                    RemoteOutcome::FailedFallback {
                        reason: e.to_string(),
                    },
                )
            }
            Err(_) => {
                let secs = self.config.remote_timeout.as_secs();
                warn!(
                    keyword = %keyword,
                    strategy = remote.name(),
                    timeout_secs = secs,
                    "Remote relevance call timed out; falling back to local matches"
                );
                metrics::REMOTE_REQUESTS_TOTAL
                    .with_label_values(&["timeout"])
                    .inc();
                (
                    Vec::new(),
                    RemoteOutcome::FailedFallback {
                        reason: format!("timed out after {secs}s"),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, LlmResult};
    use async_trait::async_trait;

    /// Remote stub that returns a fixed candidate list.
    struct FixedRemote(Vec<String>);

    #[async_trait]
    impl RelevanceFilter for FixedRemote {
        async fn find_related(&self, _log_text: &str, _keyword: &str) -> LlmResult<Vec<String>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Remote stub that always fails.
    struct FailingRemote;

    #[async_trait]
    impl RelevanceFilter for FailingRemote {
        async fn find_related(&self, _log_text: &str, _keyword: &str) -> LlmResult<Vec<String>> {
            Err(LlmError::Status {
                code: 429,
                body: "quota exceeded".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn doc() -> LogDocument {
        LogDocument::from_text("INFO boot\nWARN disk full\nERROR disk crash\nINFO done")
    }

    #[tokio::test]
    async fn test_local_only_when_remote_absent() {
        let engine = FilterEngine::new(None, EngineConfig::default());
        let report = engine.filter(&doc(), &KeywordSet::parse("disk")).await;

        assert_eq!(report.lines, vec!["WARN disk full", "ERROR disk crash"]);
        assert_eq!(report.keywords.len(), 1);
        assert!(report.keywords[0].remote.is_fallback());
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_local_matches() {
        let engine = FilterEngine::new(Some(Arc::new(FailingRemote)), EngineConfig::default());
        let report = engine.filter(&doc(), &KeywordSet::parse("disk")).await;

        assert_eq!(report.lines, vec!["WARN disk full", "ERROR disk crash"]);
        assert!(report.keywords[0].remote.is_fallback());
    }

    #[tokio::test]
    async fn test_remote_augments_local_matches() {
        let remote = FixedRemote(vec!["INFO done".to_string()]);
        let engine = FilterEngine::new(Some(Arc::new(remote)), EngineConfig::default());
        let report = engine.filter(&doc(), &KeywordSet::parse("disk")).await;

        // Union of strategies, back in original order
        assert_eq!(
            report.lines,
            vec!["WARN disk full", "ERROR disk crash", "INFO done"]
        );
        assert_eq!(
            report.keywords[0].remote,
            RemoteOutcome::Matched { lines: 1 }
        );
    }

    #[tokio::test]
    async fn test_hallucinated_remote_lines_are_rejected() {
        let remote = FixedRemote(vec!["ERROR disk exploded spectacularly".to_string()]);
        let engine = FilterEngine::new(Some(Arc::new(remote)), EngineConfig::default());
        let report = engine.filter(&doc(), &KeywordSet::parse("disk")).await;

        assert_eq!(report.lines, vec!["WARN disk full", "ERROR disk crash"]);
    }

    #[tokio::test]
    async fn test_summaries_follow_keyword_input_order() {
        let engine = FilterEngine::new(None, EngineConfig::default());
        let report = engine
            .filter(&doc(), &KeywordSet::parse("done,disk,boot"))
            .await;

        let order: Vec<&str> = report.keywords.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(order, vec!["done", "disk", "boot"]);
    }

    #[tokio::test]
    async fn test_empty_keyword_set_yields_empty_result() {
        let engine = FilterEngine::new(None, EngineConfig::default());
        let report = engine.filter(&doc(), &KeywordSet::parse("")).await;

        assert!(report.lines.is_empty());
        assert!(report.keywords.is_empty());
    }
}
