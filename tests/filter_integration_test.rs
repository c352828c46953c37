use async_trait::async_trait;
use llm_log_sifter::filter::{EngineConfig, FilterEngine, RelevanceFilter};
use llm_log_sifter::llm::{LlmError, LlmResult};
use llm_log_sifter::models::{KeywordSet, LogDocument, RemoteOutcome};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Helper function to create the shared test document
fn create_test_document() -> LogDocument {
    LogDocument::from_text(
        "INFO boot\n\
         WARN disk full\n\
         ERROR disk crash\n\
         INFO fan speed nominal\n\
         ERROR thermal shutdown imminent\n\
         INFO done",
    )
}

/// Scripted relevance filter: fixed answers per keyword, errors elsewhere.
struct ScriptedRemote {
    answers: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedRemote {
    fn new(answers: HashMap<String, Vec<String>>) -> Self {
        Self {
            answers,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RelevanceFilter for ScriptedRemote {
    async fn find_related(&self, _log_text: &str, keyword: &str) -> LlmResult<Vec<String>> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(keyword) {
            Some(lines) => Ok(lines.clone()),
            None => Err(LlmError::Status {
                code: 500,
                body: "no script for keyword".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Relevance filter that never completes within the engine timeout.
struct HangingRemote;

#[async_trait]
impl RelevanceFilter for HangingRemote {
    async fn find_related(&self, _log_text: &str, _keyword: &str) -> LlmResult<Vec<String>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "hanging"
    }
}

/// Per-keyword union of both strategies, merged back to document order
#[tokio::test]
async fn test_union_of_local_and_remote_keeps_document_order() {
    let mut answers = HashMap::new();
    // Semantic match the local matcher cannot see: "thermal" for keyword "disk"
    answers.insert(
        "disk".to_string(),
        vec!["ERROR thermal shutdown imminent".to_string()],
    );

    let engine = FilterEngine::new(
        Some(Arc::new(ScriptedRemote::new(answers))),
        EngineConfig::default(),
    );

    let report = engine
        .filter(&create_test_document(), &KeywordSet::parse("disk"))
        .await;

    assert_eq!(
        report.lines,
        vec![
            "WARN disk full",
            "ERROR disk crash",
            "ERROR thermal shutdown imminent",
        ]
    );
    assert_eq!(report.keywords[0].remote, RemoteOutcome::Matched { lines: 1 });
    assert_eq!(report.keywords[0].local_matches, 2);
}

/// Forced remote failure for one keyword leaves its local matches intact
/// and does not disturb the other keyword
#[tokio::test]
async fn test_partial_remote_failure_degrades_only_that_keyword() {
    let mut answers = HashMap::new();
    answers.insert("boot".to_string(), vec!["INFO done".to_string()]);
    // "disk" has no script -> the scripted remote errors for it

    let engine = FilterEngine::new(
        Some(Arc::new(ScriptedRemote::new(answers))),
        EngineConfig::default(),
    );

    let report = engine
        .filter(&create_test_document(), &KeywordSet::parse("disk,boot"))
        .await;

    // Local recall for "disk" survives its remote failure
    assert!(report.lines.contains(&"WARN disk full".to_string()));
    assert!(report.lines.contains(&"ERROR disk crash".to_string()));
    // Remote enrichment for "boot" still applied
    assert!(report.lines.contains(&"INFO done".to_string()));

    assert!(report.keywords[0].remote.is_fallback());
    assert_eq!(report.keywords[1].remote, RemoteOutcome::Matched { lines: 1 });
}

/// The whole run never fails because every remote call failed
#[tokio::test]
async fn test_all_remote_failures_still_return_local_results() {
    let engine = FilterEngine::new(
        Some(Arc::new(ScriptedRemote::new(HashMap::new()))),
        EngineConfig::default(),
    );

    let report = engine
        .filter(&create_test_document(), &KeywordSet::parse("disk,thermal"))
        .await;

    assert_eq!(
        report.lines,
        vec![
            "WARN disk full",
            "ERROR disk crash",
            "ERROR thermal shutdown imminent",
        ]
    );
    assert!(report.keywords.iter().all(|k| k.remote.is_fallback()));
}

/// Remote timeout is a strategy failure, not a run failure
#[tokio::test]
async fn test_remote_timeout_falls_back_to_local() {
    let engine = FilterEngine::new(
        Some(Arc::new(HangingRemote)),
        EngineConfig {
            max_concurrent_remote: 2,
            remote_timeout: Duration::from_millis(50),
        },
    );

    let report = engine
        .filter(&create_test_document(), &KeywordSet::parse("disk"))
        .await;

    assert_eq!(report.lines, vec!["WARN disk full", "ERROR disk crash"]);
    match &report.keywords[0].remote {
        RemoteOutcome::FailedFallback { reason } => assert!(reason.contains("timed out")),
        other => panic!("expected fallback, got {other:?}"),
    }
}

/// Hallucinated remote lines never reach the result
#[tokio::test]
async fn test_hallucination_rejection() {
    let mut answers = HashMap::new();
    answers.insert(
        "disk".to_string(),
        vec![
            "ERROR disk crash".to_string(),
            "FATAL disk has become sentient".to_string(),
        ],
    );

    let engine = FilterEngine::new(
        Some(Arc::new(ScriptedRemote::new(answers))),
        EngineConfig::default(),
    );

    let report = engine
        .filter(&create_test_document(), &KeywordSet::parse("disk"))
        .await;

    assert!(!report
        .lines
        .iter()
        .any(|line| line.contains("sentient")));
    assert_eq!(report.lines, vec!["WARN disk full", "ERROR disk crash"]);
}

/// The same line proposed by both strategies and multiple keywords appears once
#[tokio::test]
async fn test_cross_strategy_and_cross_keyword_deduplication() {
    let mut answers = HashMap::new();
    answers.insert(
        "disk".to_string(),
        vec!["WARN disk full".to_string(), "ERROR disk crash".to_string()],
    );
    answers.insert("crash".to_string(), vec!["ERROR disk crash".to_string()]);

    let engine = FilterEngine::new(
        Some(Arc::new(ScriptedRemote::new(answers))),
        EngineConfig::default(),
    );

    let report = engine
        .filter(&create_test_document(), &KeywordSet::parse("disk,crash"))
        .await;

    assert_eq!(report.lines, vec!["WARN disk full", "ERROR disk crash"]);
}

/// Output is invariant to keyword order (completion order may differ)
#[tokio::test]
async fn test_result_invariant_to_keyword_order() {
    let engine = FilterEngine::new(None, EngineConfig::default());
    let doc = create_test_document();

    let forward = engine.filter(&doc, &KeywordSet::parse("disk,boot")).await;
    let backward = engine.filter(&doc, &KeywordSet::parse("boot,disk")).await;

    assert_eq!(forward.lines, backward.lines);
}

/// Worked example from the filtering contract
#[tokio::test]
async fn test_spec_worked_example() {
    let doc = LogDocument::from_text("INFO boot\nWARN disk full\nERROR disk crash\nINFO done");
    let engine = FilterEngine::new(None, EngineConfig::default());

    let report = engine.filter(&doc, &KeywordSet::parse("disk")).await;

    assert_eq!(report.lines, vec!["WARN disk full", "ERROR disk crash"]);
}
