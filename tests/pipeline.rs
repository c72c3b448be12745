// End-to-end pipeline tests with in-memory fakes for the extractor and the
// similarity service. No model, network or filesystem image access involved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use calamine::{open_workbook_auto, Reader};

use veridoc::io::write_audit;
use veridoc::matching::{FieldMatcher, SimilarityScorer};
use veridoc::models::{
    audit_columns, Config, DecisionPolicy, FieldType, GroundTruthRow, GroundTruthTable,
    ImageRecord, RetryPolicy, Status,
};
use veridoc::processing::{extractor::build_extraction, Extraction, FieldExtractor};
use veridoc::utils::VerifyError;
use veridoc::validation::DecisionEngine;
use veridoc::BatchVerifier;

struct StubExtractor {
    by_file: HashMap<String, Extraction>,
}

impl FieldExtractor for StubExtractor {
    fn extract(&self, image: &Path) -> Extraction {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.by_file
            .get(&name)
            .cloned()
            .unwrap_or_else(Extraction::empty)
    }
}

struct DownScorer;

impl SimilarityScorer for DownScorer {
    fn score(&self, _: &str, _: &str, _: FieldType) -> Result<f64, VerifyError> {
        Err(VerifyError::Similarity("service unavailable".to_string()))
    }
}

fn record(filename: &str) -> ImageRecord {
    ImageRecord::new(filename, PathBuf::from(format!("/tmp/{}", filename)))
}

fn row(pairs: &[(&str, &str)]) -> GroundTruthRow {
    let mut values = HashMap::new();
    for (k, v) in pairs {
        values.insert(k.to_string(), v.to_string());
    }
    GroundTruthRow::new(values)
}

fn verifier(by_file: HashMap<String, Extraction>, matcher: FieldMatcher) -> BatchVerifier {
    BatchVerifier::new(
        Box::new(StubExtractor { by_file }),
        matcher,
        DecisionEngine::new(DecisionPolicy::default()),
    )
}

#[test]
fn batch_with_matched_missing_and_orphaned_groups() {
    let mut by_file = HashMap::new();
    // A1 has one good scan and one unreadable scan.
    by_file.insert(
        "A1_1.jpg".to_string(),
        build_extraction("Aadhaar", "John Doe", "1234 5678", "Kerala"),
    );
    by_file.insert("A1_2.jpg".to_string(), Extraction::empty());

    let table = GroundTruthTable::new(vec![row(&[
        ("SrNo", "A1"),
        ("Name", "John Doe"),
        ("UID", "1234 5678"),
        ("State", "Kerala"),
    ])]);

    let images = vec![record("A1_1.jpg"), record("A1_2.jpg"), record("B9_1.jpg")];
    let outcome = verifier(by_file, FieldMatcher::local_only())
        .process(&images, &table)
        .unwrap();

    // One entry for the A1 group, one for the orphaned B9 image.
    assert_eq!(outcome.responses.len(), 2);
    assert_eq!(outcome.responses.len(), outcome.audit_rows.len());

    let a1 = &outcome.responses[0];
    assert_eq!(a1.file, "A1_1.jpg, A1_2.jpg");
    assert_eq!(a1.status, Status::Verified);
    assert_eq!(a1.final_remark, "Matched (processed 2 images)");
    assert_eq!(a1.score, Some(100.0));

    let b9 = &outcome.responses[1];
    assert_eq!(b9.status, Status::Rejected);
    assert!(b9.final_remark.contains("B9"));
    assert!(b9.final_remark.contains("not found"));
    assert!(b9.score.is_none());

    // The audit rows mirror the responses row for row.
    assert_eq!(outcome.audit_rows[0].get("SrNo"), "A1");
    assert_eq!(outcome.audit_rows[0].get("Status"), "Verified");
    assert_eq!(outcome.audit_rows[0].get("Final Remarks"), "Matched");
    assert_eq!(outcome.audit_rows[1].get("SrNo"), "B9_1");
    assert_eq!(outcome.audit_rows[1].get("Overall Match"), "");
}

#[test]
fn non_target_classification_rejects_a_perfect_score() {
    let mut by_file = HashMap::new();
    by_file.insert(
        "C7_1.jpg".to_string(),
        build_extraction("Non-Aadhaar", "Jane Roe", "4321", ""),
    );
    let table = GroundTruthTable::new(vec![row(&[
        ("SrNo", "C7"),
        ("Name", "Jane Roe"),
        ("UID", "4321"),
    ])]);

    let outcome = verifier(by_file, FieldMatcher::local_only())
        .process(&[record("C7_1.jpg")], &table)
        .unwrap();

    let response = &outcome.responses[0];
    assert_eq!(response.status, Status::Rejected);
    assert_eq!(response.final_remark, "Non Aadhaar");
    assert_eq!(response.document_type, "Non-Aadhaar");
    // The numeric score is still reported verbatim.
    assert_eq!(response.score, Some(100.0));
    assert_eq!(outcome.audit_rows[0].get("Final Remarks"), "Non Aadhaar");
}

#[test]
fn similarity_outage_does_not_change_local_result() {
    let mut by_file = HashMap::new();
    by_file.insert(
        "D4_1.jpg".to_string(),
        build_extraction("Aadhaar", "Asha Nair", "7777", ""),
    );
    let table = GroundTruthTable::new(vec![row(&[
        ("SrNo", "D4"),
        ("Name", "Asha Nair"),
        ("UID", "7777"),
    ])]);

    let matcher = FieldMatcher::new(
        Some(Box::new(DownScorer)),
        RetryPolicy {
            attempts: 3,
            delay: Duration::from_secs(0),
        },
    );
    let outcome = verifier(by_file, matcher)
        .process(&[record("D4_1.jpg")], &table)
        .unwrap();

    // Every remote attempt failed; the local fuzzy scores carry the decision.
    assert_eq!(outcome.responses[0].status, Status::Verified);
    assert_eq!(outcome.responses[0].score, Some(100.0));
    assert_eq!(outcome.audit_rows[0].get("Name Match Score"), "100.00");
}

#[test]
fn audit_workbook_preserves_the_column_schema() {
    let mut by_file = HashMap::new();
    by_file.insert(
        "A1_1.jpg".to_string(),
        build_extraction("Aadhaar", "John Doe", "1234", ""),
    );
    let table = GroundTruthTable::new(vec![row(&[("SrNo", "A1"), ("Name", "John Doe"), ("UID", "1234")])]);
    let outcome = verifier(by_file, FieldMatcher::local_only())
        .process(&[record("A1_1.jpg"), record("Z0_1.jpg")], &table)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.xlsx");
    write_audit(&path, &outcome.audit_rows).unwrap();

    let mut workbook = open_workbook_auto(&path).unwrap();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    let header: Vec<String> = range
        .rows()
        .next()
        .unwrap()
        .iter()
        .map(|cell| cell.to_string())
        .collect();
    assert_eq!(header, audit_columns());
    // Header plus one row per audit entry.
    assert_eq!(range.rows().count(), 1 + outcome.audit_rows.len());
}

#[test]
fn config_requires_the_extractor_endpoint() {
    let _lock = ENV_LOCK.lock().unwrap();
    std::env::remove_var("EXTRACTOR_API_URL");
    std::env::remove_var("SIMILARITY_API_URL");
    assert!(matches!(Config::from_env(), Err(VerifyError::Config(_))));

    std::env::set_var("EXTRACTOR_API_URL", "http://localhost:9000/extract");
    let config = Config::from_env().unwrap();
    assert_eq!(config.decision.verify_threshold, 85.0);
    assert_eq!(config.retry.attempts, 3);
    std::env::remove_var("EXTRACTOR_API_URL");
}

#[test]
fn similarity_url_without_key_is_a_config_error() {
    let _lock = ENV_LOCK.lock().unwrap();
    std::env::set_var("EXTRACTOR_API_URL", "http://localhost:9000/extract");
    std::env::set_var("SIMILARITY_API_URL", "http://localhost:9001/score");
    std::env::remove_var("SIMILARITY_API_KEY");
    assert!(matches!(Config::from_env(), Err(VerifyError::Config(_))));
    std::env::remove_var("EXTRACTOR_API_URL");
    std::env::remove_var("SIMILARITY_API_URL");
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
