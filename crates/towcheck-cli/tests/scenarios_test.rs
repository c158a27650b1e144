//! Scenario regression test
//!
//! tests/fixtures/scenarios.json holds weigh records in the shapes the web
//! screens send them, with the expected per-metric outcome. Every record is
//! run through normalization, the compliance engine and the report layout.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use towcheck_app::batch::evaluate_batch;
use towcheck_domain::report::{CellStatus, ColorClass};
use towcheck_domain::{build_report, evaluate_record, ComplianceRules, ReportHeader};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    record: serde_json::Value,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Expected {
    overall_compliant: bool,
    metrics: BTreeMap<String, ExpectedMetric>,
    #[serde(default)]
    absent: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExpectedMetric {
    actual: f64,
    limit: f64,
    compliant: bool,
}

fn load_scenarios() -> Vec<Scenario> {
    let path = fixtures_dir().join("scenarios.json");
    let content = std::fs::read_to_string(&path).expect("Failed to read scenarios.json");
    serde_json::from_str(&content).expect("Failed to parse scenarios.json")
}

#[test]
fn test_scenarios_match_expected_outcome() {
    let rules = ComplianceRules::default();
    for scenario in load_scenarios() {
        let evaluation = evaluate_record(&scenario.record, &rules)
            .unwrap_or_else(|e| panic!("{}: {}", scenario.name, e));
        let outcome = &evaluation.compliance;

        assert_eq!(
            outcome.overall_compliant, scenario.expected.overall_compliant,
            "{}: overall verdict",
            scenario.name
        );

        for (name, expected) in &scenario.expected.metrics {
            let result = outcome
                .results()
                .into_iter()
                .find(|r| &r.name == name)
                .unwrap_or_else(|| panic!("{}: missing metric {}", scenario.name, name));
            assert!((result.actual - expected.actual).abs() < 1e-6, "{}: {} actual", scenario.name, name);
            let limit = result.limit.expect("expected a rated metric");
            assert!((limit - expected.limit).abs() < 1e-6, "{}: {} limit", scenario.name, name);
            assert_eq!(result.compliant, expected.compliant, "{}: {} compliant", scenario.name, name);
        }

        for name in &scenario.expected.absent {
            assert!(
                outcome.results().iter().all(|r| &r.name != name),
                "{}: {} should be omitted",
                scenario.name,
                name
            );
        }
    }
}

#[test]
fn test_report_cells_agree_with_results() {
    let rules = ComplianceRules::default();
    for scenario in load_scenarios() {
        let evaluation = evaluate_record(&scenario.record, &rules).unwrap();
        let header = ReportHeader::from_record(&scenario.record, "fixture", chrono::Utc::now());
        let report = build_report(header, &evaluation);

        assert_eq!(report.cells.len(), evaluation.compliance.results().len());
        for (cell, result) in report.cells.iter().zip(evaluation.compliance.results()) {
            let expected = match (result.is_rated(), result.compliant) {
                (false, _) => (CellStatus::NotApplicable, ColorClass::Neutral),
                (true, true) => (CellStatus::Ok, ColorClass::Success),
                (true, false) => (CellStatus::Over, ColorClass::Failure),
            };
            assert_eq!((cell.status, cell.color), expected, "{}: {}", scenario.name, cell.label);
        }
    }
}

#[test]
fn test_batch_over_scenarios() {
    let scenarios = load_scenarios();
    let mut records: Vec<serde_json::Value> = scenarios.iter().map(|s| s.record.clone()).collect();
    records.push(serde_json::json!(null));

    let summary = evaluate_batch(&records, &ComplianceRules::default(), 0);
    let expected_compliant = scenarios.iter().filter(|s| s.expected.overall_compliant).count();

    assert_eq!(summary.total, scenarios.len() + 1);
    assert_eq!(summary.compliant, expected_compliant);
    assert_eq!(summary.non_compliant, scenarios.len() - expected_compliant);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.entries[0].header.report_id, "S1");
}
