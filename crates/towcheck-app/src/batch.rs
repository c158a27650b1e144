//! Batch evaluation of many weigh records
//!
//! Every record is evaluated on its own. Records are split across scoped
//! worker threads and the per-record outcomes are reduced into a summary; a
//! malformed record becomes a failed entry and the rest of the batch goes on.
//! Each worker keeps its own `EvaluationCache`, so a record repeated with the
//! same id and inputs is evaluated once per worker.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::thread;
use towcheck_domain::model::{normalize_caravan, normalize_vehicle, normalize_weigh};
use towcheck_domain::{evaluate, ComplianceRules, Evaluation, ReportHeader};
use towcheck_types::RecordError;
use tracing::{debug, warn};

use crate::cache::EvaluationCache;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    /// Position in the input list
    pub index: usize,
    pub header: ReportHeader,
    pub outcome: Result<Evaluation, RecordError>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
    pub total: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub failed: usize,
    /// Entries served from a worker's cache
    pub reused: usize,
}

impl BatchSummary {
    fn from_entries(entries: Vec<BatchEntry>, reused: usize) -> Self {
        let mut summary = Self {
            total: entries.len(),
            compliant: 0,
            non_compliant: 0,
            failed: 0,
            reused,
            entries: Vec::new(),
        };
        for entry in &entries {
            match &entry.outcome {
                Ok(e) if e.compliance.overall_compliant => summary.compliant += 1,
                Ok(_) => summary.non_compliant += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary.entries = entries;
        summary
    }

    /// Share of evaluated records that are compliant, in percent.
    pub fn compliance_rate(&self) -> Option<f64> {
        let evaluated = self.compliant + self.non_compliant;
        (evaluated > 0).then(|| self.compliant as f64 / evaluated as f64 * 100.0)
    }

    pub fn display(&self) -> String {
        let mut out = format!(
            "Batch Summary\n\
             =============\n\
             Records:        {}\n\
             Compliant:      {}\n\
             Non-compliant:  {}\n\
             Failed:         {}\n",
            self.total, self.compliant, self.non_compliant, self.failed
        );
        if let Some(rate) = self.compliance_rate() {
            out.push_str(&format!("Compliance rate: {:.1}%\n", rate));
        }
        if self.reused > 0 {
            out.push_str(&format!("Repeated records: {}\n", self.reused));
        }
        out
    }
}

/// Evaluate every record. `jobs == 0` uses the CPU count.
pub fn evaluate_batch(records: &[Value], rules: &ComplianceRules, jobs: usize) -> BatchSummary {
    let now = Utc::now();
    let workers = if jobs == 0 { num_cpus::get() } else { jobs }.max(1);
    let chunk_size = records.len().div_ceil(workers).max(1);

    let (entries, reused) = thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk_size)
            .enumerate()
            .map(|(chunk, slice)| {
                scope.spawn(move || {
                    let mut cache = EvaluationCache::new();
                    let entries = slice
                        .iter()
                        .enumerate()
                        .map(|(offset, raw)| {
                            evaluate_entry(chunk * chunk_size + offset, raw, rules, now, &mut cache)
                        })
                        .collect::<Vec<_>>();
                    (entries, cache.stats().hits)
                })
            })
            .collect();

        let mut entries = Vec::with_capacity(records.len());
        let mut reused = 0;
        for handle in handles {
            match handle.join() {
                Ok((chunk, hits)) => {
                    entries.extend(chunk);
                    reused += hits;
                }
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        (entries, reused)
    });

    BatchSummary::from_entries(entries, reused)
}

fn evaluate_entry(
    index: usize,
    raw: &Value,
    rules: &ComplianceRules,
    now: DateTime<Utc>,
    cache: &mut EvaluationCache,
) -> BatchEntry {
    let header = ReportHeader::from_record(raw, &format!("record-{}", index + 1), now);
    let outcome = normalize_vehicle(raw).and_then(|vehicle| {
        let caravan = normalize_caravan(raw)?;
        let weigh = normalize_weigh(raw)?;
        Ok(match cache.get_or_evaluate(&header.report_id, &vehicle, &caravan, &weigh, rules) {
            Ok(evaluation) => evaluation.clone(),
            Err(e) => {
                warn!(record = %header.report_id, error = %e, "evaluating without cache");
                evaluate(vehicle, caravan, weigh, rules)
            }
        })
    });
    match &outcome {
        Ok(evaluation) => debug!(
            record = %header.report_id,
            compliant = evaluation.compliance.overall_compliant,
            "evaluated record"
        ),
        Err(e) => warn!(record = %header.report_id, error = %e, "skipping malformed record"),
    }
    BatchEntry {
        index,
        header,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, caravan_weight: f64) -> Value {
        json!({
            "id": id,
            "vehicle": { "gvm": 3000, "gcm": 6000, "btc": 2500 },
            "caravan": { "atm": 2200, "gtm": 1800 },
            "vehicleWeightUnhitched": 2900,
            "towBallWeight": 150,
            "caravanWeight": caravan_weight
        })
    }

    #[test]
    fn test_malformed_record_does_not_abort() {
        let records = vec![
            record("a", 1700.0),
            json!("not a record"),
            record("c", 1900.0),
            json!({ "id": "d", "towBallWeight": [1, 2] }),
            record("e", 1600.0),
        ];
        let summary = evaluate_batch(&records, &ComplianceRules::default(), 2);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.compliant, 2);
        assert_eq!(summary.non_compliant, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.entries[1].header.report_id, "record-2");
        assert_eq!(summary.entries[3].header.report_id, "d");
        assert!(summary.entries[3].outcome.is_err());
    }

    #[test]
    fn test_entries_keep_input_order() {
        let records: Vec<Value> = (0..23).map(|i| record(&format!("r{}", i), 1700.0)).collect();
        let summary = evaluate_batch(&records, &ComplianceRules::default(), 4);
        for (i, entry) in summary.entries.iter().enumerate() {
            assert_eq!(entry.index, i);
            assert_eq!(entry.header.report_id, format!("r{}", i));
        }
    }

    #[test]
    fn test_repeated_record_is_reused() {
        let records = vec![record("a", 1700.0), record("a", 1700.0), record("a", 1900.0)];
        let summary = evaluate_batch(&records, &ComplianceRules::default(), 1);
        assert_eq!(summary.reused, 1);
        assert_eq!(summary.compliant, 2);
        assert_eq!(summary.non_compliant, 1);
        assert_eq!(
            summary.entries[0].outcome.as_ref().unwrap(),
            summary.entries[1].outcome.as_ref().unwrap()
        );
        assert!(summary.display().contains("Repeated records: 1"));
    }

    #[test]
    fn test_empty_batch() {
        let summary = evaluate_batch(&[], &ComplianceRules::default(), 0);
        assert_eq!(summary.total, 0);
        assert!(summary.compliance_rate().is_none());
    }

    #[test]
    fn test_display() {
        let summary = evaluate_batch(&[record("a", 1700.0)], &ComplianceRules::default(), 1);
        let text = summary.display();
        assert!(text.contains("Compliant:      1"));
        assert!(text.contains("Compliance rate: 100.0%"));
    }
}
