//! In-memory memoization of evaluations
//!
//! Entries are keyed by record id plus a SHA-256 fingerprint of the
//! normalized inputs and rules, so an edited record gets a new key instead
//! of a stale result.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use towcheck_domain::{evaluate, CaravanSpec, ComplianceRules, Evaluation, VehicleSpec, WeighMeasurement};
use towcheck_types::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    record_id: String,
    fingerprint: String,
}

/// Evaluation cache; batch workers hold one each
#[derive(Debug, Default)]
pub struct EvaluationCache {
    entries: HashMap<CacheKey, Evaluation>,
    hits: usize,
    misses: usize,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint of everything an evaluation depends on
    pub fn fingerprint(
        vehicle: &VehicleSpec,
        caravan: &CaravanSpec,
        weigh: &WeighMeasurement,
        rules: &ComplianceRules,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct Inputs<'a> {
            vehicle: &'a VehicleSpec,
            caravan: &'a CaravanSpec,
            weigh: &'a WeighMeasurement,
            rules: &'a ComplianceRules,
        }

        let bytes = serde_json::to_vec(&Inputs {
            vehicle,
            caravan,
            weigh,
            rules,
        })?;
        let hash = Sha256::digest(&bytes);
        Ok(format!("{:x}", hash))
    }

    /// Cached evaluation for the record, computing it on a miss
    pub fn get_or_evaluate(
        &mut self,
        record_id: &str,
        vehicle: &VehicleSpec,
        caravan: &CaravanSpec,
        weigh: &WeighMeasurement,
        rules: &ComplianceRules,
    ) -> Result<&Evaluation> {
        let key = CacheKey {
            record_id: record_id.to_string(),
            fingerprint: Self::fingerprint(vehicle, caravan, weigh, rules)?,
        };

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                let evaluation = evaluate(vehicle.clone(), caravan.clone(), weigh.clone(), rules);
                Ok(entry.insert(evaluation))
            }
        }
    }

    /// Drop every cached version of a record. Returns how many were removed.
    pub fn invalidate(&mut self, record_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.record_id != record_id);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    pub fn display(&self) -> String {
        format!(
            "Cache Statistics\n\
             ================\n\
             Entries: {}\n\
             Hits:    {}\n\
             Misses:  {}",
            self.entry_count, self.hits, self.misses
        )
    }
}
