//! One full evaluation of a weighing event

use serde::{Deserialize, Serialize};
use serde_json::Value;
use towcheck_types::RecordError;

use super::advisory::{compute_advisory, AdvisoryResult};
use super::compliance::{check_compliance, ComplianceOutcome};
use super::rules::ComplianceRules;
use crate::model::{
    normalize_caravan, normalize_vehicle, normalize_weigh, CaravanSpec, VehicleSpec,
    WeighMeasurement,
};

/// Inputs plus everything computed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub vehicle: VehicleSpec,
    pub caravan: CaravanSpec,
    pub weigh: WeighMeasurement,
    pub compliance: ComplianceOutcome,
    pub advisory: AdvisoryResult,
    /// TBM fallback ratio in force, kept for report wording
    pub rules: ComplianceRules,
}

pub fn evaluate(
    vehicle: VehicleSpec,
    caravan: CaravanSpec,
    weigh: WeighMeasurement,
    rules: &ComplianceRules,
) -> Evaluation {
    let compliance = check_compliance(&vehicle, &caravan, &weigh, rules);
    let advisory = compute_advisory(&vehicle, &caravan, &weigh, rules);
    Evaluation {
        vehicle,
        caravan,
        weigh,
        compliance,
        advisory,
        rules: *rules,
    }
}

/// Normalize a combined weigh record (vehicle and caravan inline or nested)
/// and evaluate it.
pub fn evaluate_record(raw: &Value, rules: &ComplianceRules) -> Result<Evaluation, RecordError> {
    let vehicle = normalize_vehicle(raw)?;
    let caravan = normalize_caravan(raw)?;
    let weigh = normalize_weigh(raw)?;
    Ok(evaluate(vehicle, caravan, weigh, rules))
}
