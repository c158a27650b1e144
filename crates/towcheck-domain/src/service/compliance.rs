//! Compliance checking against regulated mass limits

use serde::{Deserialize, Serialize};

use super::rules::ComplianceRules;
use crate::model::{positive, CaravanSpec, VehicleSpec, WeighMeasurement};

/// Regulated metric, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Gvm,
    FrontAxle,
    RearAxle,
    Tbm,
    Atm,
    Gtm,
    Gcm,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Gvm => "GVM",
            Metric::FrontAxle => "Front Axle",
            Metric::RearAxle => "Rear Axle",
            Metric::Tbm => "TBM",
            Metric::Atm => "ATM",
            Metric::Gtm => "GTM",
            Metric::Gcm => "GCM",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Metric::Gvm => "Vehicle load (unhitched)",
            Metric::FrontAxle => "Front axle load",
            Metric::RearAxle => "Rear axle load",
            Metric::Tbm => "Tow-ball load",
            Metric::Atm => "Caravan total incl. tow-ball",
            Metric::Gtm => "Caravan on its own wheels",
            Metric::Gcm => "Vehicle and caravan combined",
        }
    }
}

/// Outcome for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub metric: Metric,
    pub name: String,
    pub actual: f64,
    pub limit: Option<f64>,
    pub compliant: bool,
    /// `actual / limit` as a rounded percentage
    pub percentage: Option<i64>,
}

impl ComplianceResult {
    pub fn evaluate(metric: Metric, actual: f64, limit: Option<f64>) -> Self {
        let limit = positive(limit);
        Self {
            metric,
            name: metric.label().to_string(),
            actual,
            limit,
            compliant: limit.is_some_and(|l| actual <= l),
            percentage: limit.map(|l| (actual / l * 100.0).round() as i64),
        }
    }

    /// Whether this metric takes part in the overall verdict.
    pub fn is_rated(&self) -> bool {
        self.limit.is_some()
    }

    /// Remaining headroom; negative when over the limit.
    pub fn headroom(&self) -> Option<f64> {
        self.limit.map(|l| l - self.actual)
    }
}

/// Where the tow-ball limit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TbmLimitSource {
    /// The vehicle's own TBM rating
    Rated,
    /// A share of the caravan ATM
    AtmFallback,
    Unrated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCompliance {
    pub gvm: ComplianceResult,
    pub front_axle: Option<ComplianceResult>,
    pub rear_axle: Option<ComplianceResult>,
    pub tbm: ComplianceResult,
    pub tbm_source: TbmLimitSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaravanCompliance {
    pub atm: ComplianceResult,
    /// Absent when the caravan has no GTM rating
    pub gtm: Option<ComplianceResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationCompliance {
    pub gcm: ComplianceResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceOutcome {
    pub vehicle: VehicleCompliance,
    pub caravan: CaravanCompliance,
    pub combination: CombinationCompliance,
    pub overall_compliant: bool,
}

impl ComplianceOutcome {
    /// Every evaluated metric in report order.
    pub fn results(&self) -> Vec<&ComplianceResult> {
        let mut results = vec![&self.vehicle.gvm];
        results.extend(self.vehicle.front_axle.as_ref());
        results.extend(self.vehicle.rear_axle.as_ref());
        results.push(&self.vehicle.tbm);
        results.push(&self.caravan.atm);
        results.extend(self.caravan.gtm.as_ref());
        results.push(&self.combination.gcm);
        results
    }

    /// Rated metrics that exceed their limit.
    pub fn failing(&self) -> Vec<&ComplianceResult> {
        self.results()
            .into_iter()
            .filter(|r| r.is_rated() && !r.compliant)
            .collect()
    }

    pub fn get(&self, metric: Metric) -> Option<&ComplianceResult> {
        self.results().into_iter().find(|r| r.metric == metric)
    }
}

/// Check every regulated metric. All metrics are always computed so the full
/// breakdown is available even when the verdict is negative.
pub fn check_compliance(
    vehicle: &VehicleSpec,
    caravan: &CaravanSpec,
    weigh: &WeighMeasurement,
    rules: &ComplianceRules,
) -> ComplianceOutcome {
    let (tbm_limit, tbm_source) = resolve_tbm_limit(vehicle, caravan, rules);

    let vehicle_compliance = VehicleCompliance {
        gvm: ComplianceResult::evaluate(Metric::Gvm, weigh.vehicle_weight_unhitched, vehicle.gvm),
        front_axle: positive(vehicle.fawr).map(|limit| {
            ComplianceResult::evaluate(Metric::FrontAxle, weigh.front_axle, Some(limit))
        }),
        rear_axle: positive(vehicle.rawr).map(|limit| {
            ComplianceResult::evaluate(Metric::RearAxle, weigh.rear_axle, Some(limit))
        }),
        tbm: ComplianceResult::evaluate(Metric::Tbm, weigh.tow_ball_weight, tbm_limit),
        tbm_source,
    };

    let caravan_compliance = CaravanCompliance {
        atm: ComplianceResult::evaluate(Metric::Atm, weigh.measured_atm(), caravan.atm),
        gtm: positive(caravan.gtm)
            .map(|limit| ComplianceResult::evaluate(Metric::Gtm, weigh.measured_gtm(), Some(limit))),
    };

    let combination = CombinationCompliance {
        gcm: ComplianceResult::evaluate(Metric::Gcm, weigh.measured_gcm(), vehicle.gcm),
    };

    let mut outcome = ComplianceOutcome {
        vehicle: vehicle_compliance,
        caravan: caravan_compliance,
        combination,
        overall_compliant: false,
    };
    outcome.overall_compliant = outcome
        .results()
        .iter()
        .filter(|r| r.is_rated())
        .all(|r| r.compliant);
    outcome
}

fn resolve_tbm_limit(
    vehicle: &VehicleSpec,
    caravan: &CaravanSpec,
    rules: &ComplianceRules,
) -> (Option<f64>, TbmLimitSource) {
    if let Some(tbm) = positive(vehicle.tbm) {
        return (Some(tbm), TbmLimitSource::Rated);
    }
    match positive(caravan.atm).and_then(|atm| positive(Some(atm * rules.tbm_fallback_ratio))) {
        Some(limit) => (Some(limit), TbmLimitSource::AtmFallback),
        None => (None, TbmLimitSource::Unrated),
    }
}
