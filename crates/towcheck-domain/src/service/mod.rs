//! Domain services

pub mod advisory;
pub mod compliance;
pub mod evaluation;
pub mod rules;

pub use advisory::{compute_advisory, AdvisoryKind, AdvisoryResult, AdvisoryValue};
pub use compliance::{
    check_compliance, CaravanCompliance, CombinationCompliance, ComplianceOutcome,
    ComplianceResult, Metric, TbmLimitSource, VehicleCompliance,
};
pub use evaluation::{evaluate, evaluate_record, Evaluation};
pub use rules::ComplianceRules;
