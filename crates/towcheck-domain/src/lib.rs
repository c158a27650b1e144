//! Towing-compliance domain
//!
//! Normalizes vehicle, caravan and weighing records, checks them against the
//! regulated mass limits and lays out the compliance report grid.

pub mod model;
pub mod report;
pub mod service;

pub use model::{CaravanSpec, VehicleSpec, WeighMeasurement};
pub use report::{build_report, render_text, ComplianceReport, ReportHeader};
pub use service::{evaluate, evaluate_record, ComplianceOutcome, ComplianceRules, Evaluation};
