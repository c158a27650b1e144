//! Domain model types

pub mod caravan;
pub mod normalize;
pub mod vehicle;
pub mod weigh;

pub use caravan::CaravanSpec;
pub use normalize::{normalize_caravan, normalize_vehicle, normalize_weigh};
pub use vehicle::VehicleSpec;
pub use weigh::WeighMeasurement;

/// Keep a rating only when it is a positive number.
///
/// A zero rating would read as "zero capacity" and fail every check, so it is
/// treated the same as no rating at all.
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}
