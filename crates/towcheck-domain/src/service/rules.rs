//! Tunable thresholds for compliance fallbacks and advisory bands

use serde::{Deserialize, Serialize};

/// Thresholds used by the compliance engine and the advisory ratios.
///
/// Ratios are fractions (0.10 = 10%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRules {
    /// Share of the caravan ATM used as tow-ball limit when the vehicle has no TBM rating
    #[serde(default = "default_tbm_fallback_ratio")]
    pub tbm_fallback_ratio: f64,

    /// Caravan weight should stay under this share of the vehicle weight
    #[serde(default = "default_van_to_car_ideal_max")]
    pub van_to_car_ideal_max: f64,

    #[serde(default = "default_tow_ball_ideal_min")]
    pub tow_ball_ideal_min: f64,

    #[serde(default = "default_tow_ball_ideal_max")]
    pub tow_ball_ideal_max: f64,

    /// Trailer mass should stay under this share of the braked towing capacity
    #[serde(default = "default_btc_ideal_max")]
    pub btc_ideal_max: f64,
}

fn default_tbm_fallback_ratio() -> f64 {
    0.10
}

fn default_van_to_car_ideal_max() -> f64 {
    0.85
}

fn default_tow_ball_ideal_min() -> f64 {
    0.08
}

fn default_tow_ball_ideal_max() -> f64 {
    0.10
}

fn default_btc_ideal_max() -> f64 {
    0.80
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            tbm_fallback_ratio: default_tbm_fallback_ratio(),
            van_to_car_ideal_max: default_van_to_car_ideal_max(),
            tow_ball_ideal_min: default_tow_ball_ideal_min(),
            tow_ball_ideal_max: default_tow_ball_ideal_max(),
            btc_ideal_max: default_btc_ideal_max(),
        }
    }
}
