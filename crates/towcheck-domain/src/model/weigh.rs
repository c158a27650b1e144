//! Measured quantities of one weighing event

use serde::{Deserialize, Serialize};

/// One weighing event. Every quantity is in kilograms and is `0` when it was
/// not recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeighMeasurement {
    /// Vehicle alone, laden
    pub vehicle_weight_unhitched: f64,
    pub tow_ball_weight: f64,
    /// Caravan mass on its own wheels while hitched
    pub caravan_weight: f64,
    pub front_axle: f64,
    pub rear_axle: f64,
    /// Axle group readings, carried for the record only
    pub front_axle_group: f64,
    pub rear_axle_group: f64,
    /// Measured combination mass, when the weighbridge recorded one
    pub gross_combination: Option<f64>,
}

impl WeighMeasurement {
    /// Full trailer mass including the coupling load.
    pub fn measured_atm(&self) -> f64 {
        self.caravan_weight + self.tow_ball_weight
    }

    /// Trailer mass carried on its own wheels.
    pub fn measured_gtm(&self) -> f64 {
        self.caravan_weight
    }

    /// Measured combination mass, or the sum of its parts.
    pub fn measured_gcm(&self) -> f64 {
        super::positive(self.gross_combination)
            .unwrap_or(self.vehicle_weight_unhitched + self.caravan_weight + self.tow_ball_weight)
    }
}
