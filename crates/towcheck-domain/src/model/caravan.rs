//! Caravan rated limits

use serde::{Deserialize, Serialize};

use super::vehicle::display_name;

/// Rated limits for a towed unit. All masses in kilograms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaravanSpec {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    /// Aggregate trailer mass
    pub atm: Option<f64>,
    /// Gross trailer mass; some caravans are legitimately unrated
    pub gtm: Option<f64>,
    pub axle_capacity: Option<f64>,
    pub number_of_axles: Option<u32>,
}

impl CaravanSpec {
    pub fn display_name(&self) -> String {
        display_name(self.year, &[self.make.as_str(), self.model.as_str()])
    }
}
