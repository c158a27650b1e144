//! Advisory towing ratios
//!
//! These are guidance figures only. They are shown next to the compliance
//! breakdown but never take part in the overall verdict.

use serde::{Deserialize, Serialize};

use super::rules::ComplianceRules;
use crate::model::{positive, CaravanSpec, VehicleSpec, WeighMeasurement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvisoryKind {
    VanToCar,
    TowBall,
    Btc,
    SpareCapacity,
}

impl AdvisoryKind {
    pub fn label(&self) -> &'static str {
        match self {
            AdvisoryKind::VanToCar => "Van to Car Ratio",
            AdvisoryKind::TowBall => "Tow Ball %",
            AdvisoryKind::Btc => "BTC Ratio",
            AdvisoryKind::SpareCapacity => "Possible Spare Capacity",
        }
    }

    /// Ideal band as shown to the user.
    pub fn band_text(&self, rules: &ComplianceRules) -> String {
        match self {
            AdvisoryKind::VanToCar => format!("Ideal: under {}", percent(rules.van_to_car_ideal_max)),
            AdvisoryKind::TowBall => format!(
                "Ideal: {} to {}",
                percent(rules.tow_ball_ideal_min),
                percent(rules.tow_ball_ideal_max)
            ),
            AdvisoryKind::Btc => format!("Ideal: under {}", percent(rules.btc_ideal_max)),
            AdvisoryKind::SpareCapacity => "Remaining ATM headroom".to_string(),
        }
    }

    /// Ratios are fractions; spare capacity is kilograms.
    pub fn is_ratio(&self) -> bool {
        !matches!(self, AdvisoryKind::SpareCapacity)
    }
}

fn percent(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

/// One advisory figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryValue {
    pub value: f64,
    /// Inside the ideal band
    pub ideal: bool,
    /// False when the input it depends on was not supplied
    pub applicable: bool,
}

impl AdvisoryValue {
    fn not_applicable() -> Self {
        Self {
            value: 0.0,
            ideal: false,
            applicable: false,
        }
    }

    fn banded(value: f64, ideal: bool) -> Self {
        Self {
            value,
            ideal,
            applicable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryResult {
    pub van_to_car_ratio: AdvisoryValue,
    pub tow_ball_percentage: AdvisoryValue,
    pub btc_ratio: AdvisoryValue,
    /// Kilograms left before the caravan reaches its ATM
    pub possible_spare_capacity: AdvisoryValue,
}

impl AdvisoryResult {
    /// Figures in report order.
    pub fn entries(&self) -> [(AdvisoryKind, AdvisoryValue); 4] {
        [
            (AdvisoryKind::VanToCar, self.van_to_car_ratio),
            (AdvisoryKind::TowBall, self.tow_ball_percentage),
            (AdvisoryKind::Btc, self.btc_ratio),
            (AdvisoryKind::SpareCapacity, self.possible_spare_capacity),
        ]
    }
}

pub fn compute_advisory(
    vehicle: &VehicleSpec,
    caravan: &CaravanSpec,
    weigh: &WeighMeasurement,
    rules: &ComplianceRules,
) -> AdvisoryResult {
    let van_to_car_ratio = if weigh.vehicle_weight_unhitched > 0.0 {
        let ratio = weigh.caravan_weight / weigh.vehicle_weight_unhitched;
        AdvisoryValue::banded(ratio, ratio < rules.van_to_car_ideal_max)
    } else {
        AdvisoryValue::not_applicable()
    };

    let tow_ball_percentage = if weigh.caravan_weight > 0.0 {
        let ratio = weigh.tow_ball_weight / weigh.caravan_weight;
        AdvisoryValue::banded(
            ratio,
            ratio >= rules.tow_ball_ideal_min && ratio <= rules.tow_ball_ideal_max,
        )
    } else {
        AdvisoryValue::not_applicable()
    };

    let btc_ratio = match positive(vehicle.btc) {
        Some(btc) => {
            let ratio = weigh.measured_gtm() / btc;
            AdvisoryValue::banded(ratio, ratio < rules.btc_ideal_max)
        }
        None => AdvisoryValue::not_applicable(),
    };

    let possible_spare_capacity = match positive(caravan.atm) {
        Some(atm) => {
            let spare = (atm - weigh.measured_atm()).max(0.0);
            AdvisoryValue::banded(spare, spare > 0.0)
        }
        None => AdvisoryValue::not_applicable(),
    };

    AdvisoryResult {
        van_to_car_ratio,
        tow_ball_percentage,
        btc_ratio,
        possible_spare_capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisory(vehicle: VehicleSpec, caravan: CaravanSpec, weigh: WeighMeasurement) -> AdvisoryResult {
        compute_advisory(&vehicle, &caravan, &weigh, &ComplianceRules::default())
    }

    fn weigh() -> WeighMeasurement {
        WeighMeasurement {
            vehicle_weight_unhitched: 2900.0,
            tow_ball_weight: 150.0,
            caravan_weight: 1900.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_van_to_car_ratio() {
        let result = advisory(VehicleSpec::default(), CaravanSpec::default(), weigh());
        let v = result.van_to_car_ratio;
        assert!((v.value - 1900.0 / 2900.0).abs() < 1e-9);
        assert!(v.ideal);
    }

    #[test]
    fn test_van_heavier_than_band() {
        let w = WeighMeasurement {
            caravan_weight: 2700.0,
            ..weigh()
        };
        let result = advisory(VehicleSpec::default(), CaravanSpec::default(), w);
        assert!(!result.van_to_car_ratio.ideal);
    }

    #[test]
    fn test_tow_ball_band() {
        let w = WeighMeasurement {
            tow_ball_weight: 171.0,
            ..weigh()
        };
        let result = advisory(VehicleSpec::default(), CaravanSpec::default(), w);
        assert!(result.tow_ball_percentage.ideal);

        // 150 / 1900 is just under 8%
        let result = advisory(VehicleSpec::default(), CaravanSpec::default(), weigh());
        assert!(!result.tow_ball_percentage.ideal);
    }

    #[test]
    fn test_btc_ratio_uses_gtm_reading() {
        let vehicle = VehicleSpec {
            btc: Some(2500.0),
            ..Default::default()
        };
        let result = advisory(vehicle, CaravanSpec::default(), weigh());
        assert!((result.btc_ratio.value - 0.76).abs() < 1e-9);
        assert!(result.btc_ratio.ideal);
    }

    #[test]
    fn test_spare_capacity_never_negative() {
        let caravan = CaravanSpec {
            atm: Some(2200.0),
            ..Default::default()
        };
        let result = advisory(VehicleSpec::default(), caravan.clone(), weigh());
        assert!((result.possible_spare_capacity.value - 150.0).abs() < 1e-9);

        let heavy = WeighMeasurement {
            caravan_weight: 2300.0,
            ..weigh()
        };
        let result = advisory(VehicleSpec::default(), caravan, heavy);
        assert_eq!(result.possible_spare_capacity.value, 0.0);
        assert!(!result.possible_spare_capacity.ideal);
    }

    #[test]
    fn test_missing_denominators_not_applicable() {
        let result = advisory(
            VehicleSpec::default(),
            CaravanSpec::default(),
            WeighMeasurement::default(),
        );
        for (_, value) in result.entries() {
            assert!(!value.applicable);
            assert!(!value.ideal);
            assert_eq!(value.value, 0.0);
        }
    }

    #[test]
    fn test_band_text() {
        let rules = ComplianceRules::default();
        assert_eq!(AdvisoryKind::VanToCar.band_text(&rules), "Ideal: under 85%");
        assert_eq!(AdvisoryKind::TowBall.band_text(&rules), "Ideal: 8% to 10%");
        assert_eq!(AdvisoryKind::Btc.band_text(&rules), "Ideal: under 80%");
    }
}
