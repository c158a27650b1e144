//! Tow vehicle rated limits

use serde::{Deserialize, Serialize};

/// Rated limits for a tow vehicle. All masses in kilograms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpec {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub variant: Option<String>,
    /// Gross vehicle mass
    pub gvm: Option<f64>,
    /// Gross combination mass
    pub gcm: Option<f64>,
    /// Braked towing capacity
    pub btc: Option<f64>,
    /// Rated tow-ball mass
    pub tbm: Option<f64>,
    /// Front axle weight rating
    pub fawr: Option<f64>,
    /// Rear axle weight rating
    pub rawr: Option<f64>,
}

impl VehicleSpec {
    /// "2021 Toyota LandCruiser GXL" style label; empty parts are skipped.
    pub fn display_name(&self) -> String {
        display_name(
            self.year,
            &[
                self.make.as_str(),
                self.model.as_str(),
                self.variant.as_deref().unwrap_or(""),
            ],
        )
    }
}

pub(crate) fn display_name(year: Option<i32>, parts: &[&str]) -> String {
    let year = year.map(|y| y.to_string());
    let name = year
        .iter()
        .map(String::as_str)
        .chain(parts.iter().copied())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_full() {
        let vehicle = VehicleSpec {
            make: "Toyota".to_string(),
            model: "LandCruiser".to_string(),
            year: Some(2021),
            variant: Some("GXL".to_string()),
            ..Default::default()
        };
        assert_eq!(vehicle.display_name(), "2021 Toyota LandCruiser GXL");
    }

    #[test]
    fn test_display_name_empty() {
        assert_eq!(VehicleSpec::default().display_name(), "Unknown");
    }
}
