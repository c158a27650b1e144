//! Normalization of loosely shaped records into the typed specs
//!
//! Records arrive the way the storage layer fetched them: the vehicle or
//! caravan may sit inline on the weigh record, nested under a sub-key, or as
//! a joined foreign-key row (an object, or a one-element array). Field names
//! may be camelCase or snake_case and numbers may be strings from form input.
//! Everything is converted once here so the engine never sees missing fields.

use serde_json::{Map, Value};
use towcheck_types::RecordError;

use super::{positive, CaravanSpec, VehicleSpec, WeighMeasurement};

type Object = Map<String, Value>;

const VEHICLE_KEYS: &[&str] = &["vehicle", "vehicles", "vehicleData", "vehicle_data"];
const CARAVAN_KEYS: &[&str] = &["caravan", "caravans", "caravanData", "caravan_data"];
const WEIGH_KEYS: &[&str] = &["weigh", "weighing", "weighData", "weigh_data"];

pub fn normalize_vehicle(raw: &Value) -> Result<VehicleSpec, RecordError> {
    let obj = select(raw, "vehicle", VEHICLE_KEYS)?;
    Ok(VehicleSpec {
        make: text(obj, &["make"]).unwrap_or_default(),
        model: text(obj, &["model"]).unwrap_or_default(),
        year: year(obj),
        variant: text(obj, &["variant", "badge"]),
        gvm: rating(obj, &["gvm", "GVM"])?,
        gcm: rating(obj, &["gcm", "GCM"])?,
        btc: rating(obj, &["btc", "BTC", "brakedTowingCapacity", "braked_towing_capacity"])?,
        tbm: rating(obj, &["tbm", "TBM", "towBallMass", "tow_ball_mass"])?,
        fawr: rating(obj, &["fawr", "FAWR", "frontAxleCapacity", "front_axle_capacity"])?,
        rawr: rating(obj, &["rawr", "RAWR", "rearAxleCapacity", "rear_axle_capacity"])?,
    })
}

pub fn normalize_caravan(raw: &Value) -> Result<CaravanSpec, RecordError> {
    let obj = select(raw, "caravan", CARAVAN_KEYS)?;
    Ok(CaravanSpec {
        make: text(obj, &["make"]).unwrap_or_default(),
        model: text(obj, &["model"]).unwrap_or_default(),
        year: year(obj),
        atm: rating(obj, &["atm", "ATM"])?,
        gtm: rating(obj, &["gtm", "GTM"])?,
        axle_capacity: rating(obj, &["axleCapacity", "axle_capacity"])?,
        number_of_axles: rating(obj, &["numberOfAxles", "number_of_axles"])?
            .map(|n| n.round() as u32),
    })
}

pub fn normalize_weigh(raw: &Value) -> Result<WeighMeasurement, RecordError> {
    let obj = select(raw, "weigh", WEIGH_KEYS)?;
    Ok(WeighMeasurement {
        vehicle_weight_unhitched: measurement(
            obj,
            &["vehicleWeightUnhitched", "vehicle_weight_unhitched"],
        )?,
        tow_ball_weight: measurement(obj, &["towBallWeight", "tow_ball_weight"])?,
        caravan_weight: measurement(obj, &["caravanWeight", "caravan_weight"])?,
        front_axle: measurement(obj, &["frontAxle", "front_axle"])?,
        rear_axle: measurement(obj, &["rearAxle", "rear_axle"])?,
        front_axle_group: measurement(obj, &["frontAxleGroup", "front_axle_group"])?,
        rear_axle_group: measurement(obj, &["rearAxleGroup", "rear_axle_group"])?,
        gross_combination: rating(obj, &["grossCombination", "gross_combination"])?,
    })
}

/// Pick the sub-record under the first present key, or the record itself.
fn select<'a>(
    raw: &'a Value,
    record: &'static str,
    keys: &[&str],
) -> Result<&'a Object, RecordError> {
    let obj = raw.as_object().ok_or(RecordError::NotAnObject { record })?;
    for key in keys {
        match obj.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::Object(nested)) => return Ok(nested),
            Some(Value::Array(rows)) => {
                return rows
                    .first()
                    .and_then(Value::as_object)
                    .ok_or(RecordError::NotAnObject { record })
            }
            Some(_) => return Err(RecordError::NotAnObject { record }),
        }
    }
    Ok(obj)
}

/// First present numeric field among `names`.
fn number(obj: &Object, names: &[&str]) -> Result<Option<f64>, RecordError> {
    let Some((field, value)) = names
        .iter()
        .find_map(|name| obj.get(*name).map(|v| (*name, v)))
    else {
        return Ok(None);
    };

    let invalid = || RecordError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(Some).ok_or_else(invalid),
        Value::String(s) => {
            let cleaned = s.trim().trim_end_matches("kg").trim_end_matches("KG").trim().replace(',', "");
            if cleaned.is_empty() {
                return Ok(None);
            }
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn rating(obj: &Object, names: &[&str]) -> Result<Option<f64>, RecordError> {
    Ok(positive(number(obj, names)?))
}

fn measurement(obj: &Object, names: &[&str]) -> Result<f64, RecordError> {
    Ok(number(obj, names)?.unwrap_or(0.0).max(0.0))
}

fn text(obj: &Object, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match obj.get(*name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn year(obj: &Object) -> Option<i32> {
    match obj.get("year")? {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_vehicle_inline() {
        let raw = json!({
            "make": "Ford",
            "model": "Ranger",
            "year": 2022,
            "gvm": 3280,
            "gcm": 6000,
            "btc": 3500,
            "tbm": 350
        });
        let vehicle = normalize_vehicle(&raw).unwrap();
        assert_eq!(vehicle.make, "Ford");
        assert_eq!(vehicle.year, Some(2022));
        assert_eq!(vehicle.gvm, Some(3280.0));
        assert_eq!(vehicle.tbm, Some(350.0));
        assert_eq!(vehicle.fawr, None);
    }

    #[test]
    fn test_vehicle_nested_under_sub_key() {
        let raw = json!({
            "id": "w-1",
            "vehicles": { "make": "Isuzu", "model": "D-Max", "gvm": "3100", "front_axle_capacity": "1450" }
        });
        let vehicle = normalize_vehicle(&raw).unwrap();
        assert_eq!(vehicle.make, "Isuzu");
        assert_eq!(vehicle.gvm, Some(3100.0));
        assert_eq!(vehicle.fawr, Some(1450.0));
    }

    #[test]
    fn test_joined_row_as_array() {
        let raw = json!({ "caravan": [{ "make": "Jayco", "atm": 2500, "gtm": 2300 }] });
        let caravan = normalize_caravan(&raw).unwrap();
        assert_eq!(caravan.make, "Jayco");
        assert_eq!(caravan.atm, Some(2500.0));
        assert_eq!(caravan.gtm, Some(2300.0));
    }

    #[test]
    fn test_zero_rating_is_unrated() {
        let raw = json!({ "atm": 2200, "gtm": 0 });
        let caravan = normalize_caravan(&raw).unwrap();
        assert_eq!(caravan.gtm, None);
    }

    #[test]
    fn test_empty_string_is_absent() {
        let raw = json!({ "gvm": "", "tbm": null, "gcm": " 6,000 kg " });
        let vehicle = normalize_vehicle(&raw).unwrap();
        assert_eq!(vehicle.gvm, None);
        assert_eq!(vehicle.tbm, None);
        assert_eq!(vehicle.gcm, Some(6000.0));
    }

    #[test]
    fn test_weigh_defaults_to_zero() {
        let raw = json!({ "towBallWeight": 150, "caravan_weight": "1900" });
        let weigh = normalize_weigh(&raw).unwrap();
        assert_eq!(
            weigh,
            WeighMeasurement {
                tow_ball_weight: 150.0,
                caravan_weight: 1900.0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_not_an_object() {
        let err = normalize_vehicle(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, RecordError::NotAnObject { record: "vehicle" });
    }

    #[test]
    fn test_nested_not_an_object() {
        let err = normalize_caravan(&json!({ "caravan": "Jayco" })).unwrap_err();
        assert_eq!(err, RecordError::NotAnObject { record: "caravan" });
    }

    #[test]
    fn test_non_numeric_field() {
        let err = normalize_weigh(&json!({ "towBallWeight": "heavy" })).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidNumber {
                field: "towBallWeight".to_string(),
                value: "\"heavy\"".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_identity_is_not_an_error() {
        let vehicle = normalize_vehicle(&json!({})).unwrap();
        assert_eq!(vehicle, VehicleSpec::default());
    }
}
