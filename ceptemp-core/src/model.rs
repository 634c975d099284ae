//! Shared domain models: the resolved address, the normalized weather
//! reading and the response entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difference between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Address record returned by the postal-code service (ViaCEP).
///
/// Only `localidade` is consumed downstream; the rest is pass-through.
/// Fields other than `localidade` default to empty so that partial payloads
/// still resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub ibge: String,
    #[serde(default)]
    pub gia: String,
    #[serde(default)]
    pub ddd: String,
    #[serde(default)]
    pub siafi: String,
}

/// Normalized current-conditions snapshot from the weather service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location_name: String,
    pub region: String,
    pub country: String,
    pub observed_at: DateTime<Utc>,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: String,
    pub is_day: bool,
}

/// Response entity: temperatures in the three scales, plus the resolved
/// city when the deployment exposes it. Built once per request, immutable
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl TemperatureResult {
    /// Build the result from a weather reading; Kelvin is derived, the
    /// other two scales are taken as the upstream reported them.
    pub fn new(city: impl Into<String>, reading: &WeatherReading) -> Self {
        Self {
            city: Some(city.into()),
            temp_c: reading.temp_c,
            temp_f: reading.temp_f,
            temp_k: reading.temp_c + KELVIN_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temp_c: f64, temp_f: f64) -> WeatherReading {
        WeatherReading {
            location_name: "Francisco Beltrão".to_string(),
            region: "Parana".to_string(),
            country: "Brazil".to_string(),
            observed_at: Utc::now(),
            temp_c,
            temp_f,
            condition: "Sunny".to_string(),
            is_day: true,
        }
    }

    #[test]
    fn kelvin_is_celsius_plus_offset() {
        let result = TemperatureResult::new("Francisco Beltrão", &reading(20.0, 68.0));
        assert_eq!(result.temp_c, 20.0);
        assert_eq!(result.temp_f, 68.0);
        assert!((result.temp_k - 293.15).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_celsius_still_derives_kelvin() {
        let result = TemperatureResult::new("x", &reading(-273.15, -459.67));
        assert!(result.temp_k.abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_renamed_keys() {
        let result = TemperatureResult::new("Francisco Beltrão", &reading(20.0, 68.0));
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["city"], "Francisco Beltrão");
        assert_eq!(json["temp_C"], 20.0);
        assert_eq!(json["temp_F"], 68.0);
        assert_eq!(json["temp_K"], 293.15);
    }

    #[test]
    fn city_is_omitted_when_absent() {
        let mut result = TemperatureResult::new("x", &reading(1.0, 33.8));
        result.city = None;
        let json = serde_json::to_value(&result).expect("serialize");
        assert!(json.get("city").is_none());
    }

    #[test]
    fn address_tolerates_missing_optional_fields() {
        let address: Address =
            serde_json::from_str(r#"{"localidade": "Campo Grande"}"#).expect("parse");
        assert_eq!(address.localidade, "Campo Grande");
        assert_eq!(address.uf, "");
    }
}
