//! Weather resolver backed by WeatherAPI.com's current-conditions endpoint.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{LookupError, truncate_body},
    model::WeatherReading,
};

const SERVICE: &str = "weatherapi";

#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch current conditions for a city name. The city goes out as a
    /// URL-escaped query parameter.
    pub async fn current(&self, city: &str) -> Result<WeatherReading, LookupError> {
        let url = format!("{}/v1/current.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| LookupError::transport(SERVICE, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| LookupError::transport(SERVICE, e))?;

        if !status.is_success() {
            return Err(LookupError::unexpected(
                SERVICE,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        parse_reading(&body)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    localtime_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
    #[serde(default)]
    is_day: i64,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

fn parse_reading(body: &str) -> Result<WeatherReading, LookupError> {
    let parsed: WaResponse = serde_json::from_str(body).map_err(|e| {
        LookupError::unexpected(SERVICE, format!("{}: {}", e, truncate_body(body)))
    })?;

    let ts = parsed
        .current
        .last_updated_epoch
        .or(parsed.location.localtime_epoch);
    let observed_at = ts.and_then(unix_to_utc).unwrap_or_else(Utc::now);

    Ok(WeatherReading {
        location_name: parsed.location.name,
        region: parsed.location.region,
        country: parsed.location.country,
        observed_at,
        temp_c: parsed.current.temp_c,
        temp_f: parsed.current.temp_f,
        condition: parsed.current.condition.text,
        is_day: parsed.current.is_day != 0,
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
