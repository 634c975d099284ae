//! The lookup-and-aggregate pipeline: validate, resolve CEP, resolve
//! weather, derive Kelvin.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::Instrument;

use crate::{
    cep::CepClient,
    config::Config,
    error::LookupError,
    model::TemperatureResult,
    validate::is_valid_cep,
    weather::WeatherClient,
};

/// Build the outbound HTTP client both resolvers share.
///
/// TLS verification stays on unless the config explicitly opts out; the
/// opt-out is scoped to this client rather than a process-wide default.
pub fn build_http_client(cfg: &Config) -> Result<Client> {
    let mut builder = Client::builder().timeout(cfg.request_timeout());
    if cfg.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled for upstream calls");
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder.build().context("Failed to build HTTP client")
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    cep: CepClient,
    weather: WeatherClient,
}

impl Pipeline {
    pub fn new(cep: CepClient, weather: WeatherClient) -> Self {
        Self { cep, weather }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let http = build_http_client(cfg)?;
        Ok(Self::new(
            CepClient::new(http.clone(), cfg.cep_base_url.clone()),
            WeatherClient::new(
                http,
                cfg.weather_base_url.clone(),
                cfg.weather_api_key.clone(),
            ),
        ))
    }

    /// Run the full pipeline for one raw input.
    ///
    /// Strictly sequential: validation happens before any network call, the
    /// weather service is only consulted once the CEP resolved. Each
    /// upstream call runs inside its own span; `Instrument` closes the span
    /// on the error path too.
    pub async fn lookup_temperature(&self, raw: &str) -> Result<TemperatureResult, LookupError> {
        if !is_valid_cep(raw) {
            return Err(LookupError::InvalidZipcode);
        }

        let address = self
            .cep
            .resolve(raw)
            .instrument(tracing::info_span!("resolve cep", cep = %raw))
            .await?;

        let reading = self
            .weather
            .current(&address.localidade)
            .instrument(tracing::info_span!("fetch weather", city = %address.localidade))
            .await?;

        tracing::debug!(
            city = %address.localidade,
            temp_c = reading.temp_c,
            "lookup complete"
        );

        Ok(TemperatureResult::new(address.localidade, &reading))
    }
}
