use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};

/// Process-wide configuration, read-only after startup.
///
/// Loaded from an optional TOML file, then overridden by `CEPTEMP_*`
/// environment variables. Example TOML:
///
/// ```toml
/// listen_addr = "0.0.0.0:8080"
/// weather_api_key = "..."
/// otlp_endpoint = "http://otel-collector:4317"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,

    /// Base URL of the postal-code service.
    pub cep_base_url: String,

    /// Base URL of the weather service.
    pub weather_base_url: String,

    /// API key for the weather service.
    pub weather_api_key: String,

    /// Per-call timeout for outbound requests, in seconds.
    pub request_timeout_secs: u64,

    /// Disable TLS verification toward upstreams. Off by default; the
    /// legacy deployment needed it for the postal-code service.
    pub accept_invalid_certs: bool,

    /// Include the resolved city in the response body (split deployment).
    pub include_city: bool,

    /// Base URL of the resolver service the gateway forwards to.
    pub resolver_url: Option<String>,

    /// OTLP gRPC collector endpoint. Tracing export is disabled when unset.
    pub otlp_endpoint: Option<String>,

    /// Service name reported to the trace collector.
    pub service_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            cep_base_url: "https://viacep.com.br".to_string(),
            weather_base_url: "http://api.weatherapi.com".to_string(),
            weather_api_key: String::new(),
            request_timeout_secs: 10,
            accept_invalid_certs: false,
            include_city: false,
            resolver_url: None,
            otlp_endpoint: None,
            service_name: "ceptemp".to_string(),
        }
    }
}

impl Config {
    /// Load config from `path` if given (the file must then exist), fall
    /// back to defaults otherwise, and apply environment overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    /// Outbound request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = env::var("CEPTEMP_LISTEN_ADDR") {
            self.listen_addr = v;
        }
        if let Ok(v) = env::var("CEPTEMP_CEP_BASE_URL") {
            self.cep_base_url = v;
        }
        if let Ok(v) = env::var("CEPTEMP_WEATHER_BASE_URL") {
            self.weather_base_url = v;
        }
        if let Ok(v) = env::var("CEPTEMP_WEATHER_API_KEY") {
            self.weather_api_key = v;
        }
        if let Ok(v) = env::var("CEPTEMP_REQUEST_TIMEOUT_SECS")
            && let Ok(secs) = v.parse()
        {
            self.request_timeout_secs = secs;
        }
        if let Ok(v) = env::var("CEPTEMP_ACCEPT_INVALID_CERTS") {
            self.accept_invalid_certs = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Ok(v) = env::var("CEPTEMP_INCLUDE_CITY") {
            self.include_city = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Ok(v) = env::var("CEPTEMP_RESOLVER_URL") {
            self.resolver_url = Some(v);
        }
        if let Ok(v) = env::var("CEPTEMP_OTLP_ENDPOINT") {
            self.otlp_endpoint = Some(v);
        }
        if let Ok(v) = env::var("CEPTEMP_SERVICE_NAME") {
            self.service_name = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_upstreams() {
        let cfg = Config::default();
        assert_eq!(cfg.cep_base_url, "https://viacep.com.br");
        assert_eq!(cfg.weather_base_url, "http://api.weatherapi.com");
        assert!(!cfg.accept_invalid_certs);
        assert!(!cfg.include_city);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let cfg: Config = toml::from_str(
            r#"
            listen_addr = "127.0.0.1:9090"
            weather_api_key = "KEY"
            include_city = true
            "#,
        )
        .expect("parse config");

        assert_eq!(cfg.listen_addr, "127.0.0.1:9090");
        assert_eq!(cfg.weather_api_key, "KEY");
        assert!(cfg.include_city);
        assert_eq!(cfg.cep_base_url, "https://viacep.com.br");
        assert!(cfg.otlp_endpoint.is_none());
    }

    #[test]
    fn load_errors_on_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/ceptemp.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
