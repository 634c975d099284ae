//! Core library for the CEP temperature services.
//!
//! This crate defines:
//! - Input validation and the error taxonomy
//! - The postal-code and weather resolvers
//! - The aggregation pipeline
//! - Configuration and telemetry (tracing + trace propagation)
//!
//! It is used by `ceptemp-server` and `ceptemp-gateway`.

pub mod cep;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod telemetry;
pub mod validate;
pub mod weather;

pub use cep::CepClient;
pub use config::Config;
pub use error::LookupError;
pub use model::{Address, TemperatureResult, WeatherReading};
pub use pipeline::Pipeline;
pub use validate::is_valid_cep;
pub use weather::WeatherClient;
