//! Postal-code resolver backed by the ViaCEP JSON API.

use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{LookupError, truncate_body},
    model::Address,
};

const SERVICE: &str = "viacep";

/// ViaCEP signals "unknown CEP" inconsistently: sometimes `{"erro": true}`,
/// sometimes `{"erro": "true"}`. Both probes are tried against the same
/// body before the success shape is attempted. A success payload has no
/// `erro` field at all, so both probes fall through on it.
#[derive(Debug, Deserialize)]
struct ErroFlag {
    #[serde(default)]
    erro: bool,
}

#[derive(Debug, Deserialize)]
struct ErroText {
    #[serde(default)]
    erro: String,
}

#[derive(Debug, Clone)]
pub struct CepClient {
    http: Client,
    base_url: String,
}

impl CepClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Resolve a CEP to an address record.
    ///
    /// The caller is expected to have validated the format already; an
    /// unknown-but-well-formed CEP comes back as
    /// [`LookupError::ZipcodeNotFound`].
    pub async fn resolve(&self, cep: &str) -> Result<Address, LookupError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep);

        let res = self
            .http
            .get(&url)
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

        classify_body(&body)
    }
}

/// Decide what a 2xx ViaCEP body means: not-found, address, or garbage.
fn classify_body(body: &str) -> Result<Address, LookupError> {
    if let Ok(flag) = serde_json::from_str::<ErroFlag>(body)
        && flag.erro
    {
        return Err(LookupError::ZipcodeNotFound);
    }

    if let Ok(text) = serde_json::from_str::<ErroText>(body)
        && !text.erro.is_empty()
    {
        return Err(LookupError::ZipcodeNotFound);
    }

    serde_json::from_str::<Address>(body).map_err(|e| {
        LookupError::unexpected(SERVICE, format!("{}: {}", e, truncate_body(body)))
    })
}
