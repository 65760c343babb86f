//! ViaCEP API client for postal-code address lookups.
//!
//! One-shot, read-only lookups keyed by an 8-digit CEP. The quote feature
//! is advisory, so there are no retries, no caching of prior lookups, and
//! no timeout beyond the transport default.

use serde::Deserialize;
use tracing::instrument;

use crate::config::ViaCepConfig;
use crate::shipping::Cep;

/// Errors that can occur when looking up a CEP.
#[derive(Debug, thiserror::Error)]
pub enum ViaCepError {
    /// HTTP request or response decoding failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: status {0}")]
    Api(u16),

    /// The service resolved the request but the CEP maps to no address.
    #[error("CEP {0} does not resolve to an address")]
    NotFound(String),
}

/// A resolved address, as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endereco {
    pub logradouro: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
}

/// Raw lookup payload. The service answers HTTP 200 with an `erro` marker
/// for well-formed but non-existent CEPs.
#[derive(Debug, Deserialize)]
struct LookupPayload {
    #[serde(default, deserialize_with = "erro_marker")]
    erro: bool,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

/// The service has answered with both `"erro": true` and `"erro": "true"`
/// over the years; accept either.
fn erro_marker<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Marker {
        Flag(bool),
        Text(String),
    }

    Ok(match Option::<Marker>::deserialize(deserializer)? {
        Some(Marker::Flag(flag)) => flag,
        Some(Marker::Text(text)) => text == "true",
        None => false,
    })
}

/// Client for the ViaCEP address lookup service.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// Create a new lookup client.
    #[must_use]
    pub fn new(config: &ViaCepConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    /// Resolve a CEP to an address.
    ///
    /// # Errors
    ///
    /// - `ViaCepError::NotFound` when the service reports the CEP resolves
    ///   to no address,
    /// - `ViaCepError::Api` on a non-success status,
    /// - `ViaCepError::Http` on transport or decoding failure.
    #[instrument(skip(self), fields(cep = %cep.digits()))]
    pub async fn lookup(&self, cep: &Cep) -> Result<Endereco, ViaCepError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep.digits());

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViaCepError::Api(status.as_u16()));
        }

        let payload: LookupPayload = response.json().await?;
        if payload.erro {
            return Err(ViaCepError::NotFound(cep.digits().to_string()));
        }

        Ok(Endereco {
            logradouro: payload.logradouro,
            bairro: payload.bairro,
            localidade: payload.localidade,
            uf: payload.uf,
        })
    }
}
