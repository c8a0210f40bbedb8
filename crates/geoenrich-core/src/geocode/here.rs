//! HTTP geocoder for the HERE Geocoding & Search v1 API.
//!
//! One [`reqwest::Client`] is built per run and shared by every worker, so
//! lookups against the same host reuse pooled connections. The API key is
//! held as a [`SecretString`] and request URLs are stripped from error
//! messages, which keeps the key out of the logs.

use super::{Geocoder, LookupOutcome};
use crate::common::{
    error::{Error, Result},
    types::GeocodeConfig,
};
use crate::record::Coordinate;
use core::time::Duration;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::error::Error as _;

const CLIENT_USER_AGENT: &str = concat!("geoenrich/", env!("CARGO_PKG_VERSION"));

/// Body of a successful geocode response. Only the fields we read are
/// modelled; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    items: Option<Vec<GeocodeItem>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeItem {
    #[serde(default)]
    position: Option<Position>,
}

#[derive(Debug, Deserialize)]
struct Position {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

impl GeocodeResponse {
    /// Coordinate of the first candidate, if it has a position.
    ///
    /// Later candidates are never consulted.
    pub fn first_coordinate(&self) -> Option<Coordinate> {
        let position = self.items.as_deref()?.first()?.position.as_ref()?;
        let coordinate = Coordinate {
            latitude: position.lat,
            longitude: position.lng,
        };
        (!coordinate.is_absent()).then_some(coordinate)
    }

    pub fn into_outcome(self) -> LookupOutcome {
        self.first_coordinate()
            .map_or(LookupOutcome::NotFound, LookupOutcome::Found)
    }
}

/// Geocoder backed by the HERE REST API.
pub struct HereGeocoder {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl core::fmt::Debug for HereGeocoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HereGeocoder")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HereGeocoder {
    /// Builds the shared HTTP client.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredential`] if `api_key` is blank.
    /// - [`Error::InvalidConfig`] if `config` fails validation.
    /// - [`Error::HttpClient`] if the client cannot be initialised.
    pub fn new(config: &GeocodeConfig, api_key: SecretString) -> Result<Self> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(Error::MissingCredential);
        }
        config.validate()?;

        Ok(Self {
            http: build_http_client(config.request_timeout)?,
            endpoint: config.provider_url.clone(),
            api_key,
        })
    }

    async fn fetch(&self, query: &str) -> reqwest::Result<GeocodeResponse> {
        self.http
            .get(&self.endpoint)
            .query(&[("q", query), ("apiKey", self.api_key.expose_secret())])
            .send()
            .await?
            .error_for_status()?
            .json::<GeocodeResponse>()
            .await
    }
}

impl Geocoder for HereGeocoder {
    async fn lookup(&self, query: &str) -> LookupOutcome {
        match self.fetch(query).await {
            Ok(response) => response.into_outcome(),
            Err(e) => LookupOutcome::Failed {
                reason: describe(e),
            },
        }
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(Error::HttpClient)
}

/// Flattens a request error and its causes into one line, without the URL.
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
