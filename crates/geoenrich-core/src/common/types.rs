//! # Pipeline Defaults and Configuration
//!
//! Constants and the [`GeocodeConfig`] struct shared by the geocode client and
//! the worker pool. The binary crate builds a [`GeocodeConfig`] from CLI
//! arguments; library users can start from [`GeocodeConfig::default`].
//!
//! ## Constants
//!
//! - [`DEFAULT_NUM_WORKERS`] - Upper bound on concurrent lookups
//! - [`DEFAULT_REQUEST_TIMEOUT`] - Per-request timeout
//! - [`DEFAULT_PROVIDER_URL`] - HERE Geocoding v1 endpoint
//! - [`QUERY_SEPARATOR`] - Joins the address and locality into one query
//! - [`LATITUDE_FIELD`] / [`LONGITUDE_FIELD`] - Appended output columns

use crate::common::error::{Error, Result};
use core::time::Duration;

/// Number of lookups allowed in flight at once.
pub const DEFAULT_NUM_WORKERS: usize = 30;

/// Timeout applied to every individual provider request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Geocoding endpoint queried with `q` and `apiKey` parameters.
pub const DEFAULT_PROVIDER_URL: &str = "https://geocode.search.hereapi.com/v1/geocode";

/// Separator placed between the address line and the locality.
pub const QUERY_SEPARATOR: &str = ", ";

/// Header of the appended latitude column.
pub const LATITUDE_FIELD: &str = "Latitude";

/// Header of the appended longitude column.
pub const LONGITUDE_FIELD: &str = "Longitude";

/// Tunables for the geocode client and the worker pool.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Maximum number of concurrent lookups.
    pub num_workers: usize,
    /// Timeout for a single provider request.
    pub request_timeout: Duration,
    /// Provider endpoint.
    pub provider_url: String,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            num_workers: DEFAULT_NUM_WORKERS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
        }
    }
}

impl GeocodeConfig {
    /// Rejects values the pool or the client cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the worker count or the timeout is
    /// zero, or if the provider URL is empty.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "number of workers must be greater than 0".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(Error::InvalidConfig {
                reason: "request timeout must be greater than 0".to_string(),
            });
        }
        if self.provider_url.trim().is_empty() {
            return Err(Error::InvalidConfig {
                reason: "provider URL must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
