//! Geocode client: one provider lookup per record.
//!
//! [`Geocoder`] is the seam between the worker pool and the network. The
//! production implementation is [`HereGeocoder`]; tests substitute in-memory
//! geocoders with scripted latencies.
//!
//! [`resolve`] is what workers call. It short-circuits unaddressable queries
//! without touching the geocoder and emits one diagnostic per record for
//! every outcome.

mod here;

pub use here::{GeocodeResponse, HereGeocoder};

use crate::address::GeocodeQuery;
use crate::record::Coordinate;

/// Terminal state of a single record's lookup.
///
/// Every variant maps to a [`Coordinate`]; only `Found` carries values. None
/// of them is an error at the batch level.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The provider returned at least one candidate; holds the first one.
    Found(Coordinate),
    /// The provider answered but had no usable candidate.
    NotFound,
    /// Transport failure, timeout, non-2xx status or undecodable body.
    Failed { reason: String },
    /// The record had no address to look up; no request was made.
    Unaddressable,
}

impl LookupOutcome {
    pub const fn coordinate(&self) -> Coordinate {
        match self {
            Self::Found(coordinate) => *coordinate,
            Self::NotFound | Self::Failed { .. } | Self::Unaddressable => Coordinate::ABSENT,
        }
    }

    /// Short label used in logs and metric attributes.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotFound => "not_found",
            Self::Failed { .. } => "failed",
            Self::Unaddressable => "unaddressable",
        }
    }
}

/// A source of coordinates for free-text address queries.
///
/// Implementations must make at most one attempt per call and must fold every
/// failure into [`LookupOutcome`]. They are shared by all workers, so any
/// connection pool they hold is reused across lookups.
pub trait Geocoder: Send + Sync + 'static {
    fn lookup(&self, query: &str) -> impl Future<Output = LookupOutcome> + Send;
}

/// Runs `query` through `geocoder` and logs the outcome.
///
/// Unaddressable queries never reach the geocoder.
pub async fn resolve<G: Geocoder>(geocoder: &G, query: &GeocodeQuery) -> LookupOutcome {
    let Some(text) = query.as_str() else {
        tracing::debug!("Skipping record without an address");
        return LookupOutcome::Unaddressable;
    };

    let outcome = geocoder.lookup(text).await;
    match &outcome {
        LookupOutcome::Found(coordinate) => {
            tracing::info!("Geocoded: {text} -> {coordinate}");
        }
        LookupOutcome::NotFound => {
            tracing::warn!("Could not find coordinates for address: {text}");
        }
        LookupOutcome::Failed { reason } => {
            tracing::warn!("Error calling geocoding API for address '{text}': {reason}");
        }
        LookupOutcome::Unaddressable => {}
    }
    outcome
}
