use crate::address::GeocodeQuery;
use crate::geocode::LookupOutcome;

/// A unit of work queued for the pool: the query for the record at `index`
/// in the submitted batch.
#[derive(Debug)]
pub struct WorkRequest {
    pub index: usize,
    pub query: GeocodeQuery,
}

/// A worker's answer for one [`WorkRequest`], tagged with the same index so
/// the collector can place it regardless of completion order.
#[derive(Debug)]
pub struct WorkResult {
    pub index: usize,
    pub outcome: LookupOutcome,
}
