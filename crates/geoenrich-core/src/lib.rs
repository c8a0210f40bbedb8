//! # `geoenrich-core`: concurrent address geocoding
//!
//! Enriches CSV address records with latitude/longitude by querying a
//! geocoding provider with bounded parallelism. One lookup is made per record,
//! failures are absorbed per record, and the output order is a pure function
//! of two identifier columns.
//!
//! ## Module Overview
//!
//! - [`address`] - Builds the query string for a record.
//! - [`geocode`] - The [`Geocoder`](geocode::Geocoder) seam and the HERE
//!   implementation.
//! - [`pool`] - Bounded worker pool that fans lookups out and collects them.
//! - [`assemble`] - Merges coordinates into records and sorts them.
//! - [`csv_io`] - CSV reading and atomic CSV writing.
//! - [`pipeline`] - Ties the above together for a file-to-file run.
//!
//! ## Example
//!
//! ```no_run
//! use geoenrich_core::{FieldNames, GeocodeConfig, Pipeline};
//! use secrecy::SecretString;
//! use std::path::Path;
//!
//! # async fn run() -> geoenrich_core::Result<()> {
//! let config = GeocodeConfig::default();
//! let key = SecretString::from(std::env::var("HERE_API_KEY").unwrap_or_default());
//! let pipeline = Pipeline::here(&config, key, FieldNames::default())?;
//! let summary = pipeline
//!     .run_file(Path::new("apcc_list.csv"), Path::new("apcc_list_geocoded.csv"))
//!     .await?;
//! println!("{} records", summary.records);
//! # Ok(())
//! # }
//! ```

mod common;

pub mod address;
pub mod assemble;
pub mod csv_io;
pub mod geocode;
pub mod pipeline;
pub mod pool;
pub mod record;

#[cfg(test)]
pub(crate) mod test_support;

pub use common::*;
pub use common::types::GeocodeConfig;
pub use pipeline::{Pipeline, RunSummary};
pub use record::{Coordinate, FieldNames};
