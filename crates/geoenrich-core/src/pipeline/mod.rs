//! End-to-end run: read, fan out lookups, assemble, write.

#[cfg(test)]
mod tests;

use crate::assemble::{ResultSet, assemble};
use crate::common::{error::Result, types::GeocodeConfig};
use crate::csv_io::{AtomicCsvWriter, RecordBatch, read_records};
use crate::geocode::{Geocoder, HereGeocoder, LookupOutcome};
use crate::pool::WorkerPool;
use crate::record::FieldNames;
use core::time::Duration;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Outcome counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
    pub unaddressable: usize,
    /// Identifier values that were not numeric and sorted as `0`.
    pub coerced_sort_keys: usize,
    pub elapsed: Duration,
    /// Destination path, once the output has been persisted.
    pub output: Option<PathBuf>,
}

impl RunSummary {
    fn tally(&mut self, outcome: &LookupOutcome) {
        self.records += 1;
        match outcome {
            LookupOutcome::Found(_) => self.found += 1,
            LookupOutcome::NotFound => self.not_found += 1,
            LookupOutcome::Failed { .. } => self.failed += 1,
            LookupOutcome::Unaddressable => self.unaddressable += 1,
        }
    }
}

/// A configured geocoding run.
pub struct Pipeline<G> {
    pool: WorkerPool<G>,
    fields: FieldNames,
}

impl Pipeline<HereGeocoder> {
    /// Pipeline backed by the HERE API.
    ///
    /// # Errors
    ///
    /// Fails if the credential is blank, `config` is invalid, or the HTTP
    /// client cannot be built. No request is made.
    pub fn here(config: &GeocodeConfig, api_key: SecretString, fields: FieldNames) -> Result<Self> {
        let geocoder = HereGeocoder::new(config, api_key)?;
        Ok(Self::new(Arc::new(geocoder), config.num_workers, fields))
    }
}

impl<G: Geocoder> Pipeline<G> {
    pub fn new(geocoder: Arc<G>, num_workers: usize, fields: FieldNames) -> Self {
        Self {
            pool: WorkerPool::new(geocoder, num_workers),
            fields,
        }
    }

    pub const fn fields(&self) -> &FieldNames {
        &self.fields
    }

    pub const fn pool(&self) -> &WorkerPool<G> {
        &self.pool
    }

    /// Geocodes every record of `batch` and returns the sorted result set.
    pub async fn enrich(&self, batch: RecordBatch) -> (ResultSet, RunSummary) {
        let RecordBatch { header, records } = batch;
        let pairs = self.pool.dispatch(records, &self.fields).await;

        let mut summary = RunSummary::default();
        for (_, outcome) in &pairs {
            summary.tally(outcome);
        }

        let results = assemble(&header, pairs, &self.fields);
        summary.coerced_sort_keys = results.coerced_sort_keys();
        (results, summary)
    }

    /// Reads `input`, geocodes it and writes the enriched CSV to `output`.
    ///
    /// The output is staged before any lookup is made, so an unwritable
    /// destination fails fast, and it is only persisted once every record has
    /// been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is missing or malformed, or if the output
    /// cannot be written. Lookup failures are never errors.
    #[tracing::instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub async fn run_file(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        let start = Instant::now();

        let batch = read_records(input)?;
        let mut writer = AtomicCsvWriter::create(output)?;
        if batch.records.is_empty() {
            tracing::info!("Input file is empty, writing header only");
        }

        let (results, mut summary) = self.enrich(batch).await;
        writer.write_results(&results)?;
        summary.output = Some(writer.finish()?);
        summary.elapsed = start.elapsed();

        Ok(summary)
    }
}
