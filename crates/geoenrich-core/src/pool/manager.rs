//! Asynchronous worker pool for geocode lookups.
//!
//! This module defines the [`WorkerPool`] struct, which runs one lookup per
//! input record with at most `num_workers` lookups in flight. Every request is
//! queued up front on an unbounded channel; workers pull from that shared
//! queue as they free up, so a slow lookup only occupies its own worker.
//!
//! Results flow back over a single collector channel, one message per record,
//! and land in a slot indexed by the record's position. Completion order is
//! therefore irrelevant to how results are associated with records.
//!
//! There is no early abort: a failed lookup is just another outcome, and
//! [`WorkerPool::dispatch`] returns only after every record has one.

use crate::address::format_query;
use crate::geocode::{Geocoder, LookupOutcome};
use crate::pool::{
    request::{WorkRequest, WorkResult},
    worker::worker_loop,
};
use crate::record::{FieldNames, InputRecord};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// A fixed-size pool of lookup workers sharing one [`Geocoder`].
pub struct WorkerPool<G> {
    geocoder: Arc<G>,
    num_workers: usize,
}

impl<G: Geocoder> WorkerPool<G> {
    /// Creates a pool that runs at most `num_workers` lookups at once.
    ///
    /// A worker count of zero is treated as one.
    pub fn new(geocoder: Arc<G>, num_workers: usize) -> Self {
        Self {
            geocoder,
            num_workers: num_workers.max(1),
        }
    }

    pub const fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Looks up every record and returns each one paired with its outcome,
    /// in submission order.
    ///
    /// - Spawns `min(num_workers, records.len())` workers.
    /// - Suspends until every record has reached a terminal outcome.
    /// - An empty batch returns immediately without spawning anything.
    ///
    /// If a worker task dies mid-lookup, the affected record is reported as
    /// [`LookupOutcome::Failed`], so the output length always equals the input
    /// length.
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub async fn dispatch(
        &self,
        records: Vec<InputRecord>,
        fields: &FieldNames,
    ) -> Vec<(InputRecord, LookupOutcome)> {
        let total = records.len();
        if total == 0 {
            return Vec::new();
        }

        let (work_tx, work_rx) = mpsc::unbounded_channel();
        for (index, record) in records.iter().enumerate() {
            let query = format_query(record, fields);
            // The receiver is held locally, so this cannot fail.
            let _ = work_tx.send(WorkRequest { index, query });
        }
        // Closing the sender lets workers exit once the queue drains.
        drop(work_tx);

        let queue = Arc::new(Mutex::new(work_rx));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<WorkResult>();
        let num_workers = self.num_workers.min(total);

        tracing::info!("Submitting {total} addresses for geocoding with {num_workers} workers...");

        let handles: Vec<_> = (0..num_workers)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    Arc::clone(&queue),
                    Arc::clone(&self.geocoder),
                    result_tx.clone(),
                ))
            })
            .collect();
        drop(result_tx);

        let mut slots: Vec<Option<LookupOutcome>> = vec![None; total];
        while let Some(WorkResult { index, outcome }) = result_rx.recv().await {
            slots[index] = Some(outcome);
        }

        for (worker_id, joined) in futures::future::join_all(handles)
            .await
            .into_iter()
            .enumerate()
        {
            if let Err(e) = joined {
                tracing::error!("Worker {worker_id} terminated abnormally: {e}");
            }
        }

        records
            .into_iter()
            .zip(slots)
            .map(|(record, slot)| {
                let outcome = slot.unwrap_or_else(|| LookupOutcome::Failed {
                    reason: "worker terminated before completing the lookup".to_string(),
                });
                (record, outcome)
            })
            .collect()
    }
}
