use crate::geocode::{Geocoder, resolve};
use crate::pool::request::{WorkRequest, WorkResult};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::Instrument;

/// Work queue shared by every worker in a pool.
pub type SharedQueue = Arc<Mutex<mpsc::UnboundedReceiver<WorkRequest>>>;

/// Worker task that drains [`WorkRequest`]s from the shared queue.
///
/// Each iteration takes the next request, resolves it through the shared
/// geocoder and sends exactly one [`WorkResult`] back to the collector. The
/// loop ends when the queue is closed and empty, or when the collector has
/// gone away.
///
/// # Arguments
///
/// - `worker_id`: Index of this worker, used in logs.
/// - `queue`: Receiver shared by all workers of the pool.
/// - `geocoder`: Shared geocoder (and with it, the shared HTTP client).
/// - `results`: Sender half of the collector channel.
pub async fn worker_loop<G: Geocoder>(
    worker_id: usize,
    queue: SharedQueue,
    geocoder: Arc<G>,
    results: mpsc::UnboundedSender<WorkResult>,
) {
    tracing::trace!("Worker {worker_id} started");

    loop {
        let next = queue.lock().await.recv().await;
        let Some(WorkRequest { index, query }) = next else {
            break;
        };

        let span = tracing::debug_span!("lookup", worker = worker_id, record = index);
        let outcome = resolve(geocoder.as_ref(), &query).instrument(span).await;

        if results.send(WorkResult { index, outcome }).is_err() {
            tracing::debug!("Worker {worker_id} exiting, collector closed");
            break;
        }
    }

    tracing::trace!("Worker {worker_id} stopped");
}
