//! Bounded fan-out/fan-in of geocode lookups.
//!
//! - [`manager`] - [`WorkerPool`](manager::WorkerPool), which queues one
//!   request per record, runs a fixed number of workers and collects their
//!   results.
//! - [`worker`] - The worker loop.
//! - [`request`] - Messages exchanged between the pool and its workers.

pub mod manager;
pub mod request;
pub mod worker;

pub use manager::WorkerPool;
