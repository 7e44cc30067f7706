#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::missing_errors_doc)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! In-process job queue and the worker pool that drains it.

mod queue;
mod worker;

pub use queue::{InProcessJobQueue, JobQueueError, JobReceiver};
pub use worker::{JobWorkerPool, WorkerReport};
