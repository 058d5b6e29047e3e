//! Builds: lookup, processing status and waiting for processing

mod client;
mod processing;

pub use client::{Build, BuildClient, BuildStatus, BuildUpdate};
pub use processing::{
    wait_for_processing, PollCallback, ProcessingOutcome, WaitForProcessingOptions,
    DEFAULT_INITIAL_DELAY, DEFAULT_MAX_TRIES, DEFAULT_POLL_INTERVAL,
};
