//! Waiting for build processing to finish

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::{ConnectError, Result};
use crate::types::BuildProcessingState;

/// Default time between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default number of polls before giving up
pub const DEFAULT_MAX_TRIES: u32 = 60;

/// Default delay before the first poll
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::ZERO;

/// Observer invoked after every poll with the state seen and the poll number
/// (starting at 1)
pub type PollCallback = Arc<dyn Fn(BuildProcessingState, u32) + Send + Sync>;

/// Options for [`wait_for_processing`]
#[derive(Clone)]
pub struct WaitForProcessingOptions {
    /// Time between polls
    pub poll_interval: Duration,

    /// Polls before giving up with a timeout
    pub max_tries: u32,

    /// Delay before the poll loop starts
    pub initial_delay: Duration,

    /// Called once per poll, before the result is evaluated
    pub on_poll: Option<PollCallback>,
}

impl Default for WaitForProcessingOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_tries: DEFAULT_MAX_TRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            on_poll: None,
        }
    }
}

impl WaitForProcessingOptions {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_on_poll<F>(mut self, callback: F) -> Self
    where
        F: Fn(BuildProcessingState, u32) + Send + Sync + 'static,
    {
        self.on_poll = Some(Arc::new(callback));
        self
    }
}

impl std::fmt::Debug for WaitForProcessingOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitForProcessingOptions")
            .field("poll_interval", &self.poll_interval)
            .field("max_tries", &self.max_tries)
            .field("initial_delay", &self.initial_delay)
            .field("on_poll", &self.on_poll.is_some())
            .finish()
    }
}

/// What a processing state means for the waiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// Not there yet, keep polling
    Pending,
    /// Processed successfully
    Succeeded,
    /// Processing failed
    Failed,
}

impl ProcessingOutcome {
    pub fn of(state: BuildProcessingState) -> Self {
        match state {
            BuildProcessingState::Unknown | BuildProcessingState::Processing => {
                ProcessingOutcome::Pending
            }
            BuildProcessingState::Valid => ProcessingOutcome::Succeeded,
            BuildProcessingState::Failed | BuildProcessingState::Invalid => {
                ProcessingOutcome::Failed
            }
        }
    }
}

/// Poll `fetch_state` until the build is valid, has failed, or `max_tries`
/// polls have passed.
///
/// The first status is checked immediately; a terminal state returns without
/// polling. Otherwise the loop sleeps `initial_delay`, then polls every
/// `poll_interval`. Errors from `fetch_state` end the wait.
pub async fn wait_for_processing<F, Fut>(
    mut fetch_state: F,
    options: &WaitForProcessingOptions,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<BuildProcessingState>>,
{
    let state = fetch_state().await?;
    match ProcessingOutcome::of(state) {
        ProcessingOutcome::Succeeded => return Ok(()),
        ProcessingOutcome::Failed => return Err(ConnectError::ProcessingFailed { state }),
        ProcessingOutcome::Pending => {}
    }

    if !options.initial_delay.is_zero() {
        tokio::time::sleep(options.initial_delay).await;
    }

    let mut tries = 0u32;
    loop {
        tokio::time::sleep(options.poll_interval).await;

        let state = fetch_state().await?;
        tries += 1;

        debug!(%state, tries, max_tries = options.max_tries, "Polled build processing state");

        if let Some(callback) = &options.on_poll {
            callback(state, tries);
        }

        match ProcessingOutcome::of(state) {
            ProcessingOutcome::Succeeded => return Ok(()),
            ProcessingOutcome::Failed => return Err(ConnectError::ProcessingFailed { state }),
            ProcessingOutcome::Pending if tries >= options.max_tries => {
                return Err(ConnectError::Timeout {
                    last_state: BuildProcessingState::Unknown,
                });
            }
            ProcessingOutcome::Pending => {}
        }
    }
}
