//! Fixed-budget retry policy for single page requests.
//!
//! ```text
//! Attempting{n} --ok--> Succeeded{n}
//! Attempting{n} --err, n < max--> Backoff{n} --wait--> Attempting{n+1}
//! Attempting{n} --err, n == max--> Exhausted{n}
//! ```
//! No exponential growth, no jitter. The last failure does not wait.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff:      Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting { attempt: u32 },
    Backoff { attempt: u32 },
    Succeeded { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl RetryState {
    pub fn start() -> Self {
        RetryState::Attempting { attempt: 1 }
    }

    pub fn on_success(self) -> Self {
        match self {
            RetryState::Attempting { attempt } => RetryState::Succeeded { attempts: attempt },
            other => other,
        }
    }

    pub fn on_failure(self, policy: &RetryPolicy) -> Self {
        match self {
            RetryState::Attempting { attempt } if attempt >= policy.max_attempts => {
                RetryState::Exhausted { attempts: attempt }
            }
            RetryState::Attempting { attempt } => RetryState::Backoff { attempt },
            other => other,
        }
    }

    pub fn on_backoff_elapsed(self) -> Self {
        match self {
            RetryState::Backoff { attempt } => RetryState::Attempting { attempt: attempt + 1 },
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Succeeded { .. } | RetryState::Exhausted { .. })
    }

    /// Attempts made so far, counting the one in flight.
    pub fn attempts(&self) -> u32 {
        match *self {
            RetryState::Attempting { attempt } | RetryState::Backoff { attempt } => attempt,
            RetryState::Succeeded { attempts } | RetryState::Exhausted { attempts } => attempts,
        }
    }
}
