//! Politeness throttle for the single outbound request stream
//!
//! The delay is measured from the moment the previous request finished,
//! not from when it started, and applies to every request regardless of host.

use std::time::{Duration, Instant};

/// Enforces a minimum pause between consecutive requests
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
    last_finished: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_finished: None,
        }
    }

    /// Time left before the next request may start, if any
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_finished?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= self.delay {
            None
        } else {
            Some(self.delay - elapsed)
        }
    }

    /// Sleeps until the politeness delay since the last request has passed
    pub async fn wait(&self) {
        if let Some(wait) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Politeness delay: sleeping {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Records that a request just finished, successfully or not
    pub fn mark_finished(&mut self) {
        self.last_finished = Some(Instant::now());
    }
}
