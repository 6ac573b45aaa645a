//! Request pacing shared by every outbound call, plus bounded retry.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{interval, sleep, Interval, MissedTickBehavior};
use tracing::warn;

use crate::error::SourceError;

/// Attempts after the first one for a retryable failure.
const MAX_RETRIES: u32 = 3;

/// Spaces requests at least `period` apart, across all tasks holding it.
pub struct RateLimiter {
    ticker: Option<Mutex<Interval>>,
}

impl RateLimiter {
    pub fn new(period: Duration) -> Self {
        if period.is_zero() {
            return Self { ticker: None };
        }
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            ticker: Some(Mutex::new(ticker)),
        }
    }

    pub fn unlimited() -> Self {
        Self { ticker: None }
    }

    pub async fn acquire(&self) {
        if let Some(ticker) = &self.ticker {
            ticker.lock().await.tick().await;
        }
    }
}

/// Retries `operation` on transient failures, doubling `base_delay` each time.
pub async fn retry_with_backoff<F, Fut, T>(
    what: &str,
    base_delay: Duration,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || attempt >= MAX_RETRIES {
                    return Err(err);
                }
                let backoff = base_delay * 2u32.pow(attempt);
                warn!(
                    "{} failed (attempt {}): {}; retrying in {:?}",
                    what,
                    attempt + 1,
                    err,
                    backoff
                );
                sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}
