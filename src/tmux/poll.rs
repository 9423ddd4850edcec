//! Bounded polling: sample an external resource until a predicate holds.

use std::future::Future;
use tokio::time::{sleep, Duration, Instant};
use tracing::trace;

/// Interval and overall budget for one wait.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PollTiming {
    pub interval: Duration,
    pub timeout: Duration,
}

/// Sample, test, sleep `interval`, repeat.
///
/// Returns `Ok(Some(_))` with the first accepted value, or `Ok(None)` once
/// `timeout` has elapsed since `started` without a match. The deadline is
/// checked after each sample, so a miss returns no earlier than `timeout` and
/// no later than `timeout + interval` (plus one sample's latency). Sampling
/// errors abort the wait immediately.
pub async fn poll_until<S, Fut, V, E, P, T>(
    mut sample: S,
    mut accept: P,
    timing: PollTiming,
    started: Instant,
) -> Result<Option<T>, E>
where
    S: FnMut() -> Fut,
    Fut: Future<Output = Result<V, E>>,
    P: FnMut(&V) -> Option<T>,
{
    let mut attempt = 0u64;
    loop {
        attempt += 1;
        let value = sample().await?;
        if let Some(accepted) = accept(&value) {
            trace!(attempt, "poll predicate satisfied");
            return Ok(Some(accepted));
        }
        if started.elapsed() >= timing.timeout {
            trace!(attempt, "poll deadline reached");
            return Ok(None);
        }
        sleep(timing.interval).await;
    }
}
