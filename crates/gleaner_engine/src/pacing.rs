//! Randomized jitter between page interactions. Tunable, never load-bearing.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use gleaner_core::DelayRange;

/// A duration drawn uniformly from `range`.
pub fn jitter(range: &DelayRange) -> Duration {
    let (lo, hi) = range.bounds_ms();
    if hi == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
}

/// Sleep for a random duration drawn from `range`; no-op for a zero range.
pub async fn settle(range: &DelayRange) {
    let delay = jitter(range);
    pause(delay).await;
}

pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Pick one identity string from the pool, if the pool is non-empty.
pub fn pick<'a>(pool: &'a [String]) -> Option<&'a str> {
    pool.choose(&mut rand::thread_rng()).map(String::as_str)
}
