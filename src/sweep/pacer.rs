//! Sequential request pacing
//!
//! A sweep only ever has one request in flight, so pacing reduces to keeping
//! a minimum interval between the starts of consecutive records.

use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Spaces record fetches to at most `rate_rps` per second
#[derive(Debug)]
pub struct Pacer {
    interval: Option<Duration>,
    last_start: Option<Instant>,
}

impl Pacer {
    /// `None`, zero, negative or non-finite rates disable pacing
    #[must_use]
    pub fn new(rate_rps: Option<f64>) -> Self {
        let interval = rate_rps
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .map(|rate| Duration::from_secs_f64(1.0 / rate));
        Self {
            interval,
            last_start: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Wait until the next record may start, then mark it started
    pub async fn wait_turn(&mut self) {
        if let (Some(interval), Some(last)) = (self.interval, self.last_start) {
            let next = last + interval;
            if next > Instant::now() {
                trace!("Pacing: sleeping {:?}", next - Instant::now());
                tokio::time::sleep_until(next).await;
            }
        }
        self.last_start = Some(Instant::now());
    }
}
