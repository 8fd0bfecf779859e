//! Position sampler
//!
//! A recurring tick at display-refresh cadence. On every tick the driver
//! drains handle lifecycle events and copies the resource's current offset
//! into the session. This is the only mechanism that advances the position;
//! there is no parallel polling loop to drift against.

use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Recurring sampling tick
///
/// Wraps a [`tokio::time::Interval`]. Missed ticks are skipped rather than
/// bursted: after a stall the position catches up on the next tick anyway,
/// because each tick reads the resource's absolute offset.
pub(crate) struct PositionSampler {
    interval: Interval,
}

impl PositionSampler {
    /// Create a sampler ticking at the given period
    pub(crate) fn new(period: Duration) -> Self {
        let mut interval = interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    /// Wait for the next sampling tick
    pub(crate) async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_at_configured_period() {
        let mut sampler = PositionSampler::new(Duration::from_millis(16));
        let start = tokio::time::Instant::now();

        // First tick completes immediately
        sampler.tick().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        sampler.tick().await;
        sampler.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(32));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_clamped() {
        // A zero period would panic inside tokio; the sampler clamps it
        let mut sampler = PositionSampler::new(Duration::ZERO);
        sampler.tick().await;
        sampler.tick().await;
    }
}
