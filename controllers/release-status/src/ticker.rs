//! Tick sources for the reconcile loop.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Something the reconcile loop can wait on between sweeps.
#[async_trait::async_trait]
pub trait Ticker: Send {
    /// Completes when the next sweep is due.
    async fn tick(&mut self);
}

/// Wall-clock ticker with a fixed period.
///
/// The first tick fires one period after construction. Ticks missed while a
/// sweep is running are dropped rather than delivered in a burst.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Creates a ticker firing every `period`.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait::async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
