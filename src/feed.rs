use crate::clock::Clock;
use crate::error::FeedError;
use crate::render::RenderTarget;
use crate::source::SampleSource;
use crate::window::{Recorded, SlidingWindowSeriesBuffer};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub struct FeedConfig {
    pub interval: Duration,
}

impl FeedConfig {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

/// Counters reported when the loop exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub ticks: u64,
    pub stored: u64,
    pub throttled: u64,
    pub rejected: u64,
}

/// Simulated activity feed: draws a value every tick, records it, and pushes
/// the visible window to the render target.
///
/// The feed owns the buffer, the source and the target; nothing else touches
/// them while it runs.
pub struct Feed<C, S, T> {
    config: FeedConfig,
    buffer: SlidingWindowSeriesBuffer<C>,
    source: S,
    target: T,
}

impl<C, S, T> Feed<C, S, T>
where
    C: Clock,
    S: SampleSource,
    T: RenderTarget,
{
    pub fn new(
        buffer: SlidingWindowSeriesBuffer<C>,
        source: S,
        target: T,
        config: FeedConfig,
    ) -> Self {
        Self {
            config,
            buffer,
            source,
            target,
        }
    }

    /// Runs until `cancel` fires (`Ok`) or the render target fails (`Err`).
    pub async fn run(mut self, cancel: CancellationToken) -> Result<FeedSummary, FeedError> {
        info!("Feed started with interval {:?}", self.config.interval);

        let mut summary = FeedSummary::default();
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            // interval() ticks immediately on the first await, so the chart fills in at once.
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    break;
                }
                _ = ticker.tick() => {}
            }

            summary.ticks += 1;
            if let Err(e) = self.tick(&mut summary) {
                error!("Render target failed, stopping feed: {}", e);
                return Err(FeedError::LoopFailure(e));
            }
        }

        info!(
            ticks = summary.ticks,
            stored = summary.stored,
            throttled = summary.throttled,
            rejected = summary.rejected,
            "Feed stopped"
        );
        Ok(summary)
    }

    fn tick(&mut self, summary: &mut FeedSummary) -> std::io::Result<()> {
        let value = self.source.next_value();
        match self.buffer.record(value) {
            Ok(Recorded::Stored(sample)) => {
                summary.stored += 1;
                debug!(t = sample.timestamp, value = sample.value, "sample stored");
            }
            Ok(Recorded::Throttled) => summary.throttled += 1,
            Err(e) => {
                summary.rejected += 1;
                warn!("Dropping sample: {}", e);
            }
        }

        let frame = self.buffer.frame();
        self.target.set_x_range(frame.range)?;
        self.target.set_points(&frame.points)?;
        self.target.update()
    }
}
