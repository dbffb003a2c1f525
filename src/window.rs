use crate::clock::{Clock, MonotonicClock};
use crate::error::{ConfigError, SampleError};
use crate::sample::{ChartFrame, Point, Sample, XRange};
use crate::storage::SampleHistory;
use tracing::trace;

pub const DEFAULT_MAX_POINTS: usize = 50;
pub const DEFAULT_WINDOW_WIDTH: f64 = 10.0;
pub const DEFAULT_POINTS_PER_WINDOW: usize = 50;

/// Slack on the throttle comparison so a gap of exactly one spacing is kept
/// despite subtraction rounding.
const SPACING_EPSILON: f64 = 1e-9;

/// Whether samples arriving closer together than
/// `window_width / points_per_window` are dropped at record time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrottleMode {
    #[default]
    Off,
    MinSpacing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BufferConfig {
    /// Hard cap on stored samples.
    pub max_points: usize,
    /// Width of the visible time range, in seconds.
    pub window_width: f64,
    /// Density cap for rendered (and, when throttling, stored) points.
    pub points_per_window: usize,
    pub throttle: ThrottleMode,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            window_width: DEFAULT_WINDOW_WIDTH,
            points_per_window: DEFAULT_POINTS_PER_WINDOW,
            throttle: ThrottleMode::Off,
        }
    }
}

impl BufferConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_points == 0 {
            return Err(ConfigError::invalid("max_points", "must be greater than 0"));
        }
        if !self.window_width.is_finite() || self.window_width <= 0.0 {
            return Err(ConfigError::invalid(
                "window_width",
                format!("must be a positive number of seconds, got {}", self.window_width),
            ));
        }
        if self.points_per_window == 0 {
            return Err(ConfigError::invalid(
                "points_per_window",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Minimum gap between stored samples when throttling.
    pub fn min_spacing(&self) -> f64 {
        self.window_width / self.points_per_window as f64
    }
}

/// Outcome of an accepted `record` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Recorded {
    Stored(Sample),
    /// Dropped to cap point density; history is unchanged.
    Throttled,
}

/// Bounded, time-ordered sample history plus the policy that decides which
/// part of it is on screen.
///
/// The visible x-range stays at `[0, window_width]` until that much time has
/// passed, then slides along with the clock. Points inside the range are
/// thinned to at most `points_per_window` by uniform stride.
#[derive(Debug)]
pub struct SlidingWindowSeriesBuffer<C = MonotonicClock> {
    config: BufferConfig,
    clock: C,
    history: SampleHistory,
}

impl SlidingWindowSeriesBuffer<MonotonicClock> {
    pub fn new(config: BufferConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> SlidingWindowSeriesBuffer<C> {
    pub fn with_clock(config: BufferConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let history = SampleHistory::new(config.max_points);
        Ok(Self {
            config,
            clock,
            history,
        })
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn record(&mut self, value: f64) -> Result<Recorded, SampleError> {
        let now = self.clock.elapsed();
        self.record_at(now, value)
    }

    /// Records `value` as observed `timestamp` seconds after start.
    pub fn record_at(&mut self, timestamp: f64, value: f64) -> Result<Recorded, SampleError> {
        if !value.is_finite() {
            return Err(SampleError::InvalidSample { value });
        }
        if !timestamp.is_finite() {
            return Err(SampleError::InvalidTimestamp { timestamp });
        }
        if let Some(last) = self.history.latest() {
            if timestamp < last.timestamp {
                return Err(SampleError::OutOfOrder {
                    timestamp,
                    last: last.timestamp,
                });
            }
            if self.config.throttle == ThrottleMode::MinSpacing
                && timestamp - last.timestamp < self.config.min_spacing() - SPACING_EPSILON
            {
                trace!(timestamp, last = last.timestamp, "sample throttled");
                return Ok(Recorded::Throttled);
            }
        }

        let sample = Sample::new(timestamp, value);
        if let Some(evicted) = self.history.push(sample) {
            trace!(timestamp = evicted.timestamp, "evicted oldest sample");
        }
        Ok(Recorded::Stored(sample))
    }

    pub fn visible_range(&self) -> XRange {
        range_at(self.clock.elapsed(), self.config.window_width)
    }

    pub fn visible_points(&self) -> Vec<Point> {
        self.points_in(self.visible_range())
    }

    /// Range and points computed from a single clock reading.
    pub fn frame(&self) -> ChartFrame {
        let range = self.visible_range();
        ChartFrame {
            range,
            points: self.points_in(range),
        }
    }

    fn points_in(&self, range: XRange) -> Vec<Point> {
        let points: Vec<Point> = self.history.since(range.min_x).map(Sample::point).collect();
        decimate(points, self.config.points_per_window)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn latest(&self) -> Option<Sample> {
        self.history.latest()
    }

    /// All stored samples, oldest first.
    pub fn history(&self) -> Vec<Sample> {
        self.history.history()
    }
}

fn range_at(elapsed: f64, window_width: f64) -> XRange {
    if elapsed <= window_width {
        XRange::new(0.0, window_width)
    } else {
        XRange::new(elapsed - window_width, elapsed)
    }
}

/// Keeps every Nth point, starting with the first, so that at most `target`
/// remain. `N = ceil(len / target)`. The last point may be dropped.
pub fn decimate(points: Vec<Point>, target: usize) -> Vec<Point> {
    if target == 0 || points.len() <= target {
        return points;
    }
    let stride = points.len().div_ceil(target);
    points.into_iter().step_by(stride).collect()
}
