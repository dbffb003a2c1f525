use crate::error::ConfigError;
use crate::feed::FeedConfig;
use crate::window::{
    BufferConfig, ThrottleMode, DEFAULT_MAX_POINTS, DEFAULT_POINTS_PER_WINDOW,
    DEFAULT_WINDOW_WIDTH,
};
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Redraw a strip chart in the terminal
    Console,
    /// Print one JSON frame per tick on stdout
    Json,
}

#[derive(Clone, Debug, Parser)]
#[command(
    name = "activity_chart",
    about = "Live strip chart of simulated WebSocket activity"
)]
pub struct Config {
    /// Update interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Maximum number of samples kept in memory
    #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
    pub max_points: usize,

    /// Width of the visible time window in seconds
    #[arg(long, default_value_t = DEFAULT_WINDOW_WIDTH)]
    pub window_secs: f64,

    /// Maximum points drawn per window
    #[arg(long, default_value_t = DEFAULT_POINTS_PER_WINDOW)]
    pub points_per_window: usize,

    /// Drop samples arriving faster than window_secs / points_per_window
    #[arg(long, default_value_t = false)]
    pub throttle: bool,

    /// Output mode (console/json)
    #[arg(long, value_enum, default_value_t = Mode::Console)]
    pub mode: Mode,

    /// Lower bound of simulated values
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub min_value: f64,

    /// Upper bound of simulated values
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub max_value: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chart width in columns (console mode)
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Chart height in rows (console mode)
    #[arg(long, default_value_t = 15)]
    pub height: usize,
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn throttle_mode(&self) -> ThrottleMode {
        if self.throttle {
            ThrottleMode::MinSpacing
        } else {
            ThrottleMode::Off
        }
    }

    pub fn buffer_config(&self) -> Result<BufferConfig, ConfigError> {
        let config = BufferConfig {
            max_points: self.max_points,
            window_width: self.window_secs,
            points_per_window: self.points_per_window,
            throttle: self.throttle_mode(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn feed_config(&self) -> Result<FeedConfig, ConfigError> {
        // tokio::time::interval panics on a zero period.
        if self.interval_ms == 0 {
            return Err(ConfigError::invalid("interval_ms", "must be greater than 0"));
        }
        Ok(FeedConfig::new(self.interval()))
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.min_value, self.max_value)
    }
}
