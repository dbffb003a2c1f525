use activity_chart::clock::MonotonicClock;
use activity_chart::config::{Config, Mode};
use activity_chart::error::{ConfigError, FeedError};
use activity_chart::feed::{Feed, FeedSummary};
use activity_chart::render::{ConsoleChart, JsonLines, RenderTarget};
use activity_chart::runtime;
use activity_chart::source::UniformSource;
use activity_chart::window::SlidingWindowSeriesBuffer;
use clap::Parser;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    runtime::init_tracing();
    let args = Config::parse();
    info!(
        "Starting: interval={}ms, max_points={}, window={}s, points_per_window={}, throttle={}, mode={:?}",
        args.interval_ms,
        args.max_points,
        args.window_secs,
        args.points_per_window,
        args.throttle,
        args.mode
    );

    let feed = match build_feed(&args) {
        Ok(f) => f,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let cancel = CancellationToken::new();
    let feed_cancel = cancel.clone();
    let feed_handle = tokio::spawn(async move { feed.run(feed_cancel).await });

    // A render failure also ends the feed, without any signal.
    tokio::spawn(async move {
        runtime::shutdown_signal().await;
        cancel.cancel();
    });

    let code = report(feed_handle.await);
    if code != 0 {
        std::process::exit(code);
    }
}

type BoxedTarget = Box<dyn RenderTarget + Send>;

fn build_feed(args: &Config) -> Result<Feed<MonotonicClock, UniformSource, BoxedTarget>, ConfigError> {
    let buffer = SlidingWindowSeriesBuffer::new(args.buffer_config()?)?;
    let source = match args.seed {
        Some(seed) => UniformSource::seeded(args.min_value, args.max_value, seed)?,
        None => UniformSource::new(args.min_value, args.max_value)?,
    };
    let target: BoxedTarget = match args.mode {
        Mode::Console => Box::new(ConsoleChart::new(
            std::io::stdout(),
            args.width,
            args.height,
            args.y_range(),
        )),
        Mode::Json => Box::new(JsonLines::new(std::io::stdout())),
    };
    Ok(Feed::new(buffer, source, target, args.feed_config()?))
}

/// Logs how the feed ended and returns the process exit status.
fn report(outcome: Result<Result<FeedSummary, FeedError>, JoinError>) -> i32 {
    match outcome {
        Ok(Ok(summary)) => {
            info!(
                "Stopped after {} ticks ({} stored, {} throttled, {} rejected)",
                summary.ticks, summary.stored, summary.throttled, summary.rejected
            );
            0
        }
        Ok(Err(e)) => {
            error!("Chart stopped updating: {}", e);
            1
        }
        Err(e) => {
            error!("Feed task aborted: {}", e);
            1
        }
    }
}
