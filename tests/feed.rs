use activity_chart::clock::MonotonicClock;
use activity_chart::error::FeedError;
use activity_chart::feed::{Feed, FeedConfig};
use activity_chart::render::RenderTarget;
use activity_chart::sample::{ChartFrame, Point, XRange};
use activity_chart::window::{BufferConfig, SlidingWindowSeriesBuffer, ThrottleMode};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
struct RecordingTarget {
    frames: Arc<Mutex<Vec<ChartFrame>>>,
    pending_range: Option<XRange>,
    pending_points: Vec<Point>,
    fail_on_update: Option<usize>,
}

impl RecordingTarget {
    fn frames(&self) -> Vec<ChartFrame> {
        self.frames.lock().unwrap().clone()
    }
}

impl RenderTarget for RecordingTarget {
    fn set_x_range(&mut self, range: XRange) -> io::Result<()> {
        self.pending_range = Some(range);
        Ok(())
    }

    fn set_points(&mut self, points: &[Point]) -> io::Result<()> {
        self.pending_points = points.to_vec();
        Ok(())
    }

    fn update(&mut self) -> io::Result<()> {
        let mut frames = self.frames.lock().unwrap();
        if self.fail_on_update == Some(frames.len()) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "render target gone"));
        }
        frames.push(ChartFrame {
            range: self.pending_range.expect("range set before update"),
            points: self.pending_points.clone(),
        });
        Ok(())
    }
}

fn buffer(config: BufferConfig) -> SlidingWindowSeriesBuffer<MonotonicClock> {
    SlidingWindowSeriesBuffer::new(config).unwrap()
}

#[tokio::test(start_paused = true)]
async fn pushes_one_frame_per_tick_and_stops_on_cancel() {
    let target = RecordingTarget::default();
    let mut next = 0.0;
    let source = move || {
        next += 10.0;
        next
    };
    let feed = Feed::new(
        buffer(BufferConfig::default()),
        source,
        target.clone(),
        FeedConfig::new(Duration::from_secs(1)),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(feed.run(cancel.clone()));
    tokio::time::sleep(Duration::from_millis(3500)).await;
    cancel.cancel();

    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.ticks, 4);
    assert_eq!(summary.stored, 4);
    assert_eq!(summary.rejected, 0);

    let frames = target.frames();
    assert_eq!(frames.len(), 4);
    let last = frames.last().unwrap();
    assert_eq!(last.range, XRange::new(0.0, 10.0));
    let ys: Vec<f64> = last.points.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![10.0, 20.0, 30.0, 40.0]);
    for (i, p) in last.points.iter().enumerate() {
        assert!((p.x - i as f64).abs() < 1e-6, "point {i} at {}", p.x);
    }
}

#[tokio::test(start_paused = true)]
async fn cancel_before_first_tick_is_clean() {
    let target = RecordingTarget::default();
    let feed = Feed::new(
        buffer(BufferConfig::default()),
        || 1.0,
        target.clone(),
        FeedConfig::new(Duration::from_secs(1)),
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = feed.run(cancel).await.unwrap();
    assert_eq!(summary.ticks, 0);
    assert!(target.frames().is_empty());
}

#[tokio::test(start_paused = true)]
async fn invalid_samples_are_skipped_and_loop_continues() {
    let target = RecordingTarget::default();
    let mut n = 0u32;
    let source = move || {
        n += 1;
        if n % 2 == 0 {
            f64::NAN
        } else {
            n as f64
        }
    };
    let feed = Feed::new(
        buffer(BufferConfig::default()),
        source,
        target.clone(),
        FeedConfig::new(Duration::from_secs(1)),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(feed.run(cancel.clone()));
    tokio::time::sleep(Duration::from_millis(3500)).await;
    cancel.cancel();

    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.ticks, 4);
    assert_eq!(summary.stored, 2);
    assert_eq!(summary.rejected, 2);

    // The chart keeps updating on rejected ticks.
    let frames = target.frames();
    assert_eq!(frames.len(), 4);
    let ys: Vec<f64> = frames[3].points.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![1.0, 3.0]);
}

#[tokio::test(start_paused = true)]
async fn render_failure_ends_loop_with_error() {
    let target = RecordingTarget {
        fail_on_update: Some(2),
        ..RecordingTarget::default()
    };
    let feed = Feed::new(
        buffer(BufferConfig::default()),
        || 50.0,
        target.clone(),
        FeedConfig::new(Duration::from_millis(100)),
    );

    let res = feed.run(CancellationToken::new()).await;
    match res {
        Err(FeedError::LoopFailure(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected loop failure, got {other:?}"),
    }
    assert_eq!(target.frames().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn throttling_caps_stored_density() {
    let target = RecordingTarget::default();
    let feed = Feed::new(
        buffer(BufferConfig {
            throttle: ThrottleMode::MinSpacing,
            ..BufferConfig::default()
        }),
        || 1.0,
        target.clone(),
        FeedConfig::new(Duration::from_millis(10)),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(feed.run(cancel.clone()));
    tokio::time::sleep(Duration::from_millis(1005)).await;
    cancel.cancel();

    let summary = handle.await.unwrap().unwrap();
    assert!(summary.ticks > 50);
    assert!(summary.throttled > 0);
    assert_eq!(summary.stored + summary.throttled, summary.ticks);
    // 0.2s minimum spacing over ~1s.
    assert!(summary.stored >= 4 && summary.stored <= 6, "stored {}", summary.stored);
}

#[tokio::test(start_paused = true)]
async fn panicking_source_is_contained_in_task() {
    let target = RecordingTarget::default();
    let mut calls = 0u32;
    let source = move || -> f64 {
        calls += 1;
        if calls == 3 {
            panic!("source exhausted");
        }
        calls as f64
    };
    let feed = Feed::new(
        buffer(BufferConfig::default()),
        source,
        target.clone(),
        FeedConfig::new(Duration::from_millis(100)),
    );

    let handle = tokio::spawn(feed.run(CancellationToken::new()));
    let err = handle.await.expect_err("feed task should panic");
    assert!(err.is_panic());
    assert_eq!(target.frames().len(), 2);
}
