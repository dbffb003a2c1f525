use crate::sample::{ChartFrame, Point, XRange};
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};

/// Where each tick's frame ends up. The update loop only ever writes to it.
pub trait RenderTarget {
    fn set_x_range(&mut self, range: XRange) -> io::Result<()>;

    fn set_points(&mut self, points: &[Point]) -> io::Result<()>;

    /// Makes the pending range and points visible.
    fn update(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    fn set_x_range(&mut self, range: XRange) -> io::Result<()> {
        (**self).set_x_range(range)
    }

    fn set_points(&mut self, points: &[Point]) -> io::Result<()> {
        (**self).set_points(points)
    }

    fn update(&mut self) -> io::Result<()> {
        (**self).update()
    }
}

fn empty_frame() -> ChartFrame {
    ChartFrame {
        range: XRange::new(0.0, 0.0),
        points: Vec::new(),
    }
}

/// Terminal strip chart drawn with crossterm.
pub struct ConsoleChart<W: Write> {
    out: W,
    width: usize,
    height: usize,
    y_range: (f64, f64),
    pending: ChartFrame,
}

impl<W: Write> ConsoleChart<W> {
    pub fn new(out: W, width: usize, height: usize, y_range: (f64, f64)) -> Self {
        Self {
            out,
            width: width.max(2),
            height: height.max(2),
            y_range,
            pending: empty_frame(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderTarget for ConsoleChart<W> {
    fn set_x_range(&mut self, range: XRange) -> io::Result<()> {
        self.pending.range = range;
        Ok(())
    }

    fn set_points(&mut self, points: &[Point]) -> io::Result<()> {
        self.pending.points.clear();
        self.pending.points.extend_from_slice(points);
        Ok(())
    }

    fn update(&mut self) -> io::Result<()> {
        let out = &mut self.out;
        out.queue(MoveTo(0, 0))?;
        out.queue(Clear(ClearType::All))?;

        writeln!(out, "{}", "WebSocket Activity".bold())?;
        writeln!(out, "Press Ctrl+C to exit.")?;
        writeln!(out)?;

        let (y_min, y_max) = self.y_range;
        let rows = rasterize(&self.pending, self.width, self.height, self.y_range);
        for (i, row) in rows.iter().enumerate() {
            let label = if i == 0 {
                format!("{y_max:>6.1}")
            } else if i + 1 == rows.len() {
                format!("{y_min:>6.1}")
            } else {
                " ".repeat(6)
            };
            writeln!(out, "{label} |{}", row.as_str().with(Color::Cyan))?;
        }
        writeln!(out, "{} +{}", " ".repeat(6), "-".repeat(self.width))?;

        let range = self.pending.range;
        let left = format!("{:.1}s", range.min_x);
        let right = format!("{:.1}s", range.max_x);
        let gap = self.width.saturating_sub(left.len() + right.len());
        writeln!(out, "{}  {left}{}{right}", " ".repeat(6), " ".repeat(gap))?;
        writeln!(out, "points: {}", self.pending.points.len())?;

        out.flush()
    }
}

/// Lays points onto a `width` x `height` character grid, top row first.
///
/// Columns map linearly over the frame's x-range and rows over `y_range`;
/// out-of-range coordinates are clamped to the border cells.
pub fn rasterize(frame: &ChartFrame, width: usize, height: usize, y_range: (f64, f64)) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mut grid = vec![vec![' '; width]; height];
    let (y_min, y_max) = y_range;
    let x_span = frame.range.width();
    let y_span = y_max - y_min;

    for p in &frame.points {
        let col = scale(p.x - frame.range.min_x, x_span, width);
        let row = scale(p.y - y_min, y_span, height);
        grid[height - 1 - row][col] = '*';
    }

    grid.into_iter().map(|r| r.into_iter().collect()).collect()
}

fn scale(offset: f64, span: f64, cells: usize) -> usize {
    if span <= 0.0 || !offset.is_finite() {
        return 0;
    }
    let frac = (offset / span).clamp(0.0, 1.0);
    ((frac * (cells - 1) as f64).round() as usize).min(cells - 1)
}

/// Emits one JSON object per frame, newline separated.
pub struct JsonLines<W: Write> {
    out: W,
    pending: ChartFrame,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: empty_frame(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderTarget for JsonLines<W> {
    fn set_x_range(&mut self, range: XRange) -> io::Result<()> {
        self.pending.range = range;
        Ok(())
    }

    fn set_points(&mut self, points: &[Point]) -> io::Result<()> {
        self.pending.points.clear();
        self.pending.points.extend_from_slice(points);
        Ok(())
    }

    fn update(&mut self) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &self.pending)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
