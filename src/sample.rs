use serde::{Deserialize, Serialize};

/// One observation: seconds since the buffer started, and the value seen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }

    pub fn point(&self) -> Point {
        Point {
            x: self.timestamp,
            y: self.value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Horizontal extent of the chart, in seconds since start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct XRange {
    pub min_x: f64,
    pub max_x: f64,
}

impl XRange {
    pub fn new(min_x: f64, max_x: f64) -> Self {
        Self { min_x, max_x }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }
}

/// Everything a render target receives on one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub range: XRange,
    pub points: Vec<Point>,
}
