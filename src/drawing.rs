use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An RGBA color. The renderer passes colors through to the sink without interpreting them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// One straight stroke, in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: DVec2,
    pub to: DVec2,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// Receives the segments of a draw pass, in drawing order.
pub trait SegmentSink {
    fn line(&mut self, segment: Segment);
}

impl SegmentSink for Vec<Segment> {
    fn line(&mut self, segment: Segment) {
        self.push(segment);
    }
}

/// The finished picture of one run: a background fill followed by stroked segments.
///
/// This is what a canvas implementation rasterizes or displays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub stroke: Color,
    pub segments: Vec<Segment>,
}

impl Drawing {
    /// Smallest rectangle `(min, max)` covering every segment endpoint, or `None` when empty.
    pub fn extent(&self) -> Option<(DVec2, DVec2)> {
        let mut points = self.segments.iter().flat_map(|s| [s.from, s.to]);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Observable state of a renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderStatus {
    /// Inputs are set, nothing is running.
    Idle,
    Calculating,
    Paused,
    Finished,
    /// The run was cancelled. Not an error.
    Stopped,
    /// The run failed; the message is meant for the user.
    Error(String),
}

/// The external canvas a renderer reports to.
///
/// `present` is only ever called with a complete drawing (bounds pass and draw pass both done).
pub trait CanvasSink {
    fn status(&mut self, status: &RenderStatus);

    fn present(&mut self, drawing: Drawing);
}
