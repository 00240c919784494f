//! Two-pass autoscaling: measure the figure, then redraw it scaled into the canvas.

use crate::control::{Checkpoint, Uninterrupted};
use crate::drawing::{Segment, SegmentSink};
use crate::error::RenderError;
use crate::interpreter::{PassMode, PassSummary, TurtleInterpreter, Walk};
use crate::turtle::{BoundingBox, TurtleState};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Per-axis scale applied by the draw pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    /// Independent factors that would stretch `bounds` to the margin-inset canvas on each axis.
    ///
    /// An axis with zero extent (a point, or a straight line along the other axis) gets `1.0`.
    pub fn raw(bounds: &BoundingBox, width: u32, height: u32, margin: u32) -> Self {
        Self {
            x: axis_factor(width, margin, bounds.width()),
            y: axis_factor(height, margin, bounds.height()),
        }
    }

    /// Uniform factors: both axes use the smaller raw factor, so the aspect ratio is kept and the
    /// whole figure fits.
    pub fn fit(bounds: &BoundingBox, width: u32, height: u32, margin: u32) -> Self {
        let raw = Self::raw(bounds, width, height, margin);
        let uniform = raw.x.min(raw.y);
        Self {
            x: uniform,
            y: uniform,
        }
    }

    pub fn uniform(&self) -> f64 {
        self.x.min(self.y)
    }
}

fn axis_factor(canvas: u32, margin: u32, extent: f64) -> f64 {
    if extent == 0.0 {
        return 1.0;
    }
    (f64::from(canvas) - 2.0 * f64::from(margin)) / extent
}

/// Everything the draw pass needs from the bounds pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Unscaled extent found by the bounds pass.
    pub bounds: BoundingBox,
    pub scale: ScaleFactors,
    /// Canvas position the turtle starts the draw pass at.
    pub origin: DVec2,
}

/// Runs the bounds pass and the scaled draw pass for one canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalingPass {
    interpreter: TurtleInterpreter,
    width: u32,
    height: u32,
    margin: u32,
}

impl ScalingPass {
    /// `interpreter` carries the angle step and the unscaled step length.
    pub fn new(interpreter: TurtleInterpreter, width: u32, height: u32, margin: u32) -> Self {
        Self {
            interpreter,
            width,
            height,
            margin,
        }
    }

    /// Derives scale and origin from the unscaled extent of a figure.
    pub fn place(&self, bounds: BoundingBox) -> Placement {
        let scale = ScaleFactors::fit(&bounds, self.width, self.height, self.margin);
        let margin = f64::from(self.margin);
        let origin = DVec2::new(
            bounds.min.x.abs() * scale.x + margin,
            bounds.min.y.abs() * scale.y + margin,
        );
        Placement {
            bounds,
            scale,
            origin,
        }
    }

    /// Pass 1: walk the sequence from the origin at scale 1 and fit the result to the canvas.
    pub fn measure<C: Checkpoint + ?Sized>(
        &self,
        sequence: &str,
        checkpoint: &mut C,
    ) -> Result<Walk<Placement>, RenderError> {
        let walk = self.interpreter.interpret(
            sequence,
            TurtleState::default(),
            PassMode::Bounds,
            checkpoint,
        )?;
        let Some(summary) = walk.complete() else {
            return Ok(Walk::Interrupted);
        };

        let placement = self.place(summary.bounds);
        tracing::debug!(
            moves = summary.moves,
            max_depth = summary.max_depth,
            min = ?placement.bounds.min,
            max = ?placement.bounds.max,
            scale = placement.scale.uniform(),
            "bounds pass complete"
        );
        Ok(Walk::Complete(placement))
    }

    /// Pass 2: walk the sequence again from the placement origin with the step scaled, sending
    /// every segment to `sink`.
    pub fn draw<C: Checkpoint + ?Sized>(
        &self,
        sequence: &str,
        placement: &Placement,
        sink: &mut dyn SegmentSink,
        checkpoint: &mut C,
    ) -> Result<Walk<PassSummary>, RenderError> {
        let scaled = self
            .interpreter
            .with_step_length(self.interpreter.step_length() * placement.scale.uniform());
        let walk = scaled.interpret(
            sequence,
            TurtleState::at(placement.origin),
            PassMode::Draw(sink),
            checkpoint,
        )?;
        if let Walk::Complete(summary) = &walk {
            tracing::debug!(segments = summary.moves, "draw pass complete");
        }
        Ok(walk)
    }

    /// Both passes without interruption.
    pub fn render(&self, sequence: &str) -> Result<(Placement, Vec<Segment>), RenderError> {
        let placement = self
            .measure(sequence, &mut Uninterrupted)?
            .complete()
            .unwrap_or_else(|| self.place(BoundingBox::default()));
        let mut segments = Vec::new();
        self.draw(sequence, &placement, &mut segments, &mut Uninterrupted)?;
        Ok((placement, segments))
    }
}
