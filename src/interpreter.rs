//! Interpreter that walks an expanded L-system sequence with a 2D turtle.
//!
//! The entry point is [`TurtleInterpreter::interpret`]. One call is one pass over the sequence,
//! either measuring ([`PassMode::Bounds`]) or drawing ([`PassMode::Draw`]). All pass state lives in
//! the call, so passes are independent of each other.

use crate::control::{Checkpoint, Uninterrupted};
use crate::drawing::{Segment, SegmentSink};
use crate::error::RenderError;
use crate::turtle::{BoundingBox, TurtleOp, TurtleState};

/// What a pass does with forward moves.
pub enum PassMode<'a> {
    /// Extend the bounding box, draw nothing.
    Bounds,
    /// Emit one segment per move, leave the bounding box alone.
    Draw(&'a mut dyn SegmentSink),
}

/// Result of a pass that may be interrupted by its checkpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Walk<T> {
    Complete(T),
    Interrupted,
}

impl<T> Walk<T> {
    pub fn complete(self) -> Option<T> {
        match self {
            Self::Complete(value) => Some(value),
            Self::Interrupted => None,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

/// Outcome of a completed pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassSummary {
    /// The turtle after the last symbol.
    pub state: TurtleState,
    /// Extent of all moves. Only meaningful for [`PassMode::Bounds`].
    pub bounds: BoundingBox,
    /// Number of forward moves.
    pub moves: usize,
    /// Branches still open at the end (unmatched `[`).
    pub open_branches: usize,
    /// Deepest branch nesting reached.
    pub max_depth: usize,
}

/// Interprets symbol sequences as turtle commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurtleInterpreter {
    angle_step: f64,
    step_length: f64,
}

impl TurtleInterpreter {
    /// Creates an interpreter turning `angle_step` degrees per `+`/`-` and moving `step_length`
    /// units per letter.
    pub fn new(angle_step: f64, step_length: f64) -> Self {
        Self {
            angle_step,
            step_length,
        }
    }

    pub fn angle_step(&self) -> f64 {
        self.angle_step
    }

    pub fn step_length(&self) -> f64 {
        self.step_length
    }

    /// Same angle, different step length (builder pattern).
    pub fn with_step_length(mut self, step_length: f64) -> Self {
        self.step_length = step_length;
        self
    }

    /// Walks `sequence` once, starting from `start` with an empty branch stack.
    ///
    /// # Symbols
    ///
    /// * `A`..=`Z` move `step_length` along the heading.
    /// * `+` / `-` add / subtract `angle_step` degrees.
    /// * `[` saves position and heading; `]` restores the last saved pose. A `]` with nothing
    ///   saved fails with [`RenderError::StackUnderflow`].
    /// * Anything else is ignored.
    ///
    /// `checkpoint` is consulted before every symbol; a `Break` ends the pass with
    /// [`Walk::Interrupted`].
    pub fn interpret<C: Checkpoint + ?Sized>(
        &self,
        sequence: &str,
        start: TurtleState,
        mut mode: PassMode<'_>,
        checkpoint: &mut C,
    ) -> Result<Walk<PassSummary>, RenderError> {
        let mut turtle = start;
        let mut stack: Vec<TurtleState> = Vec::new();
        let mut bounds = BoundingBox::default();
        let mut moves = 0;
        let mut max_depth = 0;

        for (position, symbol) in sequence.chars().enumerate() {
            if checkpoint.checkpoint().is_break() {
                return Ok(Walk::Interrupted);
            }

            match TurtleOp::from_symbol(symbol) {
                TurtleOp::Forward => {
                    let from = turtle.position;
                    turtle.advance(self.step_length);
                    moves += 1;
                    match &mut mode {
                        PassMode::Bounds => bounds.include(turtle.position),
                        PassMode::Draw(sink) => sink.line(Segment {
                            from,
                            to: turtle.position,
                        }),
                    }
                }
                TurtleOp::Turn(sign) => turtle.turn(self.angle_step * sign),
                TurtleOp::Push => {
                    stack
                        .try_reserve(1)
                        .map_err(|_| RenderError::OutOfMemory {
                            requested: stack.len() + 1,
                        })?;
                    stack.push(turtle);
                    max_depth = max_depth.max(stack.len());
                }
                TurtleOp::Pop => {
                    turtle = stack.pop().ok_or(RenderError::StackUnderflow { position })?;
                }
                TurtleOp::Ignore => {}
            }
        }

        Ok(Walk::Complete(PassSummary {
            state: turtle,
            bounds,
            moves,
            open_branches: stack.len(),
            max_depth,
        }))
    }

    /// Uninterrupted bounds pass from the default turtle.
    pub fn bounds(&self, sequence: &str) -> Result<BoundingBox, RenderError> {
        let walk = self.interpret(
            sequence,
            TurtleState::default(),
            PassMode::Bounds,
            &mut Uninterrupted,
        )?;
        Ok(walk.complete().map(|s| s.bounds).unwrap_or_default())
    }

    /// Uninterrupted draw pass from `start`, collecting the segments.
    pub fn segments(
        &self,
        sequence: &str,
        start: TurtleState,
    ) -> Result<Vec<Segment>, RenderError> {
        let mut segments = Vec::new();
        self.interpret(
            sequence,
            start,
            PassMode::Draw(&mut segments),
            &mut Uninterrupted,
        )?;
        Ok(segments)
    }
}
