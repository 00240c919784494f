//! The render loop: validation, expansion, bounds pass, draw pass, presentation.
//!
//! [`LSystemRenderer::run`] drives one complete run on the calling thread. Other threads steer it
//! through a [`RenderControl`] obtained from [`LSystemRenderer::control`]; every change of state is
//! reported to the [`CanvasSink`] as a [`RenderStatus`].

use crate::config::RenderConfig;
use crate::control::{Checkpoint, RenderControl};
use crate::drawing::{CanvasSink, Drawing, RenderStatus, Segment};
use crate::error::RenderError;
use crate::expand::Expander;
use crate::interpreter::{TurtleInterpreter, Walk};
use crate::rules::RuleTable;
use crate::scaling::{Placement, ScalingPass};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStats {
    /// Length of the expanded sequence.
    pub symbols: usize,
    /// Number of segments presented.
    pub segments: usize,
    /// Summed length of the presented segments, in canvas units.
    pub path_length: f64,
    /// Bounds, scale and origin used by the draw pass.
    pub placement: Placement,
    /// Wall time from the start of expansion to presentation.
    pub elapsed: Duration,
}

/// How a run that did not fail ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// Both passes completed and the drawing was presented.
    Finished(RenderStats),
    /// The run was stopped; nothing was presented.
    Stopped,
}

/// Renders the L-system described by a [`RenderConfig`].
///
/// Each run rebuilds the rule table and the expanded sequence from scratch. A failed or stopped
/// run leaves the renderer ready for the next one.
#[derive(Debug)]
pub struct LSystemRenderer {
    config: RenderConfig,
    control: RenderControl,
    status: RenderStatus,
}

impl LSystemRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            control: RenderControl::new(),
            status: RenderStatus::Idle,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replaces the inputs for the next run and returns to [`RenderStatus::Idle`].
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
        self.status = RenderStatus::Idle;
    }

    /// A handle for stopping, pausing and resuming runs of this renderer.
    pub fn control(&self) -> RenderControl {
        self.control.clone()
    }

    /// The last status reported.
    pub fn status(&self) -> &RenderStatus {
        &self.status
    }

    /// Performs one complete run.
    ///
    /// Invalid inputs are rejected before anything is reported: the status stays `Idle` and the
    /// error lists every problem. Otherwise the sink sees `Calculating`, possibly
    /// `Paused`/`Calculating` pairs, and then exactly one of `Finished` (after `present`),
    /// `Stopped` or `Error`.
    pub fn run<S: CanvasSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<RenderOutcome, RenderError> {
        let table = self.prepare()?;
        self.control.clear_stop();

        let started = Instant::now();
        tracing::info!(
            start = %self.config.start_sequence,
            rules = %self.config.production_rules,
            generations = self.config.generations,
            angle = self.config.angle,
            "render started"
        );
        report(&mut self.status, sink, RenderStatus::Calculating);

        match self.execute(&table, sink, started) {
            Ok(Some((drawing, stats))) => {
                sink.present(drawing);
                report(&mut self.status, sink, RenderStatus::Finished);
                tracing::info!(
                    symbols = stats.symbols,
                    segments = stats.segments,
                    path_length = stats.path_length,
                    elapsed_ms = stats.elapsed.as_millis() as u64,
                    "render finished"
                );
                Ok(RenderOutcome::Finished(stats))
            }
            Ok(None) => {
                report(&mut self.status, sink, RenderStatus::Stopped);
                tracing::info!("render stopped");
                Ok(RenderOutcome::Stopped)
            }
            Err(e) => {
                tracing::error!(error = %e, "render failed");
                report(&mut self.status, sink, RenderStatus::Error(e.to_string()));
                Err(e)
            }
        }
    }

    fn prepare(&self) -> Result<RuleTable, RenderError> {
        self.config.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "render configuration rejected");
        })?;
        let table = RuleTable::parse(&self.config.start_sequence, &self.config.production_rules)
            .inspect_err(|errors| {
                for error in errors.iter() {
                    tracing::warn!(%error, "grammar rejected");
                }
            })?;
        Ok(table)
    }

    /// Expansion and both passes. `None` means the run was stopped.
    fn execute<S: CanvasSink + ?Sized>(
        &mut self,
        table: &RuleTable,
        sink: &mut S,
        started: Instant,
    ) -> Result<Option<(Drawing, RenderStats)>, RenderError> {
        let config = &self.config;
        let mut checkpoint = LoopCheckpoint {
            control: &self.control,
            status: &mut self.status,
            sink,
        };

        let Walk::Complete(sequence) = Expander::new(table)
            .with_symbol_limit(config.max_symbols)
            .expand_with(&config.start_sequence, config.generations, &mut checkpoint)?
        else {
            return Ok(None);
        };

        let pass = ScalingPass::new(
            TurtleInterpreter::new(config.angle, config.step_length),
            config.width,
            config.height,
            config.margin,
        );

        let Walk::Complete(placement) = pass.measure(&sequence, &mut checkpoint)? else {
            return Ok(None);
        };

        let letters = sequence.bytes().filter(u8::is_ascii_uppercase).count();
        let mut segments = Vec::new();
        segments
            .try_reserve_exact(letters)
            .map_err(|_| RenderError::OutOfMemory { requested: letters })?;

        if pass
            .draw(&sequence, &placement, &mut segments, &mut checkpoint)?
            .is_interrupted()
        {
            return Ok(None);
        }

        let stats = RenderStats {
            symbols: sequence.len(),
            segments: segments.len(),
            path_length: segments.iter().map(Segment::length).sum(),
            placement,
            elapsed: started.elapsed(),
        };
        let drawing = Drawing {
            width: config.width,
            height: config.height,
            background: config.background,
            stroke: config.stroke,
            segments,
        };
        Ok(Some((drawing, stats)))
    }
}

fn report<S: CanvasSink + ?Sized>(current: &mut RenderStatus, sink: &mut S, next: RenderStatus) {
    tracing::debug!(from = ?current, to = ?next, "status");
    sink.status(&next);
    *current = next;
}

/// Per-symbol stop / pause handling of a run.
struct LoopCheckpoint<'a, S: ?Sized> {
    control: &'a RenderControl,
    status: &'a mut RenderStatus,
    sink: &'a mut S,
}

impl<S: CanvasSink + ?Sized> Checkpoint for LoopCheckpoint<'_, S> {
    fn checkpoint(&mut self) -> ControlFlow<()> {
        if self.control.is_stopped() {
            return ControlFlow::Break(());
        }
        if self.control.is_paused() {
            report(self.status, self.sink, RenderStatus::Paused);
            self.control.wait_while_paused();
            if self.control.is_stopped() {
                return ControlFlow::Break(());
            }
            report(self.status, self.sink, RenderStatus::Calculating);
        }
        ControlFlow::Continue(())
    }
}
