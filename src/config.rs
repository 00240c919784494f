use crate::drawing::Color;
use crate::error::RenderError;
use serde::{Deserialize, Serialize};

/// Inputs of one render run, as collected by an editor.
///
/// Every field has a default, so partial documents deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Starting symbols. Commas are accepted as separators and ignored.
    pub start_sequence: String,
    /// Production rules, e.g. `(F,F+F--F+F)`.
    pub production_rules: String,
    /// Number of rewrite generations.
    pub generations: u32,
    /// Turn per `+`/`-`, in degrees.
    pub angle: f64,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Blank border kept around the figure, in pixels. Default: 15.
    pub margin: u32,
    /// Unscaled length of one forward move. Default: 10.
    pub step_length: f64,
    pub background: Color,
    pub stroke: Color,
    /// Longest expanded sequence a run may build before failing with "OutOfMemory".
    pub max_symbols: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            start_sequence: "F".to_string(),
            production_rules: String::new(),
            generations: 0,
            angle: 90.0,
            width: 800,
            height: 600,
            margin: 15,
            step_length: 10.0,
            background: Color::WHITE,
            stroke: Color::BLACK,
            max_symbols: 64 * 1024 * 1024,
        }
    }
}

impl RenderConfig {
    /// Checks the numeric settings. The grammar itself is checked by [`crate::rules::validate`].
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::Config(format!(
                "canvas must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        let inset = u64::from(self.margin) * 2;
        if u64::from(self.width) <= inset || u64::from(self.height) <= inset {
            return Err(RenderError::Config(format!(
                "canvas {}x{} leaves no room inside a {} px margin",
                self.width, self.height, self.margin
            )));
        }
        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            return Err(RenderError::Config(format!(
                "step length must be positive, got {}",
                self.step_length
            )));
        }
        if !self.angle.is_finite() {
            return Err(RenderError::Config(format!(
                "angle must be finite, got {}",
                self.angle
            )));
        }
        Ok(())
    }
}
