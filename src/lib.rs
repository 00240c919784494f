//! # lsystem-canvas
//!
//! Expands Lindenmayer-system grammars and renders them as 2D turtle line drawings that are
//! autoscaled to a canvas.
//!
//! A run validates the starting sequence and production rules, builds a [`RuleTable`], rewrites
//! the sequence for a number of generations, then walks the result twice with a turtle: once to
//! measure the figure and once to draw it scaled into the canvas. [`LSystemRenderer`] drives the
//! whole run and can be paused, resumed and stopped from another thread through a
//! [`RenderControl`]. The output is a [`Drawing`] handed to a [`CanvasSink`], which stays
//! engine-agnostic: a GUI, a rasterizer or an SVG writer can all consume it.

pub mod config;
pub mod control;
pub mod drawing;
pub mod error;
pub mod expand;
pub mod interpreter;
pub mod presets;
pub mod render;
pub mod rules;
pub mod scaling;
pub mod turtle;

pub use config::*;
pub use control::*;
pub use drawing::*;
pub use error::*;
pub use expand::*;
pub use interpreter::*;
pub use presets::*;
pub use render::*;
pub use rules::*;
pub use scaling::*;
pub use turtle::*;
