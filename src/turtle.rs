//! Turtle state and operations for 2D line interpretation.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Heading of a fresh turtle, in degrees. Points "up" on a canvas whose y axis grows downwards.
pub const INITIAL_HEADING: f64 = -90.0;

/// The pose of the drawing turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current position of the pen.
    pub position: DVec2,

    /// Current heading in degrees. Accumulates without wraparound.
    pub heading: f64,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self::at(DVec2::ZERO)
    }
}

impl TurtleState {
    /// A turtle at `position` with the initial heading.
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            heading: INITIAL_HEADING,
        }
    }

    /// Unit vector of the current heading.
    pub fn direction(&self) -> DVec2 {
        let radians = self.heading.to_radians();
        DVec2::new(radians.cos(), radians.sin())
    }

    /// Moves `length` units along the heading.
    pub fn advance(&mut self, length: f64) {
        self.position += self.direction() * length;
    }

    /// Turns by `degrees`. Positive values turn towards +y (clockwise on screen).
    pub fn turn(&mut self, degrees: f64) {
        self.heading += degrees;
    }
}

/// Running extent of the positions a turtle has moved to. Starts at the origin.
///
/// Each bound stores the coordinate that extended it truncated towards zero, the granularity the
/// fitting pass works at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// Extends the box so it covers `point`.
    pub fn include(&mut self, point: DVec2) {
        if self.min.x > point.x {
            self.min.x = point.x.trunc();
        }
        if self.min.y > point.y {
            self.min.y = point.y.trunc();
        }
        if self.max.x < point.x {
            self.max.x = point.x.trunc();
        }
        if self.max.y < point.y {
            self.max.y = point.y.trunc();
        }
    }

    /// Horizontal extent, `|min.x| + max.x`.
    pub fn width(&self) -> f64 {
        self.min.x.abs() + self.max.x
    }

    /// Vertical extent, `|min.y| + max.y`.
    pub fn height(&self) -> f64 {
        self.min.y.abs() + self.max.y
    }
}

/// Operations that can be performed by the drawing turtle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleOp {
    /// Move one step forward (`A`..=`Z`).
    Forward,
    /// Turn by the angle step times the sign (`+` is `1.0`, `-` is `-1.0`).
    Turn(f64),
    /// Save position and heading onto the branch stack (`[`).
    Push,
    /// Restore the most recently pushed pose (`]`).
    Pop,
    /// No-op: symbol has no turtle meaning.
    Ignore,
}

impl TurtleOp {
    /// Maps one symbol of an expanded sequence to its operation.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            'A'..='Z' => Self::Forward,
            '+' => Self::Turn(1.0),
            '-' => Self::Turn(-1.0),
            '[' => Self::Push,
            ']' => Self::Pop,
            _ => Self::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_heading_points_up() {
        let mut turtle = TurtleState::default();
        turtle.advance(10.0);
        assert!(turtle.position.x.abs() < 1e-9);
        assert!((turtle.position.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_store_truncated_coordinates() {
        let mut bounds = BoundingBox::default();
        bounds.include(DVec2::new(-3.7, 9.9));
        assert_eq!(bounds.min, DVec2::new(-3.0, 0.0));
        assert_eq!(bounds.max, DVec2::new(0.0, 9.0));
        assert_eq!(bounds.width(), 3.0);
        assert_eq!(bounds.height(), 9.0);
    }
}
