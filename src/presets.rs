//! Classic L-systems, ready to render.
//!
//! Every letter draws, so systems whose textbook form uses non-drawing variables (Hilbert, the
//! plant's `X`) come out slightly different from the literature.

use crate::config::RenderConfig;

/// A named, well-known L-system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Axiom `F--F--F`, `F → F+F--F+F`, 60°.
    KochSnowflake,
    /// Axiom `F`, `F → F+G`, `G → F-G`, 90°.
    DragonCurve,
    /// Axiom `F`, `F → G-F-G`, `G → F+G+F`, 60°.
    SierpinskiArrowhead,
    /// Axiom `A`, `A → A-B--B+A++AA+B-`, `B → +A-BB--B-A++A+B`, 60°.
    GosperCurve,
    /// Axiom `F`, `F → FF+[+F-F-F]-[-F+F+F]`, 22.5°.
    FractalBush,
}

impl Preset {
    pub const ALL: [Self; 5] = [
        Self::KochSnowflake,
        Self::DragonCurve,
        Self::SierpinskiArrowhead,
        Self::GosperCurve,
        Self::FractalBush,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::KochSnowflake => "Koch snowflake",
            Self::DragonCurve => "Dragon curve",
            Self::SierpinskiArrowhead => "Sierpinski arrowhead",
            Self::GosperCurve => "Gosper curve",
            Self::FractalBush => "Fractal bush",
        }
    }

    /// `(start sequence, production rules, angle, generations)`.
    fn grammar(self) -> (&'static str, &'static str, f64, u32) {
        match self {
            Self::KochSnowflake => ("F--F--F", "(F,F+F--F+F)", 60.0, 4),
            Self::DragonCurve => ("F", "(F,F+G),(G,F-G)", 90.0, 12),
            Self::SierpinskiArrowhead => ("F", "(F,G-F-G),(G,F+G+F)", 60.0, 7),
            Self::GosperCurve => ("A", "(A,A-B--B+A++AA+B-),(B,+A-BB--B-A++A+B)", 60.0, 4),
            Self::FractalBush => ("F", "(F,FF+[+F-F-F]-[-F+F+F])", 22.5, 4),
        }
    }

    /// The preset applied on top of `base`, keeping its canvas and colors.
    pub fn apply(self, base: RenderConfig) -> RenderConfig {
        let (start, rules, angle, generations) = self.grammar();
        RenderConfig {
            start_sequence: start.to_string(),
            production_rules: rules.to_string(),
            angle,
            generations,
            ..base
        }
    }

    pub fn config(self) -> RenderConfig {
        self.apply(RenderConfig::default())
    }
}
