use serde::{Deserialize, Serialize};

use crate::types::{Background, Color, Pos2};

/// A single, stateless render instruction.
///
/// The starfield emits a `Vec<RenderCommand>` for each frame. Renderers
/// consume this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Reset the whole surface. A transparent background leaves the page
    /// behind the canvas visible.
    Clear { background: Background },

    /// Draw a filled circle.
    FillCircle {
        center: Pos2,
        radius: f64,
        color: Color,
    },

    /// Stroke a line segment whose color fades linearly from `from_color`
    /// at `from` to `to_color` at `to`.
    StrokeGradientLine {
        from: Pos2,
        to: Pos2,
        from_color: Color,
        to_color: Color,
        width: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_survive_json() {
        let commands = vec![
            RenderCommand::Clear {
                background: Background::Css("#0b0d17".into()),
            },
            RenderCommand::FillCircle {
                center: Pos2::new(4.0, 2.0),
                radius: 1.5,
                color: Color::white(0.75),
            },
        ];
        let json = serde_json::to_string(&commands).unwrap();
        let back: Vec<RenderCommand> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, commands);
    }
}
