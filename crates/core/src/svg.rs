//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.
//!
//! Used for a static poster of the starfield where animation is unwanted.

use rand::SeedableRng;
use rand::rngs::StdRng;

use nightsky_protocol::{Background, RenderCommand};
use thiserror::Error;

use crate::config::StarfieldConfig;
use crate::starfield::AnimationContext;

#[derive(Debug, Error, PartialEq)]
pub enum SvgError {
    #[error("invalid size {width}x{height}: both sides must be finite and positive")]
    InvalidSize { width: f64, height: f64 },
}

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 96 + 256);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#,
    ));

    let mut gradient_id = 0usize;
    for cmd in commands {
        match cmd {
            RenderCommand::Clear { background } => {
                // Later commands paint over everything drawn so far.
                if let Some(fill) = background.fill_css() {
                    svg.push_str(&format!(
                        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
                        escape_xml(&fill),
                    ));
                }
            }
            RenderCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                svg.push_str(&format!(
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
                    center.x,
                    center.y,
                    radius,
                    color.to_css(),
                ));
            }
            RenderCommand::StrokeGradientLine {
                from,
                to,
                from_color,
                to_color,
                width: line_width,
            } => {
                let id = format!("streak{gradient_id}");
                gradient_id += 1;
                svg.push_str(&format!(
                    r#"<defs><linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    from_color.to_css(),
                    to_color.to_css(),
                ));
                svg.push_str(&format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="url(#{id})" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

/// One deterministic starfield frame as SVG. The same `seed` always yields
/// the same picture.
pub fn starfield_still_svg(
    config: &StarfieldConfig,
    background: Background,
    width: f64,
    height: f64,
    seed: u64,
) -> Result<String, SvgError> {
    let usable = |side: f64| side.is_finite() && side > 0.0;
    if !usable(width) || !usable(height) {
        return Err(SvgError::InvalidSize { width, height });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut context = AnimationContext::populate(config, background, width, height, 0.0, &mut rng);
    let commands = context.step(config, 0.0, &mut rng);
    Ok(render_svg(&commands, width, height))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightsky_protocol::{Color, Pos2};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::Clear {
                background: Background::Solid(Color::rgba(0.0, 0.0, 0.0, 1.0)),
            },
            RenderCommand::FillCircle {
                center: Pos2::new(10.0, 20.0),
                radius: 1.5,
                color: Color::white(0.5),
            },
        ];
        let svg = render_svg(&commands, 800.0, 400.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"fill="rgba(0, 0, 0, 1)""#));
        assert!(svg.contains(
            r#"<circle cx="10.00" cy="20.00" r="1.50" fill="rgba(255, 255, 255, 0.5)"/>"#
        ));
    }

    #[test]
    fn transparent_clear_draws_nothing() {
        let commands = vec![RenderCommand::Clear {
            background: Background::Transparent,
        }];
        assert!(!render_svg(&commands, 10.0, 10.0).contains("<rect"));
    }

    #[test]
    fn each_streak_gets_its_own_gradient() {
        let line = RenderCommand::StrokeGradientLine {
            from: Pos2::new(0.0, 0.0),
            to: Pos2::new(10.0, 5.0),
            from_color: Color::white(1.0),
            to_color: Color::white(0.0),
            width: 2.0,
        };
        let svg = render_svg(&[line.clone(), line], 10.0, 10.0);
        assert!(svg.contains(r#"id="streak0""#));
        assert!(svg.contains(r#"stroke="url(#streak1)""#));
    }

    #[test]
    fn escapes_css_fill() {
        let commands = vec![RenderCommand::Clear {
            background: Background::Css("url(\"x\")&".into()),
        }];
        let svg = render_svg(&commands, 10.0, 10.0);
        assert!(svg.contains("url(&quot;x&quot;)&amp;"));
    }

    #[test]
    fn still_frame_is_deterministic() {
        let config = StarfieldConfig {
            star_count: 20,
            ..StarfieldConfig::default()
        };
        let a = starfield_still_svg(&config, Background::Transparent, 320.0, 240.0, 9).unwrap();
        let b = starfield_still_svg(&config, Background::Transparent, 320.0, 240.0, 9).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.matches("<circle").count(), 20);
        assert_eq!(a.matches("<line ").count(), 1);
    }

    #[test]
    fn still_frame_rejects_unusable_sizes() {
        let config = StarfieldConfig::default();
        for (width, height) in [
            (f64::INFINITY, 100.0),
            (100.0, f64::INFINITY),
            (f64::NEG_INFINITY, 100.0),
            (f64::NAN, 100.0),
            (0.0, 100.0),
            (100.0, -1.0),
        ] {
            let result = starfield_still_svg(&config, Background::Transparent, width, height, 1);
            assert!(
                matches!(result, Err(SvgError::InvalidSize { .. })),
                "{width}x{height} accepted"
            );
        }
    }
}
