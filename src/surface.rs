use palette::Srgb;
use palette::Srgba;

/// A colour with a translucent alpha channel, as handed to a [`Surface`].
pub type Color = Srgba;

/// Attach an alpha to one of the 8-bit colours from [`Settings`](crate::settings::Settings).
pub fn with_alpha(color: Srgb<u8>, alpha: f32) -> Color {
    Srgba {
        color: color.into_format(),
        alpha,
    }
}

/// Formats a colour the way a 2D canvas context expects it, e.g. `rgba(0, 243, 255, 0.4)`.
pub fn css(color: Color) -> String {
    let rgb: Srgb<u8> = color.color.into_format();
    format!(
        "rgba({}, {}, {}, {})",
        rgb.red, rgb.green, rgb.blue, color.alpha
    )
}

/// The handful of 2D drawing primitives the particle field needs.
///
/// This maps more or less directly onto `CanvasRenderingContext2d`, but keeping it as a trait means
/// the field can be drawn into a [`CommandBuffer`] in tests and benches.
pub trait Surface {
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64));
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Color,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
    },
}

/// A surface which just remembers what was drawn onto it.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
    fill: Color,
    stroke: Color,
    line_width: f64,
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            // Same defaults as a fresh canvas context.
            fill: Srgba::new(0.0, 0.0, 0.0, 1.0),
            stroke: Srgba::new(0.0, 0.0, 0.0, 1.0),
            line_width: 1.0,
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }
}

impl Surface for CommandBuffer {
    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color: self.fill,
        });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width: self.line_width,
            color: self.stroke,
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            color: self.fill,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_uses_8_bit_channels_and_float_alpha() {
        assert_eq!(
            css(with_alpha(Srgb::new(5, 5, 16), 0.4)),
            "rgba(5, 5, 16, 0.4)"
        );
        assert_eq!(
            css(with_alpha(Srgb::new(0, 243, 255), 1.0)),
            "rgba(0, 243, 255, 1)"
        );
    }

    #[test]
    fn command_buffer_captures_current_state() {
        let mut buf = CommandBuffer::new();
        let pink = with_alpha(Srgb::new(255, 42, 109), 1.0);

        buf.set_fill_color(pink);
        buf.fill_circle(1.0, 2.0, 3.0);
        buf.set_line_width(0.5);
        buf.stroke_line((0.0, 0.0), (1.0, 1.0));

        assert_eq!(
            buf.commands,
            vec![
                DrawCommand::Circle {
                    x: 1.0,
                    y: 2.0,
                    radius: 3.0,
                    color: pink,
                },
                DrawCommand::Line {
                    from: (0.0, 0.0),
                    to: (1.0, 1.0),
                    width: 0.5,
                    color: Srgba::new(0.0, 0.0, 0.0, 1.0),
                },
            ]
        );
        assert_eq!(buf.lines().count(), 1);
        assert_eq!(buf.circles().count(), 1);

        buf.clear();
        assert!(buf.commands.is_empty());
    }
}
