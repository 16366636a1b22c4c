use super::font;
use crate::libs::color::Color;
use crate::libs::geometry::{Location, Size};
use std::f64::consts::FRAC_PI_2;

/// Arrow head length relative to its width.
const ARROW_WIDTH_TO_LENGTH_RATIO: f64 = 2.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Measured text: advance width, height above the baseline, and the
/// offset of the first glyph's ink from the pen position.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TextExtents {
    pub width: f64,
    pub height: f64,
    pub x_bearing: f64,
}

impl TextExtents {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Vector drawing target. Coordinates are points with the origin at the
/// top-left of the canvas, y growing downward; rotations are radians,
/// clockwise.
pub trait Surface {
    fn canvas_size(&self) -> Size;

    fn line(&mut self, a: Location, b: Location, color: Color, width: f64, cap: LineCap);

    /// Closed polygon filled with `color`.
    fn fill_polygon(&mut self, points: &[Location], color: Color);

    /// Text with its baseline starting at `a`.
    fn text(&mut self, a: Location, text: &str, color: Color, size: f64, rotation: f64);

    fn text_size(&self, text: &str, size: f64) -> TextExtents {
        TextExtents {
            width: font::text_width(text, size),
            height: font::text_height(text, size),
            x_bearing: 0.0,
        }
    }

    /// Filled triangle with its tip at `a`, pointing against `sign` along
    /// `angle`. Returns the middle of the base, where the shaft attaches.
    fn arrow_head(
        &mut self,
        a: Location,
        angle: f64,
        sign: f64,
        color: Color,
        arrow_width: f64,
    ) -> Location {
        let arrow_length = arrow_width * ARROW_WIDTH_TO_LENGTH_RATIO;
        let b = Location::new(
            a.x + sign * arrow_length * angle.cos(),
            a.y + sign * arrow_length * angle.sin(),
        );
        let c = Location::new(
            b.x + sign * arrow_width * (angle + FRAC_PI_2).cos() * 0.5,
            b.y + sign * arrow_width * (angle + FRAC_PI_2).sin() * 0.5,
        );
        let d = Location::new(
            b.x + sign * arrow_width * (angle - FRAC_PI_2).cos() * 0.5,
            b.y + sign * arrow_width * (angle - FRAC_PI_2).sin() * 0.5,
        );
        self.fill_polygon(&[a, c, d], color);
        b
    }

    /// Line from `a` to `b` with an arrow head at both ends.
    fn double_arrow(
        &mut self,
        a: Location,
        b: Location,
        color: Color,
        line_width: f64,
        arrow_width: f64,
    ) {
        let x_eq = (b.x - a.x).abs() < 1e-10;
        let sign2 = if x_eq {
            if a.y < b.y {
                1.0
            } else {
                -1.0
            }
        } else if b.x < a.x {
            1.0
        } else {
            -1.0
        };
        let angle = if x_eq {
            -FRAC_PI_2
        } else {
            ((b.y - a.y) / (b.x - a.x)).atan()
        };

        let la = self.arrow_head(a, angle, -sign2, color, arrow_width);
        let lb = self.arrow_head(b, angle, sign2, color, arrow_width);
        self.line(la, lb, color, line_width, LineCap::Butt);
    }
}

// ----------------------------------------------------------------------------
// Recording surface
// ----------------------------------------------------------------------------

/// A primitive as emitted to a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        a: Location,
        b: Location,
        color: Color,
        width: f64,
        cap: LineCap,
    },
    Polygon {
        points: Vec<Location>,
        color: Color,
    },
    Text {
        a: Location,
        text: String,
        color: Color,
        size: f64,
        rotation: f64,
    },
}

/// In-memory surface keeping every primitive, measuring text with the
/// same metrics as the PDF backend.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    canvas: Size,
    pub primitives: Vec<Primitive>,
}

impl RecordingSurface {
    pub fn new(canvas: Size) -> Self {
        Self {
            canvas,
            primitives: Vec::new(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Location, &Location, &Color, f64)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line {
                a, b, color, width, ..
            } => Some((a, b, color, *width)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&Location, &str, f64, f64)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text {
                a,
                text,
                size,
                rotation,
                ..
            } => Some((a, text.as_str(), *size, *rotation)),
            _ => None,
        })
    }

    pub fn polygons(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Polygon { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn canvas_size(&self) -> Size {
        self.canvas
    }

    fn line(&mut self, a: Location, b: Location, color: Color, width: f64, cap: LineCap) {
        self.primitives.push(Primitive::Line {
            a,
            b,
            color,
            width,
            cap,
        });
    }

    fn fill_polygon(&mut self, points: &[Location], color: Color) {
        self.primitives.push(Primitive::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, a: Location, text: &str, color: Color, size: f64, rotation: f64) {
        self.primitives.push(Primitive::Text {
            a,
            text: text.to_string(),
            color,
            size,
            rotation,
        });
    }
}
