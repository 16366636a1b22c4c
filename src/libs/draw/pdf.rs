use super::surface::{LineCap, Surface};
use crate::libs::color::Color;
use crate::libs::geometry::{Location, Size};
use crate::libs::phylo::error::TreeError;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, LineCapStyle, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Pt, Rgb, TextMatrix,
};
use std::io::{BufWriter, Write};

/// Single page PDF document drawn through [`Surface`].
///
/// Nothing is written until [`PdfSurface::finish`].
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    canvas: Size,
    out: Box<dyn Write>,
}

fn pt_to_mm(v: f64) -> Mm {
    Mm((v * 25.4 / 72.0) as f32)
}

// Transparency is approximated by blending over a white page
fn pdf_color(color: Color) -> PdfColor {
    let alpha = color.alpha();
    let blend = |c: f64| (1.0 - alpha + alpha * c) as f32;
    PdfColor::Rgb(Rgb::new(
        blend(color.red()),
        blend(color.green()),
        blend(color.blue()),
        None,
    ))
}

impl PdfSurface {
    /// Opens `output` (`-` for stdout) for a page of `canvas` points.
    pub fn create(output: &str, canvas: Size) -> Result<Self, TreeError> {
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(TreeError::SurfaceInit(format!(
                "invalid canvas size {}x{}",
                canvas.width, canvas.height
            )));
        }
        let out = crate::libs::io::writer(output)
            .map_err(|e| TreeError::SurfaceInit(e.to_string()))?;

        let (doc, page, layer) = PdfDocument::new(
            "tredraw",
            pt_to_mm(canvas.width),
            pt_to_mm(canvas.height),
            "Layer 1",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| TreeError::SurfaceInit(e.to_string()))?;

        Ok(Self {
            doc,
            layer,
            font,
            canvas,
            out,
        })
    }

    /// Writes the document and releases the output.
    pub fn finish(self) -> Result<(), TreeError> {
        let mut writer = BufWriter::new(self.out);
        self.doc
            .save(&mut writer)
            .map_err(|e| TreeError::SurfaceInit(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| TreeError::io("cannot write pdf", e))?;
        Ok(())
    }

    fn point(&self, a: Location) -> Point {
        Point {
            x: Pt(a.x as f32),
            y: Pt((self.canvas.height - a.y) as f32),
        }
    }
}

impl Surface for PdfSurface {
    fn canvas_size(&self) -> Size {
        self.canvas
    }

    fn line(&mut self, a: Location, b: Location, color: Color, width: f64, cap: LineCap) {
        let cap = match cap {
            LineCap::Butt => LineCapStyle::Butt,
            LineCap::Round => LineCapStyle::Round,
            LineCap::Square => LineCapStyle::ProjectingSquare,
        };
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(width as f32);
        self.layer.set_line_cap_style(cap);
        self.layer.add_line(Line {
            points: vec![(self.point(a), false), (self.point(b), false)],
            is_closed: false,
        });
    }

    fn fill_polygon(&mut self, points: &[Location], color: Color) {
        if points.len() < 3 {
            return;
        }
        let ring = points.iter().map(|p| (self.point(*p), false)).collect();
        let mut polygon = Polygon::default();
        polygon.mode = PaintMode::Fill;
        polygon.winding_order = WindingOrder::NonZero;
        polygon.rings.push(ring);

        self.layer.set_fill_color(pdf_color(color));
        self.layer.add_polygon(polygon);
    }

    fn text(&mut self, a: Location, text: &str, color: Color, size: f64, rotation: f64) {
        if text.is_empty() {
            return;
        }
        let at = self.point(a);
        self.layer.begin_text_section();
        self.layer.set_font(&self.font, size as f32);
        self.layer.set_fill_color(pdf_color(color));
        // y is flipped, clockwise on the canvas is counter-clockwise in PDF
        self.layer.set_text_matrix(TextMatrix::TranslateRotate(
            at.x,
            at.y,
            -(rotation.to_degrees() as f32),
        ));
        self.layer.write_text(text, &self.font);
        self.layer.end_text_section();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_surface_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let path = path.to_str().unwrap();

        let mut surface = PdfSurface::create(path, Size::new(612.0, 792.0)).unwrap();
        surface.line(
            Location::new(10.0, 10.0),
            Location::new(100.0, 10.0),
            Color::BLACK,
            1.0,
            LineCap::Round,
        );
        surface.double_arrow(
            Location::new(50.0, 50.0),
            Location::new(50.0, 150.0),
            Color::parse("#ff0000:80").unwrap(),
            1.0,
            3.0,
        );
        surface.text(Location::new(10.0, 200.0), "May 99", Color::GRAY, 10.0, 1.5);
        surface.finish().unwrap();

        let data = std::fs::read(path).unwrap();
        assert!(data.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_surface_errors() {
        assert!(matches!(
            PdfSurface::create("out.pdf", Size::new(0.0, 792.0)),
            Err(TreeError::SurfaceInit(_))
        ));
        assert!(matches!(
            PdfSurface::create("no/such/dir/out.pdf", Size::new(612.0, 792.0)),
            Err(TreeError::SurfaceInit(_))
        ));
    }
}
