pub mod font;
pub mod pdf;
pub mod surface;

pub use pdf::PdfSurface;
pub use surface::{LineCap, Primitive, RecordingSurface, Surface, TextExtents};
