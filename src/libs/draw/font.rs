//! Metrics of the standard Helvetica face, the font every label is set in.

/// Advance widths of ASCII 32..=126 in 1/1000 em, from the Adobe AFM.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0 - ?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @ - O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P - _
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // ` - o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // p - ~
];

const DEFAULT_WIDTH: u16 = 556;

/// Height of capital letters above the baseline, in em.
pub const CAP_HEIGHT: f64 = 0.718;

/// Horizontal advance of `c` in em.
pub fn char_width(c: char) -> f64 {
    let code = c as u32;
    let w = if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    };
    w as f64 / 1000.0
}

/// Advance width of `text` set at `size` points.
///
/// ```
/// use tredraw::libs::draw::font::text_width;
/// assert_eq!(text_width("", 10.0), 0.0);
/// assert!((text_width("May 99", 10.0) - 32.79).abs() < 1e-9);
/// ```
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().map(char_width).sum::<f64>() * size
}

/// Ink height of `text` above the baseline at `size` points.
pub fn text_height(text: &str, size: f64) -> f64 {
    if text.is_empty() {
        0.0
    } else {
        CAP_HEIGHT * size
    }
}
