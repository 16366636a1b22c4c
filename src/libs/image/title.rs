use super::settings::{self, TitleSettings};
use crate::libs::color::Color;
use crate::libs::draw::Surface;
use crate::libs::geometry::{Location, Viewport};

/// Optional text above the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
    pub color: Color,
    pub font_size: f64,
    /// From the viewport origin to the baseline start
    pub offset: Location,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Color::BLACK,
            font_size: 12.0,
            offset: Location::new(0.0, 0.0),
        }
    }
}

impl Title {
    pub fn draw(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        if self.text.is_empty() {
            return;
        }
        let height = surface.text_size(&self.text, self.font_size).height;
        surface.text(
            Location::new(
                viewport.origin.x + self.offset.x,
                viewport.origin.y + self.offset.y + height,
            ),
            &self.text,
            self.color,
            self.font_size,
            0.0,
        );
    }

    pub fn load_settings(&mut self, s: &TitleSettings) {
        settings::set_if_not_empty(&mut self.text, &s.text);
        settings::set_if_some(&mut self.color, &s.color);
        settings::set_if_non_negative(&mut self.font_size, s.font_size);
        if let Some([x, y]) = s.offset {
            self.offset = Location::new(x, y);
        }
    }

    pub fn dump_settings(&self) -> TitleSettings {
        TitleSettings {
            text: Some(self.text.clone()),
            color: Some(self.color),
            font_size: Some(self.font_size),
            offset: Some([self.offset.x, self.offset.y]),
        }
    }
}
