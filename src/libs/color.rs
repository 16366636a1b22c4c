use crate::libs::phylo::error::TreeError;
use lazy_static::lazy_static;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// RGB color with transparency packed as `0xAARRGGBB`.
///
/// `AA` is transparency, not opacity: `0x00` is fully opaque and `0xFF`
/// fully transparent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const GRAY: Color = Color(0x808080);
    pub const LIGHT_GRAY: Color = Color(0xD3D3D3);
    pub const PINK: Color = Color(0xFFC0CB);

    pub const fn new(value: u32) -> Self {
        Color(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn rgb(&self) -> u32 {
        self.0 & 0xFF_FFFF
    }

    /// Transparency byte
    pub fn alpha_byte(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn with_alpha_byte(self, alpha: u8) -> Self {
        Color(self.rgb() | ((alpha as u32) << 24))
    }

    pub fn red(&self) -> f64 {
        ((self.0 >> 16) & 0xFF) as f64 / 255.0
    }

    pub fn green(&self) -> f64 {
        ((self.0 >> 8) & 0xFF) as f64 / 255.0
    }

    pub fn blue(&self) -> f64 {
        (self.0 & 0xFF) as f64 / 255.0
    }

    /// Opacity in [0, 1], 1 is fully opaque.
    pub fn alpha(&self) -> f64 {
        (0xFF - self.alpha_byte() as u32) as f64 / 255.0
    }

    /// Parses `#RRGGBB` and `#RRGGBB:AA`.
    ///
    /// ```
    /// use tredraw::libs::color::Color;
    /// let c = Color::parse("#ff8000").unwrap();
    /// assert_eq!(c.value(), 0xFF8000);
    /// let c = Color::parse("#ff8000:80").unwrap();
    /// assert_eq!(c.to_string(), "#ff8000:80");
    /// assert!(Color::parse("ff8000").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, TreeError> {
        let bad = || TreeError::ColorFormat(format!("cannot parse Color from {}", text));
        let hex = |s: &str| -> Result<u32, TreeError> {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(bad());
            }
            u32::from_str_radix(s, 16).map_err(|_| bad())
        };

        let body = text.strip_prefix('#').ok_or_else(bad)?;
        if !body.is_ascii() {
            return Err(bad());
        }
        match body.len() {
            6 => Ok(Color(hex(body)?)),
            9 => {
                let (rgb, alpha) = body.split_at(6);
                let alpha = alpha.strip_prefix(':').ok_or_else(bad)?;
                Ok(Color(hex(rgb)?).with_alpha_byte(hex(alpha)? as u8))
            }
            _ => Err(bad()),
        }
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Color(value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.rgb())?;
        if self.alpha_byte() != 0 {
            write!(f, ":{:02x}", self.alpha_byte())?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ----------------------------------------------------------------------------
// Palette
// ----------------------------------------------------------------------------

/// Read-only color database shared by all colorings.
#[derive(Debug)]
pub struct Palette {
    continents: BTreeMap<&'static str, Color>,
    distinct: Vec<Color>,
}

lazy_static! {
    static ref PALETTE: Palette = Palette::new();
}

/// The process-wide palette, built on first access.
pub fn palette() -> &'static Palette {
    &PALETTE
}

impl Palette {
    fn new() -> Self {
        let continents = [
            ("EUROPE", 0x00FF00),
            ("CENTRAL-AMERICA", 0xAAF9FF),
            ("MIDDLE-EAST", 0x8000FF),
            ("NORTH-AMERICA", 0x00008B),
            ("AFRICA", 0xFF8000),
            ("ASIA", 0xFF0000),
            ("RUSSIA", 0xB03060),
            ("AUSTRALIA-OCEANIA", 0xFF69B4),
            ("SOUTH-AMERICA", 0x40E0D0),
            ("ANTARCTICA", 0x808080),
            ("CHINA-SOUTH", 0xFF0000),
            ("CHINA-NORTH", 0x6495ED),
            ("CHINA-UNKNOWN", 0x808080),
            ("UNKNOWN", 0x808080),
        ]
        .into_iter()
        .map(|(name, rgb)| (name, Color::new(rgb)))
        .collect();

        // Kelly's maximum contrast set, minus the medium gray
        let distinct = [
            0xA6BDD7, 0xC10020, 0xFFB300, 0x803E75, 0xFF6800, 0xCEA262, 0x007D34, 0xF6768E,
            0x00538A, 0xFF7A5C, 0x53377A, 0xFF8E00, 0xB32851, 0xF4C800, 0x7F180D, 0x93AA00,
            0x593315, 0xF13A13, 0x232C16,
        ]
        .into_iter()
        .map(Color::new)
        .collect();

        Self {
            continents,
            distinct,
        }
    }

    /// Unknown continents map to gray.
    pub fn continent(&self, continent: &str) -> Color {
        self.continents
            .get(continent)
            .copied()
            .unwrap_or(Color::GRAY)
    }

    pub fn continent_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.continents.keys().copied()
    }

    /// Kelly color by index, pink once the sequence is exhausted.
    pub fn distinct(&self, index: usize) -> Color {
        self.distinct.get(index).copied().unwrap_or(Color::PINK)
    }
}
