use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn red(self) -> u8 {
        self.r
    }

    pub fn green(self) -> u8 {
        self.g
    }

    pub fn blue(self) -> u8 {
        self.b
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    pub fn from_rgba_array(color: [u8; 4]) -> Self {
        Self::rgb(color[0], color[1], color[2])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const CYAN: Color = Color::rgb(0, 255, 255);
pub const MAGENTA: Color = Color::rgb(255, 0, 255);
pub const YELLOW: Color = Color::rgb(255, 255, 0);
pub const DARK_RED: Color = Color::rgb(128, 0, 0);
pub const DARK_GREEN: Color = Color::rgb(0, 128, 0);
pub const DARK_BLUE: Color = Color::rgb(0, 0, 128);
pub const GRAY: Color = Color::rgb(128, 128, 128);
pub const DARK_GRAY: Color = Color::rgb(64, 64, 64);
pub const LIGHT_GRAY: Color = Color::rgb(192, 192, 192);
pub const ORANGE: Color = Color::rgb(255, 200, 0);
pub const VIOLET: Color = Color::rgb(238, 130, 238);
pub const PINK: Color = Color::rgb(255, 175, 175);
pub const BOOK_BLUE: Color = Color::rgb(9, 90, 166);
pub const BOOK_LIGHT_BLUE: Color = Color::rgb(103, 198, 243);
pub const BOOK_RED: Color = Color::rgb(150, 35, 31);

#[cfg(test)]
mod tests {
    use super::{Color, GRAY, ORANGE};

    #[test]
    fn display_matches_tuple_form() {
        assert_eq!(GRAY.to_string(), "(128, 128, 128)");
    }

    #[test]
    fn accessors_and_rgba_conversion_agree() {
        assert_eq!((ORANGE.red(), ORANGE.green(), ORANGE.blue()), (255, 200, 0));
        assert_eq!(ORANGE.to_rgba_array(), [255, 200, 0, 255]);
        assert_eq!(Color::from_rgba_array([1, 2, 3, 0]), Color::rgb(1, 2, 3));
    }

    #[test]
    fn serializes_as_channel_object() {
        let json = serde_json::to_string(&Color::rgb(9, 90, 166)).expect("serialize");
        assert_eq!(json, r#"{"r":9,"g":90,"b":166}"#);
    }
}
