//! RGB colors and parsing of player color tokens

use std::fmt;

/// Opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
    pub const RED: Self = Self::new(0xFF, 0x00, 0x00);
    pub const BLUE: Self = Self::new(0x00, 0x00, 0xFF);
    pub const PURPLE: Self = Self::new(0x80, 0x00, 0x80);
    pub const YELLOW: Self = Self::new(0xFF, 0xFF, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Parse a named color or a `#RRGGBB` / `#RGB` hex string
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(hex) = token.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let named = match token.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "blue" => Self::BLUE,
            "green" => Self::new(0x00, 0x80, 0x00),
            "yellow" => Self::YELLOW,
            "purple" => Self::PURPLE,
            "orange" => Self::new(0xFF, 0xA5, 0x00),
            "cyan" => Self::new(0x00, 0xFF, 0xFF),
            "magenta" => Self::new(0xFF, 0x00, 0xFF),
            "gray" | "grey" => Self::gray(0x80),
            _ => return None,
        };
        Some(named)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
