use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Components scaled to the 0..=1 range used by PDF color operators.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    fn parse_hex(hex: &str) -> Result<Color, String> {
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|e| format!("invalid hex color '#{}': {}", hex, e))
        };
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1].repeat(2))?;
                let g = channel(&hex[1..2].repeat(2))?;
                let b = channel(&hex[2..3].repeat(2))?;
                Ok(Color::rgb(r, g, b))
            }
            6 => Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(format!("hex color '#{}' must have 3 or 6 digits", hex)),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            // Non-ASCII input would make the byte slicing in parse_hex panic.
            if !hex.is_ascii() {
                return Err(format!("invalid hex color '{}'", s));
            }
            return Color::parse_hex(hex);
        }
        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Color::BLACK),
            "white" => Ok(Color::WHITE),
            "red" => Ok(Color::rgb(255, 0, 0)),
            "green" => Ok(Color::rgb(0, 128, 0)),
            "blue" => Ok(Color::rgb(0, 0, 255)),
            "gray" | "grey" => Ok(Color::gray(128)),
            "lightgray" | "lightgrey" => Ok(Color::gray(211)),
            _ => Err(format!("unknown color '{}'", s)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
