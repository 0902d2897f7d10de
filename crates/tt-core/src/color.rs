use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// An RGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> CoreResult<Self> {
        let malformed = || CoreError::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(malformed());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| malformed())
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_channels() {
        let color = Color::from_hex("#010203").unwrap();
        assert_eq!(color.r, 1.0 / 255.0);
        assert_eq!(color.g, 2.0 / 255.0);
        assert_eq!(color.b, 3.0 / 255.0);
    }

    #[test]
    fn from_hex_without_hash() {
        let color = Color::from_hex("ff0000").unwrap();
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(Color::from_hex("not_a_color").is_err());
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }
}
