#![forbid(unsafe_code)]

//! RGBA colors.
//!
//! Colors parse from and print as hex strings (`#rrggbb` or `#rrggbbaa`),
//! which is also their serialized form in harness config files.

use std::fmt;
use std::str::FromStr;

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    /// Create a color from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Pack as `0xRRGGBBAA`.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

/// Error returned when a color string is not `#rrggbb` / `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    input: String,
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid color {:?}: expected #rrggbb or #rrggbbaa",
            self.input
        )
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError {
            input: s.to_string(),
        };
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_opaque() {
        assert_eq!("#ff0000".parse::<Rgba>().unwrap(), Rgba::RED);
        assert_eq!("#0000FF".parse::<Rgba>().unwrap(), Rgba::BLUE);
    }

    #[test]
    fn parse_with_alpha() {
        assert_eq!(
            "#11223344".parse::<Rgba>().unwrap(),
            Rgba::new(0x11, 0x22, 0x33, 0x44)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["ff0000", "#ff00", "#gg0000", "#ff00001", "", "#ffé000"] {
            assert!(bad.parse::<Rgba>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn display_omits_opaque_alpha() {
        assert_eq!(Rgba::WHITE.to_string(), "#ffffff");
        assert_eq!(Rgba::TRANSPARENT.to_string(), "#00000000");
    }

    #[test]
    fn display_parses_back() {
        let c = Rgba::new(1, 2, 3, 4);
        assert_eq!(c.to_string().parse::<Rgba>().unwrap(), c);
    }

    #[test]
    fn packs_big_endian() {
        assert_eq!(Rgba::RED.to_u32(), 0xff0000ff);
    }

    #[test]
    fn parse_error_message_names_input() {
        let err = "nope".parse::<Rgba>().unwrap_err();
        assert!(err.to_string().contains("\"nope\""));
    }
}
