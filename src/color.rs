//! Stroke color parsing
//!
//! Colors are given as 6-digit hex codes (`#RRGGBB`, the `#` is optional) and
//! are emitted into content streams as an `RG` (stroke color, DeviceRGB)
//! command.

use std::fmt;
use std::str::FromStr;
use crate::error::{Error, Result};

/// An RGB stroke color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl StrokeColor {
    /// Parse a hex color code like `#FF0000` or `ff0000`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(hex.to_string()));
        }

        let channel = |i: usize| -> Result<f64> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| Error::InvalidColor(hex.to_string()))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// The stroke color command, e.g. `"1.0 0.0 0.0 RG "`
    ///
    /// The trailing space separates the command from the paint operator that
    /// follows it.
    pub fn command(&self) -> String {
        // Debug formatting keeps the shortest round-trip form and always
        // prints a decimal point, so 1 becomes "1.0" rather than "1".
        format!("{:?} {:?} {:?} RG ", self.r, self.g, self.b)
    }
}

impl FromStr for StrokeColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |v: f64| (v * 255.0).round() as u8;
        write!(f, "#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// Convert a hex color code straight into a stroke color command
pub fn hex_to_color_command(hex: &str) -> Result<String> {
    Ok(StrokeColor::from_hex(hex)?.command())
}
