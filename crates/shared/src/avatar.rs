use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parses the `#RRGGBB` form the backend uses for avatar colors.
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let malformed = || ColorParseError::Malformed(value.to_string());
        let digits = value.strip_prefix('#').ok_or_else(malformed)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(malformed());
        }
        let component =
            |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| malformed());
        Ok(Self {
            r: component(0)?,
            g: component(2)?,
            b: component(4)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// The three-rectangle avatar identity: bottom square plus left/right
/// half-squares, composed by the rendering layer into a roundel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarColors {
    pub bottom: Rgb,
    pub left: Rgb,
    pub right: Rgb,
}

impl AvatarColors {
    pub fn from_hex(bottom: &str, left: &str, right: &str) -> Result<Self, ColorParseError> {
        Ok(Self {
            bottom: Rgb::from_hex(bottom)?,
            left: Rgb::from_hex(left)?,
            right: Rgb::from_hex(right)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uppercase_and_lowercase_hex() {
        assert_eq!(
            Rgb::from_hex("#FF1102").expect("parse"),
            Rgb {
                r: 0xFF,
                g: 0x11,
                b: 0x02
            }
        );
        assert_eq!(
            Rgb::from_hex("#01f0f1").expect("parse"),
            Rgb {
                r: 0x01,
                g: 0xF0,
                b: 0xF1
            }
        );
    }

    #[test]
    fn round_trips_through_hex() {
        let color = Rgb::from_hex("#FFF001").expect("parse");
        assert_eq!(color.to_hex(), "#FFF001");
    }

    #[test]
    fn rejects_values_outside_rrggbb_form() {
        for bad in ["FFF001", "#FFF", "#GGGGGG", "#FFF0011", "", "#ффф001"] {
            assert_eq!(
                Rgb::from_hex(bad),
                Err(ColorParseError::Malformed(bad.to_string())),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn builds_the_full_triple_from_hex() {
        let colors = AvatarColors::from_hex("#FF1102", "#FFF001", "#01F0F1").expect("parse");
        assert_eq!(colors.bottom.to_hex(), "#FF1102");
        assert_eq!(colors.left.to_hex(), "#FFF001");
        assert_eq!(colors.right.to_hex(), "#01F0F1");
    }
}
