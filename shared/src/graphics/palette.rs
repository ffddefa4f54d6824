use std::fmt;

use serde::{Deserialize, Serialize};

use crate::networking::{error::NetworkingError, result::NetworkingResult};

pub const NUM_COLOURS: usize = 16;

/// Index into [`PALETTE`], always below [`NUM_COLOURS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ColourId(u8);

impl ColourId {
    pub fn new(id: u8) -> NetworkingResult<Self> {
        if usize::from(id) < NUM_COLOURS {
            Ok(Self(id))
        } else {
            Err(NetworkingError::InvalidColour(id))
        }
    }

    /// Low four bits of `nibble`; cannot fail.
    pub fn from_nibble(nibble: u8) -> Self {
        Self(nibble & 0x0f)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn colour(self) -> &'static Colour {
        &PALETTE[usize::from(self.0)]
    }

    pub fn all() -> impl Iterator<Item = ColourId> {
        (0..NUM_COLOURS as u8).map(Self)
    }
}

impl TryFrom<u8> for ColourId {
    type Error = NetworkingError;

    fn try_from(id: u8) -> NetworkingResult<Self> {
        Self::new(id)
    }
}

impl From<ColourId> for u8 {
    fn from(id: ColourId) -> u8 {
        id.0
    }
}

impl fmt::Display for ColourId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Colour {
    pub id: ColourId,
    pub name: &'static str,
    pub rgb: u32,
}

impl Colour {
    const fn new(id: u8, rgb: u32, name: &'static str) -> Self {
        Self {
            id: ColourId(id),
            name,
            rgb,
        }
    }

    pub fn red(&self) -> u8 {
        (self.rgb >> 16) as u8
    }

    pub fn green(&self) -> u8 {
        (self.rgb >> 8) as u8
    }

    pub fn blue(&self) -> u8 {
        self.rgb as u8
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), 0xff]
    }

    pub fn css_str(&self) -> String {
        format!("#{:06x}", self.rgb)
    }
}

pub static PALETTE: [Colour; NUM_COLOURS] = [
    Colour::new(0, 0xFFFFFF, "white"),
    Colour::new(1, 0xC8C8C8, "light grey"),
    Colour::new(2, 0x888888, "grey"),
    Colour::new(3, 0x000000, "black"),
    Colour::new(4, 0xFFA7D1, "pink"),
    Colour::new(5, 0xE50000, "red"),
    Colour::new(6, 0xF07010, "orange"),
    Colour::new(7, 0x663311, "brown"),
    Colour::new(8, 0xFFFF00, "yellow"),
    Colour::new(9, 0x02D501, "bright green"),
    Colour::new(10, 0x3CB054, "peercoin green"),
    Colour::new(11, 0x006000, "dark green"),
    Colour::new(12, 0x00D3DD, "cyan"),
    Colour::new(13, 0x0083C7, "blue"),
    Colour::new(14, 0x0000EA, "dark blue"),
    Colour::new(15, 0x820080, "purple"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_indexed_by_id() {
        for (i, colour) in PALETTE.iter().enumerate() {
            assert_eq!(usize::from(colour.id.get()), i);
        }
        assert_eq!(ColourId::all().count(), NUM_COLOURS);
    }

    #[test]
    fn rejects_ids_outside_palette() {
        assert!(ColourId::new(15).is_ok());
        assert!(matches!(
            ColourId::new(16),
            Err(NetworkingError::InvalidColour(16))
        ));
        assert!(ColourId::try_from(255).is_err());
    }

    #[test]
    fn splits_rgb_channels() {
        let orange = ColourId::new(6).unwrap().colour();
        assert_eq!(orange.name, "orange");
        assert_eq!(orange.rgba(), [0xF0, 0x70, 0x10, 0xff]);
        assert_eq!(orange.css_str(), "#f07010");
        assert_eq!(ColourId::new(3).unwrap().colour().css_str(), "#000000");
    }

    #[test]
    fn serde_checks_range() {
        let id: ColourId = serde_json::from_str("9").unwrap();
        assert_eq!(id.get(), 9);
        assert!(serde_json::from_str::<ColourId>("16").is_err());
    }
}
