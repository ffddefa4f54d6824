use serde::{Deserialize, Serialize};

use crate::{
    graphics::palette::{Colour, ColourId},
    networking::{deserialiser::Deserialiser, result::NetworkingResult},
};

use super::pixel_coord::PixelCoord;

/// Encoded size of one record: `u16 x, u16 y, u8 colour id`.
pub const PIXEL_COLOUR_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelColour {
    pub coord: PixelCoord,
    pub colour_id: ColourId,
}

impl PixelColour {
    pub fn new(coord: PixelCoord, colour_id: ColourId) -> Self {
        Self { coord, colour_id }
    }

    pub fn deserialise(ds: &mut Deserialiser<'_>) -> NetworkingResult<Self> {
        let x = ds.uint16()?;
        let y = ds.uint16()?;
        let colour_id = ColourId::new(ds.uint8()?)?;
        Ok(Self::new(PixelCoord::new(x, y), colour_id))
    }

    pub fn to_bytes(&self) -> [u8; PIXEL_COLOUR_LEN] {
        let [x0, x1] = self.coord.x.to_be_bytes();
        let [y0, y1] = self.coord.y.to_be_bytes();
        [x0, x1, y0, y1, self.colour_id.get()]
    }

    pub fn colour(&self) -> &'static Colour {
        self.colour_id.colour()
    }
}
