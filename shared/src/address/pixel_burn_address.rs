use crate::{
    graphics::palette::ColourId,
    models::pixel::{pixel_colour::PixelColour, pixel_coord::PixelCoord},
};

use super::{burn_address::BurnAddrEncoder, error::AddressError, PixelAddrGenerator};

/// Burn addresses carrying `(x: u16, y: u16, colour id: u8)` as application data.
#[derive(Debug, Clone)]
pub struct PixelBurnAddrGenerator {
    encoder: BurnAddrEncoder,
}

impl PixelBurnAddrGenerator {
    pub fn new(hrp: &str, burn_prefix: &[u8]) -> Result<Self, AddressError> {
        Ok(Self {
            encoder: BurnAddrEncoder::new(hrp, burn_prefix)?,
        })
    }
}

impl PixelAddrGenerator for PixelBurnAddrGenerator {
    fn for_pixel_colour(
        &self,
        coord: PixelCoord,
        colour_id: ColourId,
    ) -> Result<String, AddressError> {
        let data = PixelColour::new(coord, colour_id).to_bytes();
        self.encoder.with_data(&data)
    }
}
