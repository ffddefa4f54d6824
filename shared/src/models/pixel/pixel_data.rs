use serde::Serialize;

use crate::{
    address::{error::AddressError, PixelAddrGenerator},
    graphics::palette::Colour,
};

use super::{pixel_balances::PixelBalances, pixel_coord::PixelCoord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixelColourData {
    pub balance: u64,
    /// Where to send funds to vote for this colour.
    pub address: String,
    pub colour: &'static Colour,
}

/// Balances of one pixel with the burn address of every colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixelData {
    pub coord: PixelCoord,
    pub active: &'static Colour,
    pub colours: Vec<PixelColourData>,
}

impl PixelData {
    pub fn new(
        coord: PixelCoord,
        balances: PixelBalances,
        addr_gen: &dyn PixelAddrGenerator,
    ) -> Result<Self, AddressError> {
        let colours = balances
            .colours
            .iter()
            .map(|entry| {
                Ok(PixelColourData {
                    balance: entry.balance,
                    address: addr_gen.for_pixel_colour(coord, entry.colour.id)?,
                    colour: entry.colour,
                })
            })
            .collect::<Result<Vec<_>, AddressError>>()?;

        Ok(Self {
            coord,
            active: balances.active,
            colours,
        })
    }
}
