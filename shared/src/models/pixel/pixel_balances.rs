use serde::Serialize;

use crate::{
    graphics::palette::{Colour, ColourId, NUM_COLOURS, PALETTE},
    networking::{deserialiser::Deserialiser, result::NetworkingResult},
};

/// Response size of a balance query: active colour id then one `u64` per colour.
pub const PIXEL_BALANCES_LEN: usize = 8 * NUM_COLOURS + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelColourBalance {
    pub balance: u64,
    pub colour: &'static Colour,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixelBalances {
    pub active: &'static Colour,
    /// Ordered by colour id.
    pub colours: [PixelColourBalance; NUM_COLOURS],
}

impl PixelBalances {
    pub fn deserialise(ds: &mut Deserialiser<'_>) -> NetworkingResult<Self> {
        let active = ColourId::new(ds.uint8()?)?.colour();

        let mut balances = [0u64; NUM_COLOURS];
        for balance in balances.iter_mut() {
            *balance = ds.uint64()?;
        }

        let colours = std::array::from_fn(|i| PixelColourBalance {
            balance: balances[i],
            colour: &PALETTE[i],
        });
        Ok(Self { active, colours })
    }
}
