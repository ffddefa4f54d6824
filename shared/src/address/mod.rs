pub mod burn_address;
pub mod error;
pub mod pixel_burn_address;

use crate::{graphics::palette::ColourId, models::pixel::pixel_coord::PixelCoord};

use self::error::AddressError;

/// Produces the address that votes for `colour_id` at `coord`.
///
/// Implementations are pure: identical inputs always give the same address.
pub trait PixelAddrGenerator: Send + Sync {
    fn for_pixel_colour(&self, coord: PixelCoord, colour_id: ColourId)
        -> Result<String, AddressError>;
}
