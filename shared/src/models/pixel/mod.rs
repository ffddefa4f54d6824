pub mod pixel_balances;
pub mod pixel_colour;
pub mod pixel_coord;
pub mod pixel_data;
