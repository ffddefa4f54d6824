use clap::Parser;
use client::config::ClientConfig;
use log::debug;
use shared::{
    address::{pixel_burn_address::PixelBurnAddrGenerator, PixelAddrGenerator},
    graphics::palette::ColourId,
    models::pixel::pixel_coord::PixelCoord,
    networking::{error::NetworkingError, result::NetworkingResult},
};

use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct AddressCommand {
    pub x: u16,

    pub y: u16,

    /// Colour id, 0-15
    pub colour: u8,

    /// Take the prefixes from this client configuration
    #[arg(short, long, env = "CANVAS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bech32 human-readable prefix
    #[arg(long, requires = "burn_prefix")]
    pub hrp: Option<String>,

    /// Five byte burn prefix as hex, e.g. c766cec1ef
    #[arg(long, requires = "hrp")]
    pub burn_prefix: Option<String>,
}

pub fn run(args: AddressCommand) -> NetworkingResult<()> {
    let generator = match (&args.hrp, &args.burn_prefix, &args.config) {
        (Some(hrp), Some(burn_prefix), _) => {
            PixelBurnAddrGenerator::new(hrp, &parse_hex(burn_prefix)?)?
        }
        (_, _, Some(path)) => ClientConfig::from_file(path)?.address.generator()?,
        _ => {
            return Err(NetworkingError::Configuration(
                "either --config or --hrp with --burn-prefix is required".into(),
            ))
        }
    };

    let coord = PixelCoord::new(args.x, args.y);
    let colour_id = ColourId::new(args.colour)?;
    debug!("Deriving address for {} in {}", coord, colour_id.colour().name);

    println!("{}", generator.for_pixel_colour(coord, colour_id)?);
    Ok(())
}

fn parse_hex(hex: &str) -> NetworkingResult<Vec<u8>> {
    let invalid = || NetworkingError::Configuration(format!("invalid hex string {hex:?}"));

    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return Err(invalid());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid()))
        .collect()
}
