use clap::Parser;
use client::{listener::NoopListener, CanvasClient};
use shared::{models::pixel::pixel_coord::PixelCoord, networking::result::NetworkingResult};

use super::ConfigArgs;

#[derive(Parser, Debug)]
pub struct PixelCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    pub x: u16,

    pub y: u16,
}

pub async fn run(args: PixelCommand) -> NetworkingResult<()> {
    let config = args.config.load()?;

    // Point queries need no live connection, so the client is never started
    let client = CanvasClient::new(config, NoopListener)?;
    let data = client.pixel(PixelCoord::new(args.x, args.y)).await?;

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
