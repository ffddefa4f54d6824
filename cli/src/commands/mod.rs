use std::path::PathBuf;

use clap::{Args, Subcommand};
use client::config::ClientConfig;
use shared::networking::result::NetworkingResult;

use self::{address::AddressCommand, pixel::PixelCommand, watch::WatchCommand};

pub mod address;
pub mod pixel;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 🖼️ Watch the canvas
    ///
    /// Bootstrap the canvas, follow live updates and reconnect on failure.
    Watch(WatchCommand),

    /// 🔎 Pixel balances
    ///
    /// Print the balance and burn address of every colour for one pixel.
    Pixel(PixelCommand),

    /// 🔥 Burn address
    ///
    /// Derive the address that votes for a colour, without contacting a server.
    Address(AddressCommand),
}

/// 📄 Client configuration
///
/// A JSON config file, with individual fields overridable from the command line.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path of the JSON client configuration
    #[arg(short, long, env = "CANVAS_CONFIG", value_name = "FILE")]
    pub config: PathBuf,

    /// Override the websocket URL
    #[arg(long, env = "CANVAS_WS_URL")]
    pub ws_url: Option<String>,

    /// Override the HTTP API URL
    #[arg(long, env = "CANVAS_HTTP_URL")]
    pub http_url: Option<String>,

    /// Override the bitmap URL
    #[arg(long, env = "CANVAS_BITMAP_URL")]
    pub bitmap_url: Option<String>,

    /// Override the reconnect delay in milliseconds
    #[arg(long)]
    pub reconnect_ms: Option<u64>,
}

impl ConfigArgs {
    pub fn load(&self) -> NetworkingResult<ClientConfig> {
        let mut config = ClientConfig::from_file(&self.config)?;

        if let Some(ws_url) = &self.ws_url {
            config.ws_url = ws_url.to_owned();
        }
        if let Some(http_url) = &self.http_url {
            config.http_url = http_url.to_owned();
        }
        if let Some(bitmap_url) = &self.bitmap_url {
            config.bitmap_url = bitmap_url.to_owned();
        }
        if let Some(reconnect_ms) = self.reconnect_ms {
            config.reconnect_ms = reconnect_ms;
        }

        config.validate()?;
        Ok(config)
    }
}
