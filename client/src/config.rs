use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use shared::{
    address::pixel_burn_address::PixelBurnAddrGenerator,
    networking::{error::NetworkingError, messages::DEFAULT_MAX_UPDATES, result::NetworkingResult},
};

/// Largest side length addressable by `u16` coordinates.
const MAX_SIDE_LEN: u32 = u16::MAX as u32 + 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressConfig {
    pub bech32_prefix: String,
    /// Exactly five bytes.
    pub burn_prefix: Vec<u8>,
}

impl AddressConfig {
    pub fn generator(&self) -> NetworkingResult<PixelBurnAddrGenerator> {
        Ok(PixelBurnAddrGenerator::new(
            &self.bech32_prefix,
            &self.burn_prefix,
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub x_len: u32,
    pub y_len: u32,

    pub ws_url: String,
    pub http_url: String,
    pub bitmap_url: String,

    #[serde(default)]
    pub ws_origin: Option<String>,
    #[serde(default)]
    pub http_origin: Option<String>,
    #[serde(default)]
    pub bitmap_origin: Option<String>,

    pub http_rate_limit_ms: u64,
    pub http_timeout_ms: u64,
    pub bitmap_timeout_ms: u64,
    pub reconnect_ms: u64,

    #[serde(default = "default_max_updates")]
    pub max_updates: u64,

    pub address: AddressConfig,
}

fn default_max_updates() -> u64 {
    DEFAULT_MAX_UPDATES
}

impl ClientConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> NetworkingResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NetworkingResult<()> {
        for (name, len) in [("x_len", self.x_len), ("y_len", self.y_len)] {
            if len == 0 || len > MAX_SIDE_LEN {
                return Err(NetworkingError::Configuration(format!(
                    "{name} must be between 1 and {MAX_SIDE_LEN}, got {len}"
                )));
            }
        }

        for (name, url) in [
            ("ws_url", &self.ws_url),
            ("http_url", &self.http_url),
            ("bitmap_url", &self.bitmap_url),
        ] {
            if url.trim().is_empty() {
                return Err(NetworkingError::Configuration(format!(
                    "{name} must not be empty"
                )));
            }
        }

        self.address.generator()?;
        Ok(())
    }

    pub fn bitmap_len(&self) -> usize {
        shared::graphics::canvas::Canvas::packed_len(self.x_len, self.y_len)
    }

    pub fn http_rate_limit(&self) -> Duration {
        Duration::from_millis(self.http_rate_limit_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn bitmap_timeout(&self) -> Duration {
        Duration::from_millis(self.bitmap_timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_ms)
    }
}
