use log::debug;

use crate::models::pixel::pixel_colour::{PixelColour, PIXEL_COLOUR_LEN};

use super::{deserialiser::Deserialiser, error::NetworkingError, result::NetworkingResult};

pub const RESPONSE_UPDATE_COLOURS: u8 = 0;
pub const DEFAULT_MAX_UPDATES: u64 = 1000 * 1000;

/// A decoded frame from the live update stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    UpdateColours(Vec<PixelColour>),
    /// Message ids this client does not know; skipped by the session.
    Unknown(u8),
}

impl ServerMessage {
    /// Decodes one binary frame. The whole batch decodes or nothing does.
    ///
    /// Zero-length batches are accepted.
    pub fn decode(bytes: &[u8], max_updates: u64) -> NetworkingResult<Self> {
        let mut ds = Deserialiser::new(bytes);

        let message_id = ds.uint8()?;
        if message_id != RESPONSE_UPDATE_COLOURS {
            debug!("Skipping unknown message id {}", message_id);
            return Ok(Self::Unknown(message_id));
        }

        let count = ds.varint()?;
        if count > max_updates {
            return Err(NetworkingError::TooManyUpdates {
                count,
                max: max_updates,
            });
        }

        let capacity = usize::try_from(count)
            .unwrap_or(usize::MAX)
            .min(ds.remaining() / PIXEL_COLOUR_LEN);
        let mut colours = Vec::with_capacity(capacity);
        for _ in 0..count {
            colours.push(PixelColour::deserialise(&mut ds)?);
        }

        Ok(Self::UpdateColours(colours))
    }
}
