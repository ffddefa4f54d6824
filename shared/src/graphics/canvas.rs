use image::{Rgba, RgbaImage};
use log::warn;

use crate::{
    models::pixel::{pixel_colour::PixelColour, pixel_coord::PixelCoord},
    networking::{error::NetworkingError, result::NetworkingResult},
};

use super::palette::{Colour, ColourId};

/// Canvas bitmap with two 4-bit colour ids packed per byte.
///
/// Pixels are stored in row-major linear order. The even index of each pair
/// lives in the high nibble, the odd index in the low nibble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    x_len: u32,
    y_len: u32,
    raw: Vec<u8>,
}

impl Canvas {
    /// Bytes needed to hold `x_len * y_len` pixels.
    pub fn packed_len(x_len: u32, y_len: u32) -> usize {
        (x_len as usize * y_len as usize + 1) / 2
    }

    pub fn new(x_len: u32, y_len: u32, raw: Vec<u8>) -> NetworkingResult<Self> {
        let expected = Self::packed_len(x_len, y_len);
        if raw.len() != expected {
            return Err(NetworkingError::UnexpectedLength {
                expected,
                actual: raw.len(),
            });
        }
        Ok(Self { x_len, y_len, raw })
    }

    /// A canvas where every pixel has colour id 0.
    pub fn blank(x_len: u32, y_len: u32) -> Self {
        Self {
            x_len,
            y_len,
            raw: vec![0; Self::packed_len(x_len, y_len)],
        }
    }

    pub fn width(&self) -> u32 {
        self.x_len
    }

    pub fn height(&self) -> u32 {
        self.y_len
    }

    pub fn pixel_count(&self) -> usize {
        self.x_len as usize * self.y_len as usize
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    fn index_of(&self, coord: PixelCoord) -> usize {
        coord.y as usize * self.x_len as usize + coord.x as usize
    }

    /// Overwrites one nibble. Coordinates are trusted to lie inside the canvas.
    pub fn update_pixel(&mut self, pixel: &PixelColour) {
        let index = self.index_of(pixel.coord);
        let id = pixel.colour_id.get();
        let (mask, value) = if index % 2 == 0 {
            (0x0f, id << 4)
        } else {
            (0xf0, id)
        };

        match self.raw.get_mut(index / 2) {
            Some(byte) => *byte = (*byte & mask) | value,
            None => warn!("Ignoring update outside the canvas at {}", pixel.coord),
        }
    }

    pub fn colour_id_at(&self, index: usize) -> Option<ColourId> {
        if index >= self.pixel_count() {
            return None;
        }
        let byte = self.raw[index / 2];
        let nibble = if index % 2 == 0 { byte >> 4 } else { byte };
        Some(ColourId::from_nibble(nibble))
    }

    pub fn colour_at(&self, index: usize) -> Option<&'static Colour> {
        self.colour_id_at(index).map(ColourId::colour)
    }

    pub fn pixel(&self, coord: PixelCoord) -> Option<ColourId> {
        if u32::from(coord.x) >= self.x_len || u32::from(coord.y) >= self.y_len {
            return None;
        }
        self.colour_id_at(self.index_of(coord))
    }

    pub fn colour_array(&self) -> Vec<&'static Colour> {
        (0..self.pixel_count())
            .filter_map(|i| self.colour_at(i))
            .collect()
    }

    /// RGBA bytes, four per pixel, alpha always opaque.
    pub fn image_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixel_count() * 4);
        for colour in self.colour_array() {
            data.extend_from_slice(&colour.rgba());
        }
        data
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.x_len, self.y_len, |x, y| {
            let index = y as usize * self.x_len as usize + x as usize;
            Rgba(self.colour_at(index).map_or([0, 0, 0, 0xff], Colour::rgba))
        })
    }
}
