use std::fmt;

use image::{ImageError, RgbaImage};
use uxbind_core::NativeType;

/// Decoded, immutable bitmap.
pub struct Image {
    pixels: RgbaImage,
}

impl Image {
    /// Decode PNG or JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self {
            pixels: decoded.to_rgba8(),
        })
    }

    /// Wrap raw RGBA8 data. None if `data` does not hold `width * height`
    /// pixels.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(|pixels| Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel at (x, y) packed as `0xAARRGGBB`.
    pub fn pixel_argb(&self, x: u32, y: u32) -> Option<u32> {
        let [r, g, b, a] = self.pixels.get_pixel_checked(x, y)?.0;
        Some(u32::from_be_bytes([a, r, g, b]))
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl NativeType for Image {
    const NAME: &'static str = "Image";
}
