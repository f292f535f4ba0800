use std::path::Path;

use anyhow::Context as _;
use image::{Rgb, RgbImage};

use crate::foundation::error::{LayoutError, LayoutResult};
use crate::geometry::coord::{CoordF, CoordI};
use crate::picture::interpolate::{Interpolation, sample};

/// Number of color channels carried by a [`Picture`].
pub const CHANNELS: usize = 3;

/// RGB8 pixel value.
pub type Pixel = [u8; CHANNELS];

/// A decoded frame: an owned, tightly packed, row-major RGB8 buffer.
///
/// Freshly created pictures are black; remapping relies on that to encode "no sample".
#[derive(Clone, Debug, PartialEq)]
pub struct Picture {
    img: RgbImage,
}

impl Picture {
    /// Black picture of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbImage::new(width, height),
        }
    }

    /// Picture filled with one color.
    pub fn filled(width: u32, height: u32, color: Pixel) -> Self {
        Self {
            img: RgbImage::from_pixel(width, height, Rgb(color)),
        }
    }

    /// Wrap raw RGB8 bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> LayoutResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(LayoutError::validation(format!(
                "picture buffer has {} bytes, expected {expected} for {width}x{height} rgb8",
                data.len()
            )));
        }
        RgbImage::from_raw(width, height, data)
            .map(|img| Self { img })
            .ok_or_else(|| LayoutError::validation("picture buffer does not match its dimensions"))
    }

    /// Decode an image file (any format supported by `image`) into RGB8.
    pub fn open(path: &Path) -> LayoutResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("decode picture '{}'", path.display()))?
            .into_rgb8();
        Ok(Self { img })
    }

    /// Encode the picture to `path`; the format follows the file extension.
    pub fn save(&self, path: &Path) -> LayoutResult<()> {
        self.img
            .save(path)
            .with_context(|| format!("write picture '{}'", path.display()))?;
        Ok(())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// `true` when `pixel` addresses a stored pixel.
    pub fn contains(&self, pixel: CoordI) -> bool {
        pixel.x >= 0
            && pixel.y >= 0
            && (pixel.x as u32) < self.width()
            && (pixel.y as u32) < self.height()
    }

    /// Pixel value at an in-bounds lattice point.
    ///
    /// # Panics
    ///
    /// Panics when `pixel` is outside the picture.
    pub fn get(&self, pixel: CoordI) -> Pixel {
        self.img.get_pixel(pixel.x as u32, pixel.y as u32).0
    }

    /// Overwrite the pixel at an in-bounds lattice point.
    ///
    /// # Panics
    ///
    /// Panics when `pixel` is outside the picture.
    pub fn set_value(&mut self, pixel: CoordI, value: Pixel) {
        self.img.put_pixel(pixel.x as u32, pixel.y as u32, Rgb(value));
    }

    /// Interpolated value at a sub-pixel coordinate.
    ///
    /// The coordinate must lie in `[0, width) x [0, height)`; callers bounds-check first.
    pub fn get_inter_pixel(&self, coord: CoordF, interp: Interpolation) -> Pixel {
        sample(self, coord, interp)
    }

    /// Borrow the raw RGB8 bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.img.as_raw()
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.img
    }

    /// Borrow the underlying `image` buffer.
    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.img
    }

    /// Unwrap into the underlying `image` buffer.
    pub fn into_rgb_image(self) -> RgbImage {
        self.img
    }

    pub(crate) fn ensure_same_size(&self, other: &Picture, what: &str) -> LayoutResult<()> {
        if self.width() != other.width() || self.height() != other.height() {
            return Err(LayoutError::metric(format!(
                "{what} needs pictures of equal size: {}x{} vs {}x{}",
                self.width(),
                self.height(),
                other.width(),
                other.height()
            )));
        }
        if self.width() == 0 || self.height() == 0 {
            return Err(LayoutError::metric(format!("{what} of an empty picture")));
        }
        Ok(())
    }
}

impl From<RgbImage> for Picture {
    fn from(img: RgbImage) -> Self {
        Self { img }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/picture/buffer.rs"]
mod tests;
