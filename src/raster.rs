//! RGBA image buffers and the PNG rasterizer seam.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{Result, RgisfError};
use crate::types::Rgba;

/// Packed 8-bit RGBA pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaImage {
    /// Fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(RgisfError::GeometryMismatch(format!(
                "{} bytes are not a {}x{} RGBA image",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        Some(Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// Out-of-range coordinates are ignored
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Per-channel mean of same-sized images
    pub fn average(images: &[RgbaImage]) -> Result<RgbaImage> {
        let first = images.first().ok_or(RgisfError::EmptyRasterSource)?;
        if let Some(odd) = images
            .iter()
            .find(|i| i.width != first.width || i.height != first.height)
        {
            return Err(RgisfError::GeometryMismatch(format!(
                "cannot average a {}x{} image with a {}x{} image",
                first.width, first.height, odd.width, odd.height
            )));
        }
        if images.len() == 1 {
            return Ok(first.clone());
        }

        let n = images.len() as f64;
        let pixels = (0..first.pixels.len())
            .map(|i| {
                let sum: u32 = images.iter().map(|img| u32::from(img.pixels[i])).sum();
                (f64::from(sum) / n).round() as u8
            })
            .collect();
        RgbaImage::from_pixels(first.width, first.height, pixels)
    }
}

/// Turns an RGBA buffer into encoded image bytes
pub trait Rasterizer {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>>;

    /// File extension of the produced images
    fn extension(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PngRasterizer;

impl Rasterizer for PngRasterizer {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer).write_image(
            image.pixels(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(buffer)
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
