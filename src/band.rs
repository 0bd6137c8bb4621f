use byteorder::WriteBytesExt;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};

use crate::codec::{read_attributes, read_renderer, read_value, value_at, write_attributes, write_renderer, write_value};
use crate::constants::{BAND_FLAGS_OFFSET, BAND_FLAG_ATTRIBUTES, BAND_META_SIZE, TILE_SIZE};
use crate::error::{Result, RgisfError};
use crate::raster::RgbaImage;
use crate::tile::TileCoord;
use crate::types::{AttributeRecord, PixelType, PixelWindow, RampBlend, RasterMetadata, Renderer, Rgba};

/// Value range of a band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandStats {
    pub min: f64,
    pub max: f64,
}

/// Fully materialized band values, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMatrix {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl PixelMatrix {
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != width * height {
            return Err(RgisfError::MalformedContainer(format!(
                "{} values cannot fill a {}x{} matrix",
                values.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y * self.width + x).copied()
    }

    /// Min and max, ignoring NaN. An all-NaN matrix reports `0..0`.
    pub fn stats(&self) -> BandStats {
        let mut stats: Option<BandStats> = None;
        for &v in self.values.iter().filter(|v| !v.is_nan()) {
            stats = Some(match stats {
                None => BandStats { min: v, max: v },
                Some(s) => BandStats {
                    min: s.min.min(v),
                    max: s.max.max(v),
                },
            });
        }
        stats.unwrap_or(BandStats { min: 0.0, max: 0.0 })
    }

    /// Copy out a sub-rectangle
    pub fn window(&self, window: &PixelWindow) -> Result<PixelMatrix> {
        if window.is_empty() || window.col_end() > self.width || window.row_end() > self.height {
            return Err(RgisfError::InvalidRegion(format!(
                "window {:?} does not fit a {}x{} band",
                window, self.width, self.height
            )));
        }
        let mut values = Vec::with_capacity(window.len());
        for y in window.row..window.row_end() {
            let start = y * self.width + window.col;
            values.extend_from_slice(&self.values[start..start + window.cols]);
        }
        PixelMatrix::new(window.cols, window.rows, values)
    }
}

/// One raster layer: value range, renderer, optional attributes and values
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    stats: BandStats,
    renderer: Renderer,
    attributes: Option<AttributeRecord>,
    matrix: PixelMatrix,
    ramp_blend: RampBlend,
}

impl Band {
    /// Build a band from values already held in memory; min/max come from the values
    pub fn new(matrix: PixelMatrix, renderer: Renderer, attributes: Option<AttributeRecord>) -> Self {
        Self {
            stats: matrix.stats(),
            renderer,
            attributes,
            matrix,
            ramp_blend: RampBlend::default(),
        }
    }

    /// Decode one band block starting at the cursor position.
    ///
    /// `meta` describes the stored matrix. With a `window` only that part is
    /// materialized and min/max are taken from it; the cursor still ends
    /// after the whole stored matrix.
    pub fn decode(cursor: &mut Cursor<&[u8]>, meta: &RasterMetadata, window: Option<&PixelWindow>) -> Result<Self> {
        let pixel_type = meta.pixel_type;
        let data: &[u8] = *cursor.get_ref();
        let start = cursor.position() as usize;

        let region = data.get(start..start + BAND_META_SIZE).ok_or_else(|| {
            RgisfError::MalformedContainer(format!("band metadata at byte {} is truncated", start))
        })?;
        let stored = BandStats {
            min: value_at(region, 0, pixel_type)?,
            max: value_at(region, pixel_type.size(), pixel_type)?,
        };
        let flags = region[BAND_FLAGS_OFFSET];
        cursor.set_position((start + BAND_META_SIZE) as u64);

        let renderer = read_renderer(cursor, pixel_type)?;
        let attributes = if flags & BAND_FLAG_ATTRIBUTES != 0 {
            Some(read_attributes(cursor)?)
        } else {
            None
        };

        let matrix_start = cursor.position() as usize;
        let matrix_len = meta.pixel_count() * pixel_type.size();
        let matrix_bytes = data.get(matrix_start..matrix_start + matrix_len).ok_or_else(|| {
            RgisfError::MalformedContainer(format!(
                "band matrix needs {} bytes at byte {}, buffer has {}",
                matrix_len,
                matrix_start,
                data.len()
            ))
        })?;

        let (matrix, stats) = match window {
            None => {
                let mut reader = matrix_bytes;
                let mut values = Vec::with_capacity(meta.pixel_count());
                for _ in 0..meta.pixel_count() {
                    values.push(read_value(&mut reader, pixel_type).map_err(RgisfError::truncated("band matrix"))?);
                }
                let matrix = PixelMatrix::new(meta.width as usize, meta.height as usize, values)?;
                (matrix, stored)
            }
            Some(w) => {
                let matrix = read_window(matrix_bytes, meta, w)?;
                let stats = matrix.stats();
                (matrix, stats)
            }
        };
        cursor.set_position((matrix_start + matrix_len) as u64);

        Ok(Self {
            stats,
            renderer,
            attributes,
            matrix,
            ramp_blend: RampBlend::default(),
        })
    }

    /// Serialize metadata, renderer, attributes and matrix
    pub fn encode<W: Write>(&self, writer: &mut W, pixel_type: PixelType) -> Result<()> {
        let stats = self.matrix.stats();
        let mut region = Vec::with_capacity(BAND_META_SIZE);
        write_value(&mut region, pixel_type, stats.min)?;
        write_value(&mut region, pixel_type, stats.max)?;
        region.resize(BAND_FLAGS_OFFSET, 0);
        region.write_u8(if self.attributes.is_some() { BAND_FLAG_ATTRIBUTES } else { 0 })?;
        region.resize(BAND_META_SIZE, 0);
        writer.write_all(&region)?;

        write_renderer(writer, &self.renderer, pixel_type)?;
        if let Some(attributes) = &self.attributes {
            write_attributes(writer, attributes)?;
        }

        let mut body = Vec::with_capacity(self.matrix.values.len() * pixel_type.size());
        for &v in &self.matrix.values {
            write_value(&mut body, pixel_type, v)?;
        }
        writer.write_all(&body)?;
        Ok(())
    }

    pub fn to_buffer(&self, pixel_type: PixelType) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf, pixel_type)?;
        Ok(buf)
    }

    /// The part of this band inside `window`, with its own min/max
    pub fn window(&self, window: &PixelWindow) -> Result<Band> {
        let matrix = self.matrix.window(window)?;
        Ok(Band {
            stats: matrix.stats(),
            renderer: self.renderer.clone(),
            attributes: self.attributes.clone(),
            matrix,
            ramp_blend: self.ramp_blend,
        })
    }

    /// Serialized block of the part of this band inside `window`
    pub fn region_buffer(&self, window: &PixelWindow, pixel_type: PixelType) -> Result<Vec<u8>> {
        self.window(window)?.to_buffer(pixel_type)
    }

    /// Color of a stored value under this band's renderer
    pub fn value_to_rgba(&self, value: f64) -> Rgba {
        if value.is_nan() {
            return Rgba::TRANSPARENT;
        }
        match &self.renderer {
            Renderer::Stretched { color_ramp } => self.ramp_color(color_ramp, value),
            Renderer::Classified { classes } => classes
                .iter()
                .find(|c| c.contains(value))
                .map(|c| c.color)
                .unwrap_or(Rgba::TRANSPARENT),
        }
    }

    fn ramp_color(&self, ramp: &[Rgba], value: f64) -> Rgba {
        let n = ramp.len();
        match n {
            0 => return Rgba::TRANSPARENT,
            1 => return ramp[0],
            _ => {}
        }

        let range = self.stats.max - self.stats.min;
        let ratio = if range > 0.0 {
            ((value - self.stats.min) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let segment = 1.0 / (n - 1) as f64;
        let index = ((ratio / segment).floor() as usize).min(n - 1);
        let start = ramp[index];
        let end = ramp.get(index + 1).copied().unwrap_or(start);
        let local = ratio - segment * index as f64;

        // (start weight, end weight)
        let (ws, we) = match self.ramp_blend {
            RampBlend::StartWeighted => (local, 1.0 - local),
            RampBlend::Linear => {
                let t = (local / segment).clamp(0.0, 1.0);
                (1.0 - t, t)
            }
        };
        let mix = |s: u8, e: u8| (f64::from(s) * ws + f64::from(e) * we).round().clamp(0.0, 255.0) as u8;
        Rgba::new(mix(start.r, end.r), mix(start.g, end.g), mix(start.b, end.b), mix(start.a, end.a))
    }

    /// Every cell mapped through the renderer
    pub fn to_rgba(&self) -> Result<RgbaImage> {
        let mut pixels = Vec::with_capacity(self.matrix.values.len() * 4);
        for &v in &self.matrix.values {
            pixels.extend_from_slice(&self.value_to_rgba(v).to_array());
        }
        RgbaImage::from_pixels(self.matrix.width as u32, self.matrix.height as u32, pixels)
    }

    /// Sample this band into a 256x256 slippy tile, nearest neighbour.
    /// `meta` is the geometry of the container holding the band.
    pub fn tile_image(&self, coord: &TileCoord, meta: &RasterMetadata) -> RgbaImage {
        let mut image = RgbaImage::new(TILE_SIZE as u32, TILE_SIZE as u32);
        let tile = coord.bbox();
        let step_lon = (tile.east - tile.west) / TILE_SIZE as f64;
        let step_lat = (tile.north - tile.south) / TILE_SIZE as f64;

        for py in 0..TILE_SIZE {
            let lat = tile.north - step_lat * py as f64;
            for px in 0..TILE_SIZE {
                let lon = tile.west + step_lon * px as f64;
                if !meta.bbox.contains(lon, lat) {
                    continue;
                }
                let Some((col, row)) = meta.pixel_index(lon, lat) else {
                    continue;
                };
                if let Some(v) = self.matrix.get(col, row) {
                    image.put_pixel(px as u32, py as u32, self.value_to_rgba(v));
                }
            }
        }
        image
    }

    pub fn stats(&self) -> BandStats {
        self.stats
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn set_renderer(&mut self, renderer: Renderer) {
        self.renderer = renderer;
    }

    pub fn attributes(&self) -> Option<&AttributeRecord> {
        self.attributes.as_ref()
    }

    pub fn set_attributes(&mut self, attributes: AttributeRecord) {
        self.attributes = Some(attributes);
    }

    pub fn ramp_blend(&self) -> RampBlend {
        self.ramp_blend
    }

    pub fn set_ramp_blend(&mut self, blend: RampBlend) {
        self.ramp_blend = blend;
    }

    pub fn matrix(&self) -> &PixelMatrix {
        &self.matrix
    }

    pub fn value(&self, x: usize, y: usize) -> Option<f64> {
        self.matrix.get(x, y)
    }
}

/// Read only the cells of `window` from a stored matrix
fn read_window(bytes: &[u8], meta: &RasterMetadata, window: &PixelWindow) -> Result<PixelMatrix> {
    let (width, height) = (meta.width as usize, meta.height as usize);
    if window.is_empty() || window.col_end() > width || window.row_end() > height {
        return Err(RgisfError::InvalidRegion(format!(
            "window {:?} does not fit a {}x{} band",
            window, width, height
        )));
    }
    let size = meta.pixel_type.size();
    let mut values = Vec::with_capacity(window.len());
    for y in window.row..window.row_end() {
        for x in window.col..window.col_end() {
            values.push(value_at(bytes, size * (y * width + x), meta.pixel_type)?);
        }
    }
    PixelMatrix::new(window.cols, window.rows, values)
}
