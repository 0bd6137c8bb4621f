//! GeoTIFF decoding into per-band value arrays plus georeferencing.

use std::io::{Cursor, Read, Seek};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use crate::error::{Result, RgisfError};
use crate::types::{BoundingBox, PixelType, Resolution};

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;

const GEOGRAPHIC_TYPE_KEY: u32 = 2048;
const PROJECTED_CS_TYPE_KEY: u32 = 3072;

/// Affine placement of a north-up raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    /// Negative for north-up rasters
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn bbox(&self, width: u32, height: u32) -> BoundingBox {
        BoundingBox {
            x1: self.origin_x as f32,
            y1: self.origin_y as f32,
            x2: (self.origin_x + f64::from(width) * self.pixel_width) as f32,
            y2: (self.origin_y + f64::from(height) * self.pixel_height) as f32,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            x: self.pixel_width as f32,
            y: self.pixel_height as f32,
        }
    }

    fn from_tags(scale: Option<Vec<f64>>, tiepoint: Option<Vec<f64>>, matrix: Option<Vec<f64>>) -> Result<Self> {
        if let Some(m) = matrix.filter(|m| m.len() >= 16) {
            return Ok(Self {
                origin_x: m[3],
                origin_y: m[7],
                pixel_width: m[0],
                pixel_height: m[5],
            });
        }
        match (scale, tiepoint) {
            (Some(s), Some(t)) if s.len() >= 2 && t.len() >= 6 => Ok(Self {
                origin_x: t[3] - t[0] * s[0],
                origin_y: t[4] + t[1] * s[1],
                pixel_width: s[0],
                pixel_height: -s[1],
            }),
            _ => Err(RgisfError::InvalidGeoTiff(
                "missing ModelPixelScale/ModelTiepoint or ModelTransformation tags".to_string(),
            )),
        }
    }
}

/// Decoded raster handed over by a GeoTIFF reader
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTiffRaster {
    pub width: u32,
    pub height: u32,
    pub transform: GeoTransform,
    /// EPSG code from the GeoKey directory, when present
    pub crs: Option<u16>,
    /// Pixel type closest to the stored samples
    pub sample_type: PixelType,
    /// One row-major array per band
    pub bands: Vec<Vec<f64>>,
}

/// Decode the first image of a GeoTIFF. Interleaved samples become separate bands.
pub fn read_geotiff(data: &[u8]) -> Result<GeoTiffRaster> {
    let mut decoder = Decoder::new(Cursor::new(data))?;
    let (width, height) = decoder.dimensions()?;

    let scale = f64_tag(&mut decoder, MODEL_PIXEL_SCALE)?;
    let tiepoint = f64_tag(&mut decoder, MODEL_TIEPOINT)?;
    let matrix = f64_tag(&mut decoder, MODEL_TRANSFORMATION)?;
    let transform = GeoTransform::from_tags(scale, tiepoint, matrix)?;

    let crs = match decoder.find_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY))? {
        Some(v) => crs_from_geokeys(&v.into_u32_vec()?),
        None => None,
    };

    let (sample_type, samples): (PixelType, Vec<f64>) = match decoder.read_image()? {
        DecodingResult::U8(v) => (PixelType::UInt8, v.into_iter().map(f64::from).collect()),
        DecodingResult::U16(v) => (PixelType::UInt16, v.into_iter().map(f64::from).collect()),
        DecodingResult::U32(v) => (PixelType::UInt32, v.into_iter().map(f64::from).collect()),
        DecodingResult::I8(v) => (PixelType::Int8, v.into_iter().map(f64::from).collect()),
        DecodingResult::I16(v) => (PixelType::Int16, v.into_iter().map(f64::from).collect()),
        DecodingResult::I32(v) => (PixelType::Int32, v.into_iter().map(f64::from).collect()),
        DecodingResult::F32(v) => (PixelType::Float32, v.into_iter().map(f64::from).collect()),
        DecodingResult::F64(v) => (PixelType::Float64, v),
        DecodingResult::U64(v) => (PixelType::Float64, v.into_iter().map(|x| x as f64).collect()),
        DecodingResult::I64(v) => (PixelType::Float64, v.into_iter().map(|x| x as f64).collect()),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(RgisfError::InvalidGeoTiff(
                "unsupported sample format".to_string(),
            ))
        }
    };

    let pixels = width as usize * height as usize;
    if pixels == 0 || samples.len() % pixels != 0 {
        return Err(RgisfError::InvalidGeoTiff(format!(
            "{} samples do not tile a {}x{} image",
            samples.len(),
            width,
            height
        )));
    }
    let band_count = samples.len() / pixels;
    let bands = (0..band_count)
        .map(|b| samples.iter().skip(b).step_by(band_count).copied().collect())
        .collect();

    Ok(GeoTiffRaster {
        width,
        height,
        transform,
        crs,
        sample_type,
        bands,
    })
}

fn f64_tag<R: Read + Seek>(decoder: &mut Decoder<R>, tag: u16) -> Result<Option<Vec<f64>>> {
    Ok(decoder
        .find_tag(Tag::from_u16_exhaustive(tag))?
        .map(|v| v.into_f64_vec())
        .transpose()?)
}

/// EPSG code from a GeoKeyDirectory: header of four shorts, then
/// `(key, location, count, value)` entries
fn crs_from_geokeys(dir: &[u32]) -> Option<u16> {
    let key_count = *dir.get(3)? as usize;
    dir.get(4..4 + key_count * 4)?
        .chunks_exact(4)
        .filter(|e| e[1] == 0)
        .find(|e| e[0] == PROJECTED_CS_TYPE_KEY || e[0] == GEOGRAPHIC_TYPE_KEY)
        .and_then(|e| u16::try_from(e[3]).ok())
}
