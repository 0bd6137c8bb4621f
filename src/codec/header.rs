use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::constants::HEADER_SIZE;
use crate::error::{Result, RgisfError};
use crate::types::{BoundingBox, PixelType, RasterMetadata, Resolution};

/// Largest integer every smaller integer of which an f32 holds exactly
const MAX_EXACT_F32_INT: u32 = 1 << 24;

/// Parse the 256-byte container header
pub fn read_header(data: &[u8]) -> Result<RasterMetadata> {
    if data.len() < HEADER_SIZE {
        return Err(RgisfError::MalformedContainer(format!(
            "header needs {} bytes, buffer has {}",
            HEADER_SIZE,
            data.len()
        )));
    }
    let mut cursor = Cursor::new(&data[..HEADER_SIZE]);
    let err = || RgisfError::truncated("header");

    let pixel_type = PixelType::from_tag(cursor.read_u8().map_err(err())?)?;
    let band_count = cursor.read_u8().map_err(err())?;
    let crs = cursor.read_u16::<BigEndian>().map_err(err())?;
    let mut floats = [0f32; 9];
    cursor
        .read_f32_into::<BigEndian>(&mut floats)
        .map_err(err())?;
    let [x1, y1, x2, y2, xres, yres, nx, ny, factor] = floats;

    Ok(RasterMetadata {
        pixel_type,
        band_count,
        crs,
        bbox: BoundingBox { x1, y1, x2, y2 },
        resolution: Resolution { x: xres, y: yres },
        width: size_from_wire("width", nx)?,
        height: size_from_wire("height", ny)?,
        factor,
    })
}

/// Serialize the header into its fixed 256-byte form
pub fn write_header(meta: &RasterMetadata) -> Result<Vec<u8>> {
    for (name, v) in [("width", meta.width), ("height", meta.height)] {
        if v == 0 || v > MAX_EXACT_F32_INT {
            return Err(RgisfError::MalformedContainer(format!(
                "raster {} {} cannot be stored exactly as f32",
                name, v
            )));
        }
    }
    let mut buf = Vec::with_capacity(HEADER_SIZE);
    buf.write_u8(meta.pixel_type.tag())?;
    buf.write_u8(meta.band_count)?;
    buf.write_u16::<BigEndian>(meta.crs)?;
    for v in [
        meta.bbox.x1,
        meta.bbox.y1,
        meta.bbox.x2,
        meta.bbox.y2,
        meta.resolution.x,
        meta.resolution.y,
        meta.width as f32,
        meta.height as f32,
        meta.factor,
    ] {
        buf.write_f32::<BigEndian>(v)?;
    }
    buf.resize(HEADER_SIZE, 0);
    Ok(buf)
}

/// Width and height travel as f32 but must be positive integers
fn size_from_wire(name: &str, v: f32) -> Result<u32> {
    if !v.is_finite() || v < 1.0 || v.fract() != 0.0 {
        return Err(RgisfError::MalformedContainer(format!(
            "raster {} must be a positive integer, got {}",
            name, v
        )));
    }
    Ok(v as u32)
}
