use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::error::{Result, RgisfError};
use crate::types::PixelType;

/// Read one value of `pixel_type`
pub fn read_value<R: Read>(reader: &mut R, pixel_type: PixelType) -> io::Result<f64> {
    Ok(match pixel_type {
        PixelType::UInt8 => f64::from(reader.read_u8()?),
        PixelType::UInt16 => f64::from(reader.read_u16::<BigEndian>()?),
        PixelType::UInt32 => f64::from(reader.read_u32::<BigEndian>()?),
        PixelType::Int8 => f64::from(reader.read_i8()?),
        PixelType::Int16 => f64::from(reader.read_i16::<BigEndian>()?),
        PixelType::Int32 => f64::from(reader.read_i32::<BigEndian>()?),
        PixelType::Float32 => f64::from(reader.read_f32::<BigEndian>()?),
        PixelType::Float64 => reader.read_f64::<BigEndian>()?,
    })
}

/// Write one value as `pixel_type`. Integer types round to nearest and
/// saturate; NaN becomes 0.
pub fn write_value<W: Write>(writer: &mut W, pixel_type: PixelType, value: f64) -> io::Result<()> {
    match pixel_type {
        PixelType::UInt8 => writer.write_u8(value.round() as u8),
        PixelType::UInt16 => writer.write_u16::<BigEndian>(value.round() as u16),
        PixelType::UInt32 => writer.write_u32::<BigEndian>(value.round() as u32),
        PixelType::Int8 => writer.write_i8(value.round() as i8),
        PixelType::Int16 => writer.write_i16::<BigEndian>(value.round() as i16),
        PixelType::Int32 => writer.write_i32::<BigEndian>(value.round() as i32),
        PixelType::Float32 => writer.write_f32::<BigEndian>(value as f32),
        PixelType::Float64 => writer.write_f64::<BigEndian>(value),
    }
}

/// The value `write_value` would store for `value`
pub fn quantize(pixel_type: PixelType, value: f64) -> f64 {
    match pixel_type {
        PixelType::UInt8 => f64::from(value.round() as u8),
        PixelType::UInt16 => f64::from(value.round() as u16),
        PixelType::UInt32 => f64::from(value.round() as u32),
        PixelType::Int8 => f64::from(value.round() as i8),
        PixelType::Int16 => f64::from(value.round() as i16),
        PixelType::Int32 => f64::from(value.round() as i32),
        PixelType::Float32 => f64::from(value as f32),
        PixelType::Float64 => value,
    }
}

/// Random access read of the value starting at `offset`
pub fn value_at(data: &[u8], offset: usize, pixel_type: PixelType) -> Result<f64> {
    let end = offset + pixel_type.size();
    let mut bytes = data.get(offset..end).ok_or_else(|| {
        RgisfError::MalformedContainer(format!(
            "pixel at byte {} lies past the end of a {} byte buffer",
            offset,
            data.len()
        ))
    })?;
    read_value(&mut bytes, pixel_type).map_err(RgisfError::truncated("pixel value"))
}
