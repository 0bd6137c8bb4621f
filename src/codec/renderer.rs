use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use super::values::{read_value, write_value};
use crate::constants::renderer_types;
use crate::error::{Result, RgisfError};
use crate::types::{ColorClass, PixelType, Renderer, Rgba};

/// Read a renderer block: tag, entry count, entries
pub fn read_renderer<R: Read>(reader: &mut R, pixel_type: PixelType) -> Result<Renderer> {
    let err = || RgisfError::truncated("renderer");
    let tag = reader.read_u8().map_err(err())?;
    if tag != renderer_types::STRETCHED && tag != renderer_types::CLASSIFIED {
        return Err(RgisfError::UnsupportedRendererType(tag));
    }
    let count = reader.read_u8().map_err(err())? as usize;

    match tag {
        renderer_types::STRETCHED => {
            let mut color_ramp = Vec::with_capacity(count);
            for _ in 0..count {
                color_ramp.push(read_rgba(reader)?);
            }
            Ok(Renderer::Stretched { color_ramp })
        }
        renderer_types::CLASSIFIED => {
            let mut classes = Vec::with_capacity(count);
            for _ in 0..count {
                let min = read_value(reader, pixel_type).map_err(err())?;
                let max = read_value(reader, pixel_type).map_err(err())?;
                let color = read_rgba(reader)?;
                classes.push(ColorClass { min, max, color });
            }
            Ok(Renderer::Classified { classes })
        }
        other => Err(RgisfError::UnsupportedRendererType(other)),
    }
}

/// Write a renderer block. Class bounds use the band's pixel type.
pub fn write_renderer<W: Write>(writer: &mut W, renderer: &Renderer, pixel_type: PixelType) -> Result<()> {
    let count = u8::try_from(renderer.len()).map_err(|_| {
        RgisfError::MalformedContainer(format!(
            "renderer has {} entries, at most 255 fit",
            renderer.len()
        ))
    })?;

    match renderer {
        Renderer::Stretched { color_ramp } => {
            writer.write_u8(renderer_types::STRETCHED)?;
            writer.write_u8(count)?;
            for color in color_ramp {
                writer.write_all(&color.to_array())?;
            }
        }
        Renderer::Classified { classes } => {
            writer.write_u8(renderer_types::CLASSIFIED)?;
            writer.write_u8(count)?;
            for class in classes {
                write_value(writer, pixel_type, class.min)?;
                write_value(writer, pixel_type, class.max)?;
                writer.write_all(&class.color.to_array())?;
            }
        }
    }
    Ok(())
}

fn read_rgba<R: Read>(reader: &mut R) -> Result<Rgba> {
    let mut c = [0u8; 4];
    reader
        .read_exact(&mut c)
        .map_err(RgisfError::truncated("renderer color"))?;
    Ok(Rgba::from(c))
}
