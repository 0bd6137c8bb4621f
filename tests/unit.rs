//! Unit tests that do not need a container on disk.

use approx::assert_relative_eq;
use byteorder::{BigEndian, ByteOrder};
use rgisf::codec::{read_attributes, read_renderer, read_value, write_attributes, write_header, write_renderer, write_value};
use rgisf::{
    AttributeRecord, AttributeValue, Band, BoundingBox, ColorClass, PixelMatrix, PixelType, RampBlend, RasterMetadata,
    RasterOptions, Renderer, Resolution, Result, Rgba, RgbaImage, RgisfError, Source, TileCoord, TileRange,
};

const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

fn ramp_band(blend: RampBlend) -> Band {
    let matrix = PixelMatrix::new(2, 2, vec![0.0, 25.0, 50.0, 100.0]).unwrap();
    let mut band = Band::new(matrix, Renderer::default(), None);
    band.set_ramp_blend(blend);
    band
}

fn classified_band() -> Band {
    let matrix = PixelMatrix::new(2, 1, vec![0.0, 100.0]).unwrap();
    let renderer = Renderer::classified([
        ColorClass::new(0.0, 50.0, [255u8, 255, 255, 255]),
        ColorClass::new(50.0, 100.0, [0u8, 0, 0, 255]),
    ]);
    Band::new(matrix, renderer, None)
}

#[test]
fn test_pixel_type_registry() {
    let sizes: Vec<(u8, usize)> = PixelType::ALL.iter().map(|t| (t.tag(), t.size())).collect();
    assert_eq!(sizes, vec![(0, 1), (1, 2), (2, 4), (3, 1), (4, 2), (5, 4), (6, 8), (7, 4)]);

    for t in PixelType::ALL {
        assert_eq!(PixelType::from_tag(t.tag()).unwrap(), t);
        assert_eq!(t.to_string().parse::<PixelType>().unwrap(), t);
    }
    assert!(matches!(PixelType::from_tag(8), Err(RgisfError::UnsupportedPixelType(8))));
    assert!("complex64".parse::<PixelType>().is_err());
}

#[test]
fn test_integer_writes_round_and_saturate() -> Result<()> {
    let mut buf = Vec::new();
    for v in [300.0, -5.0, 2.5, f64::NAN] {
        write_value(&mut buf, PixelType::UInt8, v)?;
    }
    assert_eq!(buf, vec![255, 0, 3, 0]);

    let mut buf = Vec::new();
    write_value(&mut buf, PixelType::Int16, -40000.0)?;
    assert_eq!(read_value(&mut buf.as_slice(), PixelType::Int16)?, -32768.0);
    Ok(())
}

#[test]
fn test_header_offsets() -> Result<()> {
    let meta = RasterMetadata {
        pixel_type: PixelType::Int16,
        band_count: 3,
        crs: 3857,
        bbox: BoundingBox::new(-10.5, 60.25, 20.0, 30.0),
        resolution: Resolution { x: 0.25, y: -0.125 },
        width: 122,
        height: 242,
        factor: 100.0,
    };
    let buf = write_header(&meta)?;

    assert_eq!(buf.len(), 256);
    assert_eq!(buf[0], 4);
    assert_eq!(buf[1], 3);
    assert_eq!(BigEndian::read_u16(&buf[2..]), 3857);
    let floats: Vec<f32> = (4..40).step_by(4).map(|o| BigEndian::read_f32(&buf[o..])).collect();
    assert_eq!(floats, vec![-10.5, 60.25, 20.0, 30.0, 0.25, -0.125, 122.0, 242.0, 100.0]);
    assert!(buf[40..].iter().all(|&b| b == 0));

    assert_eq!(rgisf::codec::read_header(&buf)?, meta);
    Ok(())
}

#[test]
fn test_header_rejects_bad_sizes() {
    let mut buf = write_header(&RasterMetadata {
        pixel_type: PixelType::UInt8,
        band_count: 1,
        crs: 4326,
        bbox: BoundingBox::new(0.0, 1.0, 1.0, 0.0),
        resolution: Resolution { x: 1.0, y: -1.0 },
        width: 1,
        height: 1,
        factor: 1.0,
    })
    .unwrap();
    BigEndian::write_f32(&mut buf[28..], 2.5);
    assert!(matches!(rgisf::codec::read_header(&buf), Err(RgisfError::MalformedContainer(_))));
    assert!(matches!(rgisf::codec::read_header(&buf[..100]), Err(RgisfError::MalformedContainer(_))));
}

#[test]
fn test_start_weighted_ramp() {
    let band = ramp_band(RampBlend::StartWeighted);
    assert_eq!(band.value_to_rgba(0.0), WHITE);
    assert_eq!(band.value_to_rgba(100.0), WHITE);
    assert_eq!(band.value_to_rgba(25.0), Rgba::new(191, 191, 191, 255));
    assert_eq!(band.value_to_rgba(50.0), Rgba::new(128, 128, 128, 255));
    assert_relative_eq!(band.value_to_rgba(50.0).alpha_fraction(), 1.0);
}

#[test]
fn test_linear_ramp() {
    let band = ramp_band(RampBlend::Linear);
    assert_eq!(band.value_to_rgba(0.0), BLACK);
    assert_eq!(band.value_to_rgba(100.0), WHITE);
    assert_eq!(band.value_to_rgba(25.0), Rgba::new(64, 64, 64, 255));
    assert_eq!(band.value_to_rgba(50.0), Rgba::new(128, 128, 128, 255));
}

#[test]
fn test_ramp_clamps_out_of_range_values() {
    let band = ramp_band(RampBlend::Linear);
    assert_eq!(band.value_to_rgba(-50.0), BLACK);
    assert_eq!(band.value_to_rgba(1e9), WHITE);
    assert_eq!(band.value_to_rgba(f64::NAN), Rgba::TRANSPARENT);

    let flat = Band::new(PixelMatrix::new(1, 1, vec![7.0]).unwrap(), Renderer::default(), None);
    assert_eq!(flat.value_to_rgba(7.0), WHITE);
}

#[test]
fn test_three_stop_ramp_picks_segment() {
    let matrix = PixelMatrix::new(3, 1, vec![0.0, 50.0, 100.0]).unwrap();
    let red = [255u8, 0, 0, 255];
    let green = [0u8, 255, 0, 255];
    let blue = [0u8, 0, 255, 255];
    let mut band = Band::new(matrix, Renderer::stretched([red, green, blue]), None);
    band.set_ramp_blend(RampBlend::Linear);

    assert_eq!(band.value_to_rgba(50.0), Rgba::from(green));
    assert_eq!(band.value_to_rgba(75.0), Rgba::new(0, 128, 128, 255));
}

#[test]
fn test_classified_lookup() {
    let band = classified_band();
    assert_eq!(band.value_to_rgba(25.0), WHITE);
    assert_eq!(band.value_to_rgba(75.0), BLACK);
    assert_eq!(band.value_to_rgba(100.0), Rgba::TRANSPARENT);
    assert_eq!(band.value_to_rgba(-1.0), Rgba::TRANSPARENT);
}

#[test]
fn test_band_to_rgba_packs_every_cell() -> Result<()> {
    let image = classified_band().to_rgba()?;
    assert_eq!((image.width(), image.height()), (2, 1));
    assert_eq!(image.pixels(), &[255, 255, 255, 255, 0, 0, 0, 0]);
    Ok(())
}

#[test]
fn test_renderer_block_layout() -> Result<()> {
    let mut buf = Vec::new();
    write_renderer(&mut buf, &Renderer::default(), PixelType::UInt8)?;
    assert_eq!(buf, vec![1, 2, 0, 0, 0, 255, 255, 255, 255, 255]);

    let classified = Renderer::classified([ColorClass::new(-1.5, 2.5, [1u8, 2, 3, 4])]);
    let mut buf = Vec::new();
    write_renderer(&mut buf, &classified, PixelType::Float32)?;
    assert_eq!(buf.len(), 2 + 4 + 4 + 4);
    assert_eq!(read_renderer(&mut buf.as_slice(), PixelType::Float32)?, classified);

    let err = read_renderer(&mut [9u8, 0].as_slice(), PixelType::UInt8).unwrap_err();
    assert!(matches!(err, RgisfError::UnsupportedRendererType(9)));

    // an unknown tag is reported even when the block ends right after it
    let err = read_renderer(&mut [9u8].as_slice(), PixelType::UInt8).unwrap_err();
    assert!(matches!(err, RgisfError::UnsupportedRendererType(9)));
    Ok(())
}

#[test]
fn test_attribute_block_layout() -> Result<()> {
    let record = AttributeRecord::new()
        .with("name", "dem")
        .with("scale", 0.5f32)
        .with("valid", true)
        .with("code", -7i32)
        .with("name", "duplicate");

    let mut buf = Vec::new();
    write_attributes(&mut buf, &record)?;
    assert_eq!(&buf[..2], &[0, 5]);
    // "name": len, bytes, type 3, len 3, "dem"
    assert_eq!(&buf[2..15], &[0, 4, b'n', b'a', b'm', b'e', 0, 3, 0, 3, b'd', b'e', b'm']);

    let decoded = read_attributes(&mut buf.as_slice())?;
    assert_eq!(decoded, record);
    assert_eq!(decoded.get("name").and_then(AttributeValue::as_str), Some("dem"));
    assert_eq!(decoded.get("scale").and_then(AttributeValue::as_f32), Some(0.5));
    assert_eq!(decoded.get("valid").and_then(AttributeValue::as_bool), Some(true));
    assert_eq!(decoded.get("code").and_then(AttributeValue::as_i32), Some(-7));
    Ok(())
}

#[test]
fn test_attribute_block_errors() {
    let truncated = [0u8, 1, 0, 4, b'n'];
    assert!(matches!(
        read_attributes(&mut truncated.as_slice()),
        Err(RgisfError::MalformedContainer(_))
    ));

    let unknown = [0u8, 1, 0, 1, b'x', 0, 9, 0, 0];
    assert!(matches!(
        read_attributes(&mut unknown.as_slice()),
        Err(RgisfError::UnsupportedAttributeType(9))
    ));
}

#[test]
fn test_matrix_stats_and_window() -> Result<()> {
    let matrix = PixelMatrix::new(3, 2, vec![1.0, f64::NAN, 3.0, -4.0, 5.0, 6.0])?;
    let stats = matrix.stats();
    assert_eq!((stats.min, stats.max), (-4.0, 6.0));

    let window = rgisf::PixelWindow { col: 1, row: 1, cols: 2, rows: 1 };
    assert_eq!(matrix.window(&window)?.values(), &[5.0, 6.0]);
    assert!(PixelMatrix::new(2, 2, vec![1.0]).is_err());
    Ok(())
}

/// One degree per pixel, `width` columns starting at lon 0, 20 rows below lat 20
fn wide_metadata(width: u32) -> RasterMetadata {
    RasterMetadata {
        pixel_type: PixelType::UInt8,
        band_count: 1,
        crs: 4326,
        bbox: BoundingBox::new(0.0, 20.0, width as f32, 0.0),
        resolution: Resolution { x: 1.0, y: -1.0 },
        width,
        height: 20,
        factor: 1.0,
    }
}

#[test]
fn test_window_on_wide_raster_floors_fractions() -> Result<()> {
    let window = wide_metadata(1_000_000).window(600000.7, 10.0, 600010.2, 5.0)?;
    assert_eq!(window, rgisf::PixelWindow { col: 600000, row: 10, cols: 10, rows: 5 });

    let window = wide_metadata(200_000).window(150000.9, 10.0, 150004.5, 5.0)?;
    assert_eq!((window.col, window.cols), (150000, 4));
    Ok(())
}

#[test]
fn test_zoom_zero_tile_covers_world() -> Result<()> {
    let bbox = TileCoord::new(0, 0, 0)?.bbox();
    assert_relative_eq!(bbox.west, -180.0);
    assert_relative_eq!(bbox.east, 180.0);
    assert_relative_eq!(bbox.north, 85.0511287798, epsilon = 1e-9);
    assert_relative_eq!(bbox.south, -85.0511287798, epsilon = 1e-9);

    assert!(matches!(TileCoord::new(1, 2, 0), Err(RgisfError::InvalidTile { z: 1, x: 2, y: 0 })));
    Ok(())
}

#[test]
fn test_forward_and_inverse_tile_math_agree() -> Result<()> {
    for (lon, lat) in [(13.4, 52.5), (-122.42, 37.77), (151.2, -33.87), (0.0, 0.0)] {
        for z in [0, 3, 10, 17] {
            let tile = TileCoord::from_lon_lat(lon, lat, z)?;
            let bbox = tile.bbox();
            assert!(bbox.west <= lon && lon <= bbox.east, "{} outside {:?}", lon, bbox);
            assert!(bbox.south <= lat && lat <= bbox.north, "{} outside {:?}", lat, bbox);
        }
    }

    let pole = TileCoord::from_lon_lat(180.0, 90.0, 2)?;
    assert_eq!((pole.x, pole.y), (3, 0));
    Ok(())
}

#[test]
fn test_tile_range_covering() -> Result<()> {
    let bbox = BoundingBox::new(0.0, 50.0, 10.0, 40.0);
    let range = TileRange::covering(&bbox, 4)?;
    assert_eq!(range.x, 8..=8);
    assert_eq!(range.y, 5..=6);
    assert_eq!(range.count(), 2);

    let tiles: Vec<(u32, u32)> = range.iter().map(|t| (t.x, t.y)).collect();
    assert_eq!(tiles, vec![(8, 5), (8, 6)]);
    Ok(())
}

#[test]
fn test_average_images() -> Result<()> {
    let red = RgbaImage::from_pixels(1, 1, vec![255, 0, 0, 255])?;
    let blue = RgbaImage::from_pixels(1, 1, vec![0, 0, 255, 255])?;
    let avg = RgbaImage::average(&[red.clone(), blue])?;
    assert_eq!(avg.pixel(0, 0), Some(Rgba::new(128, 0, 128, 255)));

    assert!(matches!(RgbaImage::average(&[]), Err(RgisfError::EmptyRasterSource)));
    assert!(matches!(
        RgbaImage::average(&[red, RgbaImage::new(2, 2)]),
        Err(RgisfError::GeometryMismatch(_))
    ));
    Ok(())
}

#[test]
fn test_options_from_json() -> Result<()> {
    let json = r#"{
        "bbox": [0, 0, 1, 1],
        "attrs": [[{"name": "unit", "value": {"varchar": "m"}}]],
        "renderer": {"type": "classified", "classes": [{"min": 0, "max": 1, "color": [255, 0, 0, 255]}]},
        "read_as": {"pixel_type": "int16"},
        "ramp_blend": "linear"
    }"#;
    let options = RasterOptions::from_json(json)?;

    assert_eq!(options.bbox, Some([0.0, 0.0, 1.0, 1.0]));
    assert_eq!(options.attrs[0].get("unit"), Some(&AttributeValue::Varchar("m".into())));
    assert_eq!(options.renderer.as_ref().map(Renderer::len), Some(1));
    let read_as = options.read_as.unwrap();
    assert_eq!((read_as.pixel_type, read_as.factor), (PixelType::Int16, 1.0));
    assert_eq!(options.ramp_blend, RampBlend::Linear);
    assert_eq!(RasterOptions::from_json("{}")?, RasterOptions::default());
    Ok(())
}

#[test]
fn test_source_parse() {
    assert!(matches!(
        Source::parse("https://example.com/dem.rgisf"),
        Ok(Source::Url(_))
    ));
    assert!(matches!(
        Source::parse("nonexistent_file_xyz.rgisf"),
        Err(RgisfError::UnresolvedSource(_))
    ));
}
