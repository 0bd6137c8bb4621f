use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::band::{Band, PixelMatrix};
use crate::codec::{deflate, inflate, quantize, read_header, write_header};
use crate::constants::{DEFAULT_CRS, HEADER_SIZE};
use crate::error::{Result, RgisfError};
use crate::geotiff::{read_geotiff, GeoTiffRaster};
use crate::raster::{PngRasterizer, Rasterizer, RgbaImage};
use crate::source::Source;
use crate::tile::{TileCoord, TileRange};
use crate::types::{BoundingBox, PixelType, RasterMetadata, RasterOptions, Renderer, Resolution};

/// An RGISF container: header plus fully decoded bands
#[derive(Debug, Clone, PartialEq)]
pub struct RGisFile {
    meta: RasterMetadata,
    bands: Vec<Band>,
    options: RasterOptions,
}

impl RGisFile {
    /// Open a compressed container file
    pub fn open<P: AsRef<Path>>(path: P, options: RasterOptions) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_buffer(&data, options)
    }

    /// Open an uncompressed container file
    pub fn open_uncompressed<P: AsRef<Path>>(path: P, options: RasterOptions) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_uncompressed_buffer(&data, options)
    }

    /// Load a compressed container from a path or URL
    pub fn from_source(source: &str, options: RasterOptions) -> Result<Self> {
        let data = Source::parse(source)?.load()?;
        Self::from_buffer(&data, options)
    }

    /// Load an uncompressed container from a path or URL
    pub fn from_uncompressed_source(source: &str, options: RasterOptions) -> Result<Self> {
        let data = Source::parse(source)?.load()?;
        Self::from_uncompressed_buffer(&data, options)
    }

    pub fn from_buffer(data: &[u8], options: RasterOptions) -> Result<Self> {
        let raw = inflate(data)?;
        Self::from_uncompressed_buffer(&raw, options)
    }

    /// Parse the header and every band. With `options.bbox` set, only that
    /// window of each band is decoded.
    pub fn from_uncompressed_buffer(data: &[u8], options: RasterOptions) -> Result<Self> {
        let stored = read_header(data)?;
        let window = options
            .bbox
            .map(|[x1, y1, x2, y2]| stored.window(x1, y1, x2, y2))
            .transpose()?;

        let mut meta = match &window {
            Some(w) => stored.windowed(w),
            None => stored.clone(),
        };
        if let Some(factor) = options.factor {
            meta.factor = factor;
        }

        let mut cursor = Cursor::new(data);
        cursor.set_position(HEADER_SIZE as u64);
        let mut bands = Vec::with_capacity(stored.band_count as usize);
        for i in 0..stored.band_count as usize {
            let mut band = Band::decode(&mut cursor, &stored, window.as_ref())?;
            band.set_ramp_blend(options.ramp_blend);
            if band.attributes().is_none() {
                if let Some(seed) = options.attrs_for(i) {
                    band.set_attributes(seed);
                }
            }
            log::debug!(
                "Decoded band {} ({}x{}, min {}, max {})",
                i,
                band.matrix().width(),
                band.matrix().height(),
                band.stats().min,
                band.stats().max
            );
            bands.push(band);
        }

        let consumed = cursor.position() as usize;
        if consumed < data.len() {
            log::warn!("Ignoring {} trailing bytes after the last band", data.len() - consumed);
        }

        Ok(Self { meta, bands, options })
    }

    /// Build a container from a decoded GeoTIFF.
    ///
    /// Values are scaled by `options.read_as.factor` and stored as
    /// `options.read_as.pixel_type` (the source sample type by default).
    pub fn from_geotiff(raster: &GeoTiffRaster, options: RasterOptions) -> Result<Self> {
        if raster.bands.is_empty() {
            return Err(RgisfError::EmptyRasterSource);
        }
        let band_count = u8::try_from(raster.bands.len()).map_err(|_| {
            RgisfError::MalformedContainer(format!("{} bands exceed the limit of 255", raster.bands.len()))
        })?;
        let (pixel_type, factor) = match options.read_as {
            Some(read_as) => (read_as.pixel_type, read_as.factor),
            None => (raster.sample_type, 1.0),
        };

        let meta = RasterMetadata {
            pixel_type,
            band_count,
            crs: raster.crs.unwrap_or(DEFAULT_CRS),
            bbox: raster.transform.bbox(raster.width, raster.height),
            resolution: raster.transform.resolution(),
            width: raster.width,
            height: raster.height,
            factor,
        };

        let mut buffer = write_header(&meta)?;
        for (i, values) in raster.bands.iter().enumerate() {
            let scaled = values
                .iter()
                .map(|&v| quantize(pixel_type, v * f64::from(factor)))
                .collect();
            let matrix = PixelMatrix::new(raster.width as usize, raster.height as usize, scaled)?;
            Band::new(matrix, options.renderer_or_default(), options.attrs_for(i)).encode(&mut buffer, pixel_type)?;
        }
        log::info!(
            "Imported {} band(s) of {}x{} as {} (factor {})",
            band_count,
            raster.width,
            raster.height,
            pixel_type,
            factor
        );

        Self::from_uncompressed_buffer(&buffer, options)
    }

    pub fn from_geotiff_buffer(data: &[u8], options: RasterOptions) -> Result<Self> {
        Self::from_geotiff(&read_geotiff(data)?, options)
    }

    /// Import a GeoTIFF from a path or URL
    pub fn from_geotiff_source(source: &str, options: RasterOptions) -> Result<Self> {
        let data = Source::parse(source)?.load()?;
        Self::from_geotiff_buffer(&data, options)
    }

    /// Put the bands of several containers into one.
    ///
    /// All containers must share pixel type, size, bbox and resolution.
    /// Header and options come from the first one; the sources are left untouched.
    pub fn combine(files: &[RGisFile]) -> Result<Self> {
        let first = files.first().ok_or(RgisfError::EmptyRasterSource)?;
        let mut bands = Vec::new();
        for (i, file) in files.iter().enumerate() {
            if !first.meta.same_geometry(&file.meta) {
                return Err(RgisfError::GeometryMismatch(format!(
                    "container {} ({} {}x{} {:?}) differs from container 0 ({} {}x{} {:?})",
                    i,
                    file.meta.pixel_type,
                    file.meta.width,
                    file.meta.height,
                    file.meta.bbox,
                    first.meta.pixel_type,
                    first.meta.width,
                    first.meta.height,
                    first.meta.bbox
                )));
            }
            bands.extend(file.bands.iter().cloned());
        }

        let band_count = u8::try_from(bands.len()).map_err(|_| {
            RgisfError::MalformedContainer(format!("{} bands exceed the limit of 255", bands.len()))
        })?;
        Ok(Self {
            meta: RasterMetadata {
                band_count,
                ..first.meta.clone()
            },
            bands,
            options: first.options.clone(),
        })
    }

    pub fn to_buffer(&self) -> Result<Vec<u8>> {
        let mut buffer = write_header(&self.meta)?;
        for band in &self.bands {
            band.encode(&mut buffer, self.meta.pixel_type)?;
        }
        Ok(buffer)
    }

    pub fn to_compressed_buffer(&self) -> Result<Vec<u8>> {
        deflate(&self.to_buffer()?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_compressed_buffer()?)?;
        Ok(())
    }

    pub fn save_to_uncompressed_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_buffer()?)?;
        Ok(())
    }

    /// Cut out the pixels covered by a geographic box as a new container
    pub fn region(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        let window = self.meta.window(x1, y1, x2, y2)?;
        let meta = self.meta.windowed(&window);

        let mut buffer = write_header(&meta)?;
        for band in &self.bands {
            buffer.extend(band.region_buffer(&window, meta.pixel_type)?);
        }
        log::debug!("Region {:?} -> window {:?}", [x1, y1, x2, y2], window);

        let options = RasterOptions::default().with_ramp_blend(self.options.ramp_blend);
        Self::from_uncompressed_buffer(&buffer, options)
    }

    pub fn set_renderer(&mut self, renderer: Renderer) {
        for band in &mut self.bands {
            band.set_renderer(renderer.clone());
        }
    }

    /// Whole raster rendered, bands averaged per channel
    pub fn to_rgba(&self) -> Result<RgbaImage> {
        let images = self
            .bands
            .iter()
            .map(Band::to_rgba)
            .collect::<Result<Vec<_>>>()?;
        RgbaImage::average(&images)
    }

    pub fn to_png(&self, rasterizer: &dyn Rasterizer) -> Result<Vec<u8>> {
        rasterizer.encode(&self.to_rgba()?)
    }

    pub fn save_as_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_png(&PngRasterizer)?)?;
        Ok(())
    }

    /// 256x256 composite of all bands for one slippy tile
    pub fn tile_image(&self, coord: &TileCoord) -> Result<RgbaImage> {
        let images: Vec<RgbaImage> = self
            .bands
            .iter()
            .map(|band| band.tile_image(coord, &self.meta))
            .collect();
        RgbaImage::average(&images)
    }

    pub fn save_tile_as_png<P: AsRef<Path>>(&self, coord: &TileCoord, path: P) -> Result<()> {
        fs::write(path, PngRasterizer.encode(&self.tile_image(coord)?)?)?;
        Ok(())
    }

    /// Render every tile covering the raster for zooms `z_min..=z_max`
    /// into `{out_dir}/{z}/{x}/{y}.{ext}`, one tile after the other.
    /// Returns the number of tiles written.
    pub fn generate_tiles<P: AsRef<Path>>(
        &self,
        z_min: u8,
        z_max: u8,
        out_dir: P,
        rasterizer: &dyn Rasterizer,
    ) -> Result<usize> {
        let out_dir = out_dir.as_ref();
        let mut written = 0;

        for z in z_min..=z_max {
            let range = TileRange::covering(&self.meta.bbox, z)?;
            log::info!(
                "Zoom {}: {} tile(s), x {:?}, y {:?}",
                z,
                range.count(),
                range.x,
                range.y
            );
            for coord in range.iter() {
                log::debug!("Generating tile {}/{}/{}", coord.z, coord.x, coord.y);
                let dir = out_dir.join(coord.z.to_string()).join(coord.x.to_string());
                fs::create_dir_all(&dir)?;
                let bytes = rasterizer.encode(&self.tile_image(&coord)?)?;
                fs::write(dir.join(format!("{}.{}", coord.y, rasterizer.extension())), bytes)?;
                written += 1;
            }
        }

        Ok(written)
    }

    pub fn metadata(&self) -> &RasterMetadata {
        &self.meta
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band(&self, index: usize) -> Option<&Band> {
        self.bands.get(index)
    }

    pub fn bounds(&self) -> BoundingBox {
        self.meta.bbox
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn pixel_type(&self) -> PixelType {
        self.meta.pixel_type
    }

    pub fn crs(&self) -> u16 {
        self.meta.crs
    }

    pub fn resolution(&self) -> Resolution {
        self.meta.resolution
    }

    pub fn width(&self) -> u32 {
        self.meta.width
    }

    pub fn height(&self) -> u32 {
        self.meta.height
    }

    pub fn factor(&self) -> f32 {
        self.meta.factor
    }
}
