//! rgisf: Pure Rust library for RGISF multi-band raster containers
//!
//! An RGISF container holds a fixed 256-byte header followed by one block per
//! band (metadata, renderer, optional attributes and the pixel matrix). This
//! crate reads and writes containers (raw or zlib/gzip compressed), imports
//! GeoTIFFs, cuts geographic regions, merges containers and renders bands to
//! RGBA images and slippy-map PNG tiles.
//!
//! # Example
//! ```no_run
//! use rgisf::{RGisFile, RasterOptions};
//!
//! fn main() -> rgisf::Result<()> {
//!     let file = RGisFile::open("elevation.rgisf", RasterOptions::default())?;
//!
//!     println!("Size: {} x {}", file.width(), file.height());
//!     println!("Bands: {}", file.band_count());
//!
//!     let cut = file.region(10.0, 50.0, 12.0, 48.0)?;
//!     cut.save_as_png("cut.png")?;
//!
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod geotiff;
pub mod raster;
pub mod source;
pub mod tile;
pub mod types;

mod band;
mod constants;
mod container;

pub use band::{Band, BandStats, PixelMatrix};
pub use constants::{DEFAULT_CRS, HEADER_SIZE, TILE_SIZE};
pub use container::RGisFile;
pub use error::{Result, RgisfError};
pub use geotiff::{read_geotiff, GeoTiffRaster, GeoTransform};
pub use raster::{PngRasterizer, Rasterizer, RgbaImage};
pub use source::Source;
pub use tile::{TileBBox, TileCoord, TileRange};
pub use types::*;
