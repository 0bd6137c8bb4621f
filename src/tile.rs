//! Slippy-map tile addressing on spherical Web Mercator.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use crate::constants::MAX_MERCATOR_LAT;
use crate::error::{Result, RgisfError};
use crate::types::BoundingBox;

/// Deepest zoom whose tile indices fit in u32
pub const MAX_ZOOM: u8 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// Geographic extent of a tile in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBBox {
    pub west: f64,
    pub north: f64,
    pub east: f64,
    pub south: f64,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Result<Self> {
        if z > MAX_ZOOM || u64::from(x) >= tiles_per_side(z) || u64::from(y) >= tiles_per_side(z) {
            return Err(RgisfError::InvalidTile { z, x, y });
        }
        Ok(Self { z, x, y })
    }

    /// Tile containing a lon/lat position. Positions beyond the Mercator
    /// limits snap to the outermost tile.
    pub fn from_lon_lat(lon: f64, lat: f64, z: u8) -> Result<Self> {
        if z > MAX_ZOOM {
            return Err(RgisfError::InvalidTile { z, x: 0, y: 0 });
        }
        let n = tiles_per_side(z) as f64;
        let lon = lon.clamp(-180.0, 180.0);
        let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();

        let x = ((lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();
        Ok(Self {
            z,
            x: x.clamp(0.0, n - 1.0) as u32,
            y: y.clamp(0.0, n - 1.0) as u32,
        })
    }

    pub fn bbox(&self) -> TileBBox {
        let n = tiles_per_side(self.z) as f64;
        let lon = |x: f64| x / n * 360.0 - 180.0;
        let lat = |y: f64| (PI - 2.0 * PI * y / n).sinh().atan().to_degrees();
        TileBBox {
            west: lon(f64::from(self.x)),
            north: lat(f64::from(self.y)),
            east: lon(f64::from(self.x) + 1.0),
            south: lat(f64::from(self.y) + 1.0),
        }
    }
}

/// Inclusive rectangle of tiles at one zoom level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRange {
    pub z: u8,
    pub x: RangeInclusive<u32>,
    pub y: RangeInclusive<u32>,
}

impl TileRange {
    /// Tiles covering `bbox` at zoom `z`
    pub fn covering(bbox: &BoundingBox, z: u8) -> Result<Self> {
        let nw = TileCoord::from_lon_lat(bbox.west(), bbox.north(), z)?;
        let se = TileCoord::from_lon_lat(bbox.east(), bbox.south(), z)?;
        Ok(Self {
            z,
            x: nw.x.min(se.x)..=nw.x.max(se.x),
            y: nw.y.min(se.y)..=nw.y.max(se.y),
        })
    }

    pub fn count(&self) -> u64 {
        let span = |r: &RangeInclusive<u32>| u64::from(r.end() - r.start()) + 1;
        span(&self.x) * span(&self.y)
    }

    /// Column by column, north to south inside a column
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.x
            .clone()
            .flat_map(move |x| self.y.clone().map(move |y| TileCoord { z: self.z, x, y }))
    }
}

fn tiles_per_side(z: u8) -> u64 {
    1u64 << z
}
