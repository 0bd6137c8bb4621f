use serde::{Deserialize, Serialize};

use super::PixelType;
use crate::error::{Result, RgisfError};

/// Geographic extent as stored in the header. `(x1, y1)` is the raster
/// origin (the corner of pixel `(0, 0)`), `(x2, y2)` the opposite corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn west(&self) -> f64 {
        f64::from(self.x1.min(self.x2))
    }

    pub fn east(&self) -> f64 {
        f64::from(self.x1.max(self.x2))
    }

    pub fn south(&self) -> f64 {
        f64::from(self.y1.min(self.y2))
    }

    pub fn north(&self) -> f64 {
        f64::from(self.y1.max(self.y2))
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west() && lon <= self.east() && lat >= self.south() && lat <= self.north()
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// Size of one pixel in CRS units. `y` is negative for north-up rasters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: f32,
    pub y: f32,
}

/// Container header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterMetadata {
    pub pixel_type: PixelType,
    pub band_count: u8,
    pub crs: u16,
    pub bbox: BoundingBox,
    pub resolution: Resolution,
    pub width: u32,
    pub height: u32,
    pub factor: f32,
}

/// Pixel-index rectangle inside a band matrix, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelWindow {
    pub col: usize,
    pub row: usize,
    pub cols: usize,
    pub rows: usize,
}

impl PixelWindow {
    pub fn col_end(&self) -> usize {
        self.col + self.cols
    }

    pub fn row_end(&self) -> usize {
        self.row + self.rows
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RasterMetadata {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Column of a longitude, before bounds checking
    pub fn column_of(&self, lon: f64) -> f64 {
        (lon - f64::from(self.bbox.x1)) / f64::from(self.resolution.x)
    }

    /// Row of a latitude, before bounds checking
    pub fn row_of(&self, lat: f64) -> f64 {
        (lat - f64::from(self.bbox.y1)) / f64::from(self.resolution.y)
    }

    /// Nearest-neighbour matrix index of a coordinate, `None` outside the matrix
    pub fn pixel_index(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        let col = self.column_of(lon).floor();
        let row = self.row_of(lat).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.width as usize && row < self.height as usize).then_some((col, row))
    }

    /// Convert a geographic box into the pixel window it covers.
    ///
    /// Corners may be given in any order. The window must have a non-zero
    /// extent and lie inside the matrix.
    pub fn window(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<PixelWindow> {
        let cols = [snapped_floor(self.column_of(x1)), snapped_floor(self.column_of(x2))];
        let rows = [snapped_floor(self.row_of(y1)), snapped_floor(self.row_of(y2))];
        if cols.iter().chain(rows.iter()).any(|v| !v.is_finite()) {
            return Err(RgisfError::InvalidRegion(format!(
                "box [{}, {}, {}, {}] cannot be mapped with resolution {:?}",
                x1, y1, x2, y2, self.resolution
            )));
        }

        let (c0, c1) = (cols[0].min(cols[1]), cols[0].max(cols[1]));
        let (r0, r1) = (rows[0].min(rows[1]), rows[0].max(rows[1]));
        if c1 - c0 < 1.0 || r1 - r0 < 1.0 {
            return Err(RgisfError::InvalidRegion(format!(
                "box [{}, {}, {}, {}] covers {}x{} pixels",
                x1,
                y1,
                x2,
                y2,
                c1 - c0,
                r1 - r0
            )));
        }
        if c0 < 0.0 || r0 < 0.0 || c1 > f64::from(self.width) || r1 > f64::from(self.height) {
            return Err(RgisfError::InvalidRegion(format!(
                "pixel window cols {}..{} rows {}..{} exceeds raster of {}x{}",
                c0, c1, r0, r1, self.width, self.height
            )));
        }

        Ok(PixelWindow {
            col: c0 as usize,
            row: r0 as usize,
            cols: (c1 - c0) as usize,
            rows: (r1 - r0) as usize,
        })
    }

    /// Header describing `window` of this raster, with the bbox snapped to pixel edges
    pub fn windowed(&self, window: &PixelWindow) -> RasterMetadata {
        let (ox, oy) = (f64::from(self.bbox.x1), f64::from(self.bbox.y1));
        let (rx, ry) = (f64::from(self.resolution.x), f64::from(self.resolution.y));
        RasterMetadata {
            bbox: BoundingBox {
                x1: (ox + window.col as f64 * rx) as f32,
                y1: (oy + window.row as f64 * ry) as f32,
                x2: (ox + window.col_end() as f64 * rx) as f32,
                y2: (oy + window.row_end() as f64 * ry) as f32,
            },
            width: window.cols as u32,
            height: window.rows as u32,
            ..self.clone()
        }
    }

    /// True when bands of `other` can live in the same container as ours
    pub fn same_geometry(&self, other: &RasterMetadata) -> bool {
        self.pixel_type == other.pixel_type
            && self.width == other.width
            && self.height == other.height
            && self.bbox == other.bbox
            && self.resolution == other.resolution
    }
}

/// Floor that tolerates the error of f32 header values: positions within
/// one f32 epsilon (relative) of an integer are treated as that integer.
fn snapped_floor(v: f64) -> f64 {
    let nearest = v.round();
    if (v - nearest).abs() <= f64::from(f32::EPSILON) * v.abs().max(1.0) {
        nearest
    } else {
        v.floor()
    }
}
