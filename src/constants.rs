/// Size of the container header
pub const HEADER_SIZE: usize = 256;

/// Size of the per-band metadata region
pub const BAND_META_SIZE: usize = 256;

/// Offset of the flags byte inside the band metadata region (after min/max of the widest type)
pub const BAND_FLAGS_OFFSET: usize = 16;

/// Band flag: an attribute block follows the renderer
pub const BAND_FLAG_ATTRIBUTES: u8 = 0b0000_0001;

/// EPSG code written when none is known
pub const DEFAULT_CRS: u16 = 4326;

/// Edge length of a slippy-map tile in pixels
pub const TILE_SIZE: usize = 256;

/// Latitude limit of the spherical Web Mercator projection
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Magic bytes of a gzip stream
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Renderer wire tags
pub mod renderer_types {
    pub const STRETCHED: u8 = 1;
    pub const CLASSIFIED: u8 = 2;
}

/// Attribute value wire tags
pub mod attr_types {
    pub const FLOAT32: u16 = 1;
    pub const INT32: u16 = 2;
    pub const VARCHAR: u16 = 3;
    pub const BOOL: u16 = 4;
}
