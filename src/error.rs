use thiserror::Error;

#[derive(Error, Debug)]
pub enum RgisfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed RGISF container: {0}")]
    MalformedContainer(String),

    #[error("Unsupported pixel type tag: {0}")]
    UnsupportedPixelType(u8),

    #[error("Unsupported renderer type tag: {0}")]
    UnsupportedRendererType(u8),

    #[error("Unsupported attribute value type: {0}")]
    UnsupportedAttributeType(u16),

    #[error("Raster source contains no bands")]
    EmptyRasterSource,

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Cannot resolve source '{0}' as a file path or URL")]
    UnresolvedSource(String),

    #[error("Invalid tile z={z} x={x} y={y}")]
    InvalidTile { z: u8, x: u32, y: u32 },

    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    #[error("Band geometry mismatch: {0}")]
    GeometryMismatch(String),

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[cfg(feature = "remote")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RgisfError {
    /// Wrap a short read while decoding `what` as a structural error.
    pub(crate) fn truncated(what: &'static str) -> impl FnOnce(std::io::Error) -> RgisfError {
        move |e| RgisfError::MalformedContainer(format!("Failed to read {}: {}", what, e))
    }
}

pub type Result<T> = std::result::Result<T, RgisfError>;
