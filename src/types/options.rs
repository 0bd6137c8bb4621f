use serde::{Deserialize, Serialize};

use super::{AttributeRecord, PixelType, RampBlend, Renderer};
use crate::error::Result;

/// Target encoding for imported rasters. Every source value is multiplied
/// by `factor` before being quantized to `pixel_type`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadAs {
    pub pixel_type: PixelType,
    #[serde(default = "unit_factor")]
    pub factor: f32,
}

fn unit_factor() -> f32 {
    1.0
}

/// Options applied while building a container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Geographic window `[x1, y1, x2, y2]`; only this part is decoded
    pub bbox: Option<[f64; 4]>,
    /// Attribute seeds, by band index, for bands that carry none
    pub attrs: Vec<AttributeRecord>,
    /// Renderer for imported bands
    pub renderer: Option<Renderer>,
    /// Overrides the header factor after decoding
    pub factor: Option<f32>,
    pub read_as: Option<ReadAs>,
    pub ramp_blend: RampBlend,
}

impl RasterOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_attrs(mut self, attrs: Vec<AttributeRecord>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_read_as(mut self, pixel_type: PixelType, factor: f32) -> Self {
        self.read_as = Some(ReadAs { pixel_type, factor });
        self
    }

    pub fn with_ramp_blend(mut self, blend: RampBlend) -> Self {
        self.ramp_blend = blend;
        self
    }

    pub(crate) fn renderer_or_default(&self) -> Renderer {
        self.renderer.clone().unwrap_or_default()
    }

    pub(crate) fn attrs_for(&self, band: usize) -> Option<AttributeRecord> {
        self.attrs.get(band).cloned()
    }
}
