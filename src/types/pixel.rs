use serde::{Deserialize, Serialize};

use crate::error::{Result, RgisfError};

/// Numeric encoding of the values stored in a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PixelType {
    UInt8 = 0,
    UInt16 = 1,
    UInt32 = 2,
    Int8 = 3,
    Int16 = 4,
    Int32 = 5,
    Float64 = 6,
    Float32 = 7,
}

impl PixelType {
    pub const ALL: [PixelType; 8] = [
        PixelType::UInt8,
        PixelType::UInt16,
        PixelType::UInt32,
        PixelType::Int8,
        PixelType::Int16,
        PixelType::Int32,
        PixelType::Float64,
        PixelType::Float32,
    ];

    /// Look up a pixel type by its wire tag
    pub fn from_tag(tag: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == tag)
            .ok_or(RgisfError::UnsupportedPixelType(tag))
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Width of one value in bytes
    pub fn size(self) -> usize {
        match self {
            PixelType::UInt8 | PixelType::Int8 => 1,
            PixelType::UInt16 | PixelType::Int16 => 2,
            PixelType::UInt32 | PixelType::Int32 | PixelType::Float32 => 4,
            PixelType::Float64 => 8,
        }
    }
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PixelType::UInt8 => "uint8",
            PixelType::UInt16 => "uint16",
            PixelType::UInt32 => "uint32",
            PixelType::Int8 => "int8",
            PixelType::Int16 => "int16",
            PixelType::Int32 => "int32",
            PixelType::Float64 => "float64",
            PixelType::Float32 => "float32",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for PixelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown pixel type '{}'", s))
    }
}
