use serde::{Deserialize, Serialize};

/// 8-bit RGBA color. Alpha is kept in 0..=255 and only turned into a
/// fraction when handed to a consumer that wants one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn alpha_fraction(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn as_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(c: [u8; 4]) -> Self {
        Rgba::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        c.to_array()
    }
}

/// One interval of a classified renderer, `min` inclusive and `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorClass {
    pub min: f64,
    pub max: f64,
    pub color: Rgba,
}

impl ColorClass {
    pub fn new(min: f64, max: f64, color: impl Into<Rgba>) -> Self {
        Self {
            min,
            max,
            color: color.into(),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// Value-to-color strategy of a band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Renderer {
    Stretched { color_ramp: Vec<Rgba> },
    Classified { classes: Vec<ColorClass> },
}

impl Renderer {
    pub fn stretched<C: Into<Rgba>>(stops: impl IntoIterator<Item = C>) -> Self {
        Renderer::Stretched {
            color_ramp: stops.into_iter().map(Into::into).collect(),
        }
    }

    pub fn classified(classes: impl IntoIterator<Item = ColorClass>) -> Self {
        Renderer::Classified {
            classes: classes.into_iter().collect(),
        }
    }

    /// Number of ramp stops or classes
    pub fn len(&self) -> usize {
        match self {
            Renderer::Stretched { color_ramp } => color_ramp.len(),
            Renderer::Classified { classes } => classes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Renderer {
    /// Black to white ramp
    fn default() -> Self {
        Renderer::stretched([[0u8, 0, 0, 255], [255, 255, 255, 255]])
    }
}

/// How two neighbouring ramp stops are mixed.
///
/// `StartWeighted` reproduces the historic RGISF rendering, where the weight
/// given to the segment's start stop grows with the position inside the
/// segment. `Linear` is the usual interpolation from start to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampBlend {
    #[default]
    StartWeighted,
    Linear,
}
