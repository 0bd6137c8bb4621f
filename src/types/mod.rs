pub mod attributes;
pub mod metadata;
pub mod options;
pub mod pixel;
pub mod renderer;

pub use attributes::*;
pub use metadata::*;
pub use options::*;
pub use pixel::*;
pub use renderer::*;
