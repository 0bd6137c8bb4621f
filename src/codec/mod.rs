//! Wire-level readers and writers for the RGISF container.
//!
//! Every multi-byte field is big-endian.

mod attributes;
mod compression;
mod header;
mod renderer;
mod values;

pub use attributes::{read_attributes, write_attributes};
pub use compression::{deflate, inflate};
pub use header::{read_header, write_header};
pub use renderer::{read_renderer, write_renderer};
pub use values::{quantize, read_value, value_at, write_value};
