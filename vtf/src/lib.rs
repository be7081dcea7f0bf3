//! Valve Texture Format (.vtf) decoding.
//!
//! [`VTF::decode`] validates the header, then locates the thumbnail and every
//! mipmap/frame image inside the buffer without touching pixel values.
//! [`codec`] converts located images to RGBA8 when needed.

pub mod codec;
pub mod config;
pub mod consts;
pub mod error;
pub mod header;
pub mod mipmaps;
pub mod prelude;
pub mod reader;
pub mod vtf;

#[cfg(test)]
mod fixtures;

pub use error::VTFError;
pub use reader::{decode, read_header, Decoder};
pub use vtf::VTF;
