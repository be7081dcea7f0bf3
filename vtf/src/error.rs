use std::io;

use thiserror::Error;

use crate::consts::ImageFormat;

#[derive(Debug, Error)]
pub enum VTFError {
    #[error("header signature does not match VTF\\0: got {0:?}")]
    SignatureMismatch([u8; 4]),
    #[error("unsupported VTF version {major}.{minor} (only 7.0-7.5 supported)")]
    UnsupportedVersion { major: u32, minor: u32 },
    #[error("invalid texture dimensions: {0}")]
    InvalidDimensions(String),
    #[error("invalid mipmap count {count}, expected 1-{max} for {width}x{height} texture")]
    InvalidMipmapCount {
        count: u8,
        max: u8,
        width: u16,
        height: u16,
    },
    #[error("invalid header size: {0}")]
    InvalidHeaderSize(String),
    #[error("only vtf textures with depth 1 are supported, got depth {0}")]
    TextureDepthNotSupported(u16),
    #[error("unsupported texture depth {0} while reading mipmaps")]
    UnsupportedDepth(u16),
    #[error("unexpected end of data: needed {needed} bytes, buffer has {available}")]
    UnexpectedEndOfData { needed: usize, available: usize },
    #[error("mipmap {level} needs {needed} bytes but only {available} remain")]
    MipmapSizeMismatch {
        level: usize,
        needed: usize,
        available: usize,
    },
    #[error("unknown pixel format {0}")]
    UnknownPixelFormat(u32),
    #[error("no rgba8 conversion for {0:?}")]
    UnsupportedConversion(ImageFormat),
    #[error("block decompression failed: {0}")]
    BlockDecode(&'static str),
    #[error("invalid decoder limits: {0}")]
    Config(String),
    #[error(transparent)]
    Ini(#[from] ini::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type VRes<T> = Result<T, VTFError>;
