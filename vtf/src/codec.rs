//! Pixel conversion to RGBA8.
//!
//! Structural decoding never touches pixel values. This module is the seam to
//! a block codec for callers that want actual samples.

use crate::{consts::ImageFormat, error::VRes, VTFError};

/// Decompresses block compressed image data to RGBA8.
pub trait BlockDecoder {
    fn decode_block_compressed(
        &self,
        format: ImageFormat,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> VRes<Vec<u8>>;
}

/// [`BlockDecoder`] backed by the `texture2ddecoder` crate.
#[derive(Copy, Clone, Debug, Default)]
pub struct Texture2DDecoder;

impl BlockDecoder for Texture2DDecoder {
    fn decode_block_compressed(
        &self,
        format: ImageFormat,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> VRes<Vec<u8>> {
        let (w, h) = (width as usize, height as usize);
        let mut pixels = vec![0u32; w * h];

        match format {
            ImageFormat::DXT1 | ImageFormat::DXT1ONEBITALPHA => {
                texture2ddecoder::decode_bc1(data, w, h, &mut pixels)
            }
            ImageFormat::DXT5 => texture2ddecoder::decode_bc3(data, w, h, &mut pixels),
            other => return Err(VTFError::UnsupportedConversion(other)),
        }
        .map_err(VTFError::BlockDecode)?;

        Ok(bgra_u32_to_rgba8(&pixels))
    }
}

// texture2ddecoder packs each pixel as 0xAARRGGBB
fn bgra_u32_to_rgba8(pixels: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * 4);
    for &pixel in pixels {
        let [b, g, r, a] = pixel.to_le_bytes();
        out.extend_from_slice(&[r, g, b, a]);
    }
    out
}

/// Converts `width` x `height` pixels of `format` to RGBA8. Block compressed
/// formats are handed to `decoder`.
pub fn to_rgba8(
    format: u32,
    width: u32,
    height: u32,
    data: &[u8],
    decoder: &dyn BlockDecoder,
) -> VRes<Vec<u8>> {
    let Some(image_format) = ImageFormat::from_raw(format) else {
        return Err(VTFError::UnknownPixelFormat(format));
    };
    if image_format.is_block_compressed() {
        return decoder.decode_block_compressed(image_format, width, height, data);
    }

    let bpp = image_format.bytes_per_pixel() as usize;
    if bpp == 0 {
        return Err(VTFError::UnknownPixelFormat(format));
    }
    let pixel_count = width as usize * height as usize;
    let data = exact(data, pixel_count * bpp)?;

    let swizzle: fn(&[u8]) -> [u8; 4] = match image_format {
        ImageFormat::RGBA8888 => |p: &[u8]| [p[0], p[1], p[2], p[3]],
        ImageFormat::ABGR8888 => |p: &[u8]| [p[3], p[2], p[1], p[0]],
        ImageFormat::ARGB8888 => |p: &[u8]| [p[1], p[2], p[3], p[0]],
        ImageFormat::BGRA8888 => |p: &[u8]| [p[2], p[1], p[0], p[3]],
        ImageFormat::BGRX8888 => |p: &[u8]| [p[2], p[1], p[0], 0xFF],
        ImageFormat::RGB888 => |p: &[u8]| [p[0], p[1], p[2], 0xFF],
        ImageFormat::BGR888 => |p: &[u8]| [p[2], p[1], p[0], 0xFF],
        // Pure blue marks transparent pixels.
        ImageFormat::RGB888BLUESCREEN => |p: &[u8]| blue_screen([p[0], p[1], p[2]]),
        ImageFormat::BGR888BLUESCREEN => |p: &[u8]| blue_screen([p[2], p[1], p[0]]),
        ImageFormat::I8 => |p: &[u8]| [p[0], p[0], p[0], 0xFF],
        ImageFormat::IA88 => |p: &[u8]| [p[0], p[0], p[0], p[1]],
        ImageFormat::A8 => |p: &[u8]| [0, 0, 0, p[0]],
        other => return Err(VTFError::UnsupportedConversion(other)),
    };

    let mut out = Vec::with_capacity(pixel_count * 4);
    for pixel in data.chunks_exact(bpp) {
        out.extend_from_slice(&swizzle(pixel));
    }
    Ok(out)
}

fn blue_screen([r, g, b]: [u8; 3]) -> [u8; 4] {
    if [r, g, b] == [0, 0, 0xFF] {
        [0, 0, 0, 0]
    } else {
        [r, g, b, 0xFF]
    }
}

/// Drops the unused X channel and swaps blue and red.
pub fn bgrx8888_to_rgb888(width: u32, height: u32, data: &[u8]) -> VRes<Vec<u8>> {
    let pixel_count = width as usize * height as usize;
    let data = exact(data, pixel_count * 4)?;

    let mut out = Vec::with_capacity(pixel_count * 3);
    for p in data.chunks_exact(4) {
        out.extend_from_slice(&[p[2], p[1], p[0]]);
    }
    Ok(out)
}

fn exact(data: &[u8], needed: usize) -> VRes<&[u8]> {
    data.get(..needed).ok_or(VTFError::UnexpectedEndOfData {
        needed,
        available: data.len(),
    })
}
