//! Mip pyramid geometry.
//!
//! Levels are indexed smallest-first: index 0 is the smallest mip and
//! `mipmap_count - 1` is the full resolution image. On disk the pyramid is
//! stored in the same order, so the largest level sits at the end of the file.

use crate::{consts::bytes_per_pixel, consts::is_block_compressed, error::VRes, VTFError};

/// Per-level (width, height), index 0 smallest, `mip_count - 1` the base.
pub fn compute_level_dimensions(mip_count: usize, width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut levels = vec![(0, 0); mip_count];
    let (mut width, mut height) = (width.max(1), height.max(1));

    for level in levels.iter_mut().rev() {
        *level = (width, height);

        width = width.div_ceil(2).max(1);
        height = height.div_ceil(2).max(1);
    }

    levels
}

/// Size in bytes of one stored image of the given dimensions.
///
/// Block compressed formats always allocate whole 4x4 blocks, so smaller levels
/// are padded out to 4 in each axis.
pub fn compute_level_byte_size(width: u32, height: u32, format: u32) -> VRes<usize> {
    let bpp = bytes_per_pixel(format);
    if bpp == 0.0 {
        return Err(VTFError::UnknownPixelFormat(format));
    }

    let (width, height) = if is_block_compressed(format) {
        (width.max(4), height.max(4))
    } else {
        (width, height)
    };

    Ok((f64::from(bpp) * f64::from(width) * f64::from(height)).round() as usize)
}
