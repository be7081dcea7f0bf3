//! Synthetic VTF buffers for tests.

use crate::{
    consts::{ImageFormat, LOW_RES_IMAGE_FORMAT},
    header::VTFHeader,
    mipmaps::{compute_level_byte_size, compute_level_dimensions},
};

pub struct VTFBuilder {
    pub version: [u32; 2],
    pub header_size: u32,
    pub width: u16,
    pub height: u16,
    pub flags: u32,
    pub frames: u16,
    pub first_frame: u16,
    pub reflectivity: [f32; 3],
    pub bumpmap_scale: f32,
    pub high_res_image_format: u32,
    pub mipmap_count: u8,
    pub low_res_image_format: u32,
    pub low_res_width: u8,
    pub low_res_height: u8,
    pub depth: u16,
    pub num_resources: u32,
}

impl VTFBuilder {
    /// A 7.1 RGBA8888 texture with a full pyramid and a 4x4 thumbnail.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            version: [7, 1],
            header_size: 64,
            width,
            height,
            flags: 0,
            frames: 1,
            first_frame: 0,
            reflectivity: [0.0; 3],
            bumpmap_scale: 1.0,
            high_res_image_format: ImageFormat::RGBA8888 as u32,
            mipmap_count: (u16::BITS - width.max(height).leading_zeros()) as u8,
            low_res_image_format: LOW_RES_IMAGE_FORMAT as u32,
            low_res_width: 4,
            low_res_height: 4,
            depth: 1,
            num_resources: 0,
        }
    }

    /// Byte every chunk of `level`/`frame` is filled with.
    pub fn fill(level: usize, frame: usize) -> u8 {
        (level * 16 + frame + 1) as u8
    }

    pub const THUMBNAIL_FILL: u8 = 0xEE;

    pub fn header_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(96);
        out.extend_from_slice(b"VTF\0");
        out.extend_from_slice(&self.version[0].to_le_bytes());
        out.extend_from_slice(&self.version[1].to_le_bytes());
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.frames.to_le_bytes());
        out.extend_from_slice(&self.first_frame.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        for r in self.reflectivity {
            out.extend_from_slice(&r.to_le_bytes());
        }
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&self.bumpmap_scale.to_le_bytes());
        out.extend_from_slice(&self.high_res_image_format.to_le_bytes());
        out.push(self.mipmap_count);
        out.extend_from_slice(&self.low_res_image_format.to_le_bytes());
        out.push(self.low_res_width);
        out.push(self.low_res_height);
        out.extend_from_slice(&self.depth.to_le_bytes());
        out.extend_from_slice(&[0; 3]);
        out.extend_from_slice(&self.num_resources.to_le_bytes());
        assert_eq!(out.len(), 72);

        out.resize(self.header_size as usize, 0);
        out
    }

    pub fn thumbnail_size(&self) -> usize {
        compute_level_byte_size(
            self.low_res_width.into(),
            self.low_res_height.into(),
            LOW_RES_IMAGE_FORMAT as u32,
        )
        .unwrap()
    }

    /// Byte size of each level, index 0 smallest.
    pub fn level_sizes(&self) -> Vec<usize> {
        compute_level_dimensions(
            self.mipmap_count.into(),
            self.width.into(),
            self.height.into(),
        )
        .into_iter()
        .map(|(w, h)| compute_level_byte_size(w, h, self.high_res_image_format).unwrap())
        .collect()
    }

    /// Header, thumbnail, then the pyramid smallest level first. Within a
    /// level the last frame comes first so frame 0 ends up nearest the end.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.header_bytes();
        out.resize(out.len() + self.thumbnail_size(), Self::THUMBNAIL_FILL);

        for (level, size) in self.level_sizes().into_iter().enumerate() {
            for frame in (0..self.frames as usize).rev() {
                out.resize(out.len() + size, Self::fill(level, frame));
            }
        }
        out
    }

    pub fn header(&self) -> VTFHeader {
        VTFHeader::parse(&self.build()).unwrap()
    }
}
