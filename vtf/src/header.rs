use std::mem;

use flagset::FlagSet;

use crate::{
    config::DecoderLimits,
    consts::{ImageFormat, VTFFlags, HEADER_READ_SIZE, VTF_SIGNATURE},
    error::VRes,
    VTFError,
};

/// On-disk header, the superset of every version up to 7.5.
///
/// Read as-is from the first [`HEADER_READ_SIZE`] bytes. Fields are little-endian.
#[repr(C, packed)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct RawVTFHeader {
    signature: [u8; 4],      // File signature ("VTF\0").
    version: [u32; 2],       // version[0].version[1] (7.0 - 7.5).
    header_size: u32, // Size of the header struct (16 byte aligned) + size of the resources dictionary (7.3+).
    width: u16,       // Width of the largest mipmap in pixels.
    height: u16,      // Height of the largest mipmap in pixels.
    flags: u32,       // VTF flags.
    frames: u16,      // Number of frames, if animated (1 for no animation).
    first_frame: u16, // First frame in animation (0 based).
    padding0: [u8; 4],       // reflectivity padding (16 byte alignment).
    reflectivity: [u32; 3],  // reflectivity vector, f32 bits.
    padding1: [u8; 4],       // reflectivity padding (8 byte packing).
    bumpmap_scale: u32,      // Bumpmap scale, f32 bits.
    high_res_image_format: u32,
    mipmap_count: u8,
    low_res_image_format: u32, // Always DXT1.
    low_res_image_width: u8,
    low_res_image_height: u8,

    // 7.2+
    depth: u16, // Depth of the largest mipmap in pixels. Is 1 for a 2D texture.

    // 7.3+
    padding2: [u8; 3],  // depth padding (4 byte alignment).
    num_resources: u32, // Number of resources this vtf has.

    padding3: [u8; 24],
}

const _: () = assert!(mem::size_of::<RawVTFHeader>() == HEADER_READ_SIZE);

/// Parsed header. Every field is present regardless of version; fields newer
/// than the file's version are zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VTFHeader {
    pub signature: [u8; 4],
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
    pub low_res_image_width: u8,
    pub low_res_image_height: u8,
    /// 7.2+
    pub depth: u16,
    /// 7.3+
    pub num_resources: u32,
}

impl From<RawVTFHeader> for VTFHeader {
    fn from(raw: RawVTFHeader) -> Self {
        // Copy out of the packed struct before touching the arrays.
        let version = raw.version;
        let reflectivity = raw.reflectivity;
        let bumpmap_scale = raw.bumpmap_scale;
        let depth = raw.depth;
        let num_resources = raw.num_resources;

        let mut header = Self {
            signature: raw.signature,
            version: version.map(u32::from_le),
            header_size: u32::from_le(raw.header_size),
            width: u16::from_le(raw.width),
            height: u16::from_le(raw.height),
            flags: u32::from_le(raw.flags),
            frames: u16::from_le(raw.frames),
            first_frame: u16::from_le(raw.first_frame),
            reflectivity: reflectivity.map(|bits| f32::from_bits(u32::from_le(bits))),
            bumpmap_scale: f32::from_bits(u32::from_le(bumpmap_scale)),
            high_res_image_format: u32::from_le(raw.high_res_image_format),
            mipmap_count: raw.mipmap_count,
            low_res_image_format: u32::from_le(raw.low_res_image_format),
            low_res_image_width: raw.low_res_image_width,
            low_res_image_height: raw.low_res_image_height,
            depth: u16::from_le(depth),
            num_resources: u32::from_le(num_resources),
        };

        // Older headers are shorter, whatever sits in these bytes belongs to the thumbnail.
        if !header.is_at_least(7, 2) {
            header.depth = 0;
        }
        if !header.is_at_least(7, 3) {
            header.num_resources = 0;
        }

        header
    }
}

impl VTFHeader {
    /// Reads the fixed header from the start of `buffer`.
    ///
    /// Always consumes [`HEADER_READ_SIZE`] bytes; a shorter buffer is zero
    /// padded; size checks against the real buffer happen in [`Self::validate`].
    pub fn parse(buffer: &[u8]) -> VRes<Self> {
        let mut bytes = [0u8; HEADER_READ_SIZE];
        let len = buffer.len().min(HEADER_READ_SIZE);
        bytes[..len].copy_from_slice(&buffer[..len]);

        let raw: RawVTFHeader = bytemuck::pod_read_unaligned(&bytes);
        let signature = raw.signature;
        if signature != VTF_SIGNATURE {
            return Err(VTFError::SignatureMismatch(signature));
        }

        Ok(raw.into())
    }

    /// `major * 10 + minor`, e.g. 73 for 7.3.
    pub fn version_score(&self) -> u32 {
        self.version[0]
            .saturating_mul(10)
            .saturating_add(self.version[1])
    }

    pub fn is_at_least(&self, major: u32, minor: u32) -> bool {
        self.version_score() >= major * 10 + minor
    }

    pub fn flags(&self) -> FlagSet<VTFFlags> {
        FlagSet::new_truncated(self.flags)
    }

    pub fn high_res_image_format(&self) -> Option<ImageFormat> {
        ImageFormat::from_raw(self.high_res_image_format)
    }

    pub fn low_res_image_format(&self) -> Option<ImageFormat> {
        ImageFormat::from_raw(self.low_res_image_format)
    }

    pub fn validate(&self, file_size: usize) -> VRes<()> {
        self.validate_with(file_size, &DecoderLimits::default())
    }

    /// Rejects malformed headers before anything derived from them is used as
    /// an offset or allocation size. Checks run in a fixed order and the
    /// first failure is returned.
    pub fn validate_with(&self, file_size: usize, limits: &DecoderLimits) -> VRes<()> {
        let [major, minor] = self.version;
        if major != 7 || !(70..=75).contains(&self.version_score()) {
            return Err(VTFError::UnsupportedVersion { major, minor });
        }

        if self.width == 0 || self.height == 0 {
            return Err(VTFError::InvalidDimensions(format!(
                "width={}, height={} (cannot be zero)",
                self.width, self.height
            )));
        }
        if self.width > limits.max_dimension || self.height > limits.max_dimension {
            return Err(VTFError::InvalidDimensions(format!(
                "width={}, height={} (max {})",
                self.width, self.height, limits.max_dimension
            )));
        }

        let max_mipmaps = max_mipmap_count(self.width, self.height);
        if self.mipmap_count == 0 || self.mipmap_count > max_mipmaps {
            return Err(VTFError::InvalidMipmapCount {
                count: self.mipmap_count,
                max: max_mipmaps,
                width: self.width,
                height: self.height,
            });
        }

        if self.header_size < limits.min_header_size || self.header_size > limits.max_header_size
        {
            return Err(VTFError::InvalidHeaderSize(format!(
                "{} bytes (expected {}-{})",
                self.header_size, limits.min_header_size, limits.max_header_size
            )));
        }
        if self.header_size as usize > file_size {
            return Err(VTFError::InvalidHeaderSize(format!(
                "header size {} exceeds file size {}",
                self.header_size, file_size
            )));
        }

        if self.frames == 0 || self.frames > limits.max_frames {
            return Err(VTFError::InvalidDimensions(format!(
                "frame count {} is invalid (expected 1-{})",
                self.frames, limits.max_frames
            )));
        }

        if self.is_at_least(7, 2) && self.depth > 1 {
            return Err(VTFError::TextureDepthNotSupported(self.depth));
        }

        if self.low_res_image_width > limits.max_low_res_dimension
            || self.low_res_image_height > limits.max_low_res_dimension
        {
            return Err(VTFError::InvalidDimensions(format!(
                "low-res dimensions {}x{} exceed {}x{}",
                self.low_res_image_width,
                self.low_res_image_height,
                limits.max_low_res_dimension,
                limits.max_low_res_dimension
            )));
        }

        Ok(())
    }
}

/// floor(log2(max(width, height))) + 1
fn max_mipmap_count(width: u16, height: u16) -> u8 {
    (u16::BITS - width.max(height).leading_zeros()) as u8
}
