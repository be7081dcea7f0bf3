use flagset::flags;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// File signature ("VTF\0"), or as a little-endian integer, 0x00465456.
pub const VTF_SIGNATURE: [u8; 4] = *b"VTF\0";

/// Largest header footprint across 7.0-7.5. Every parse reads this many bytes.
pub const HEADER_READ_SIZE: usize = 96;

/// The thumbnail is always stored as DXT1, whatever the header claims.
pub const LOW_RES_IMAGE_FORMAT: ImageFormat = ImageFormat::DXT1;

/// Pixel formats stored in `high_res_image_format` / `low_res_image_format`.
#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ImageFormat {
    NONE = -1,
    RGBA8888 = 0,
    ABGR8888,
    RGB888,
    BGR888,
    RGB565,
    I8,
    IA88,
    P8,
    A8,
    RGB888BLUESCREEN,
    BGR888BLUESCREEN,
    ARGB8888,
    BGRA8888,
    DXT1,
    DXT3,
    DXT5,
    BGRX8888,
    BGR565,
    BGRX5551,
    BGRA4444,
    DXT1ONEBITALPHA,
    BGRA5551,
    UV88,
    UVWQ8888,
    RGBA16161616F,
    RGBA16161616,
    UVLX8888,
}

impl ImageFormat {
    /// Maps an on-disk format id onto the table. Ids are stored as u32 but
    /// `NONE` is written as 0xFFFFFFFF.
    pub fn from_raw(id: u32) -> Option<Self> {
        Self::from_i32(id as i32)
    }

    /// Average storage cost of one pixel. Block formats report a fraction since
    /// a 4x4 block shares a fixed number of bytes.
    ///
    /// 0 means the size of the format is unknown and nothing can be located
    /// with it. DXT3 deliberately lands here.
    pub const fn bytes_per_pixel(&self) -> f32 {
        match *self {
            ImageFormat::NONE | ImageFormat::DXT3 => 0.0,
            ImageFormat::RGBA16161616F | ImageFormat::RGBA16161616 => 8.0,
            ImageFormat::RGBA8888
            | ImageFormat::ABGR8888
            | ImageFormat::ARGB8888
            | ImageFormat::BGRA8888
            | ImageFormat::BGRX8888
            | ImageFormat::UVWQ8888
            | ImageFormat::UVLX8888 => 4.0,
            ImageFormat::RGB888
            | ImageFormat::BGR888
            | ImageFormat::RGB888BLUESCREEN
            | ImageFormat::BGR888BLUESCREEN => 3.0,
            ImageFormat::RGB565
            | ImageFormat::IA88
            | ImageFormat::BGR565
            | ImageFormat::BGRX5551
            | ImageFormat::BGRA4444
            | ImageFormat::BGRA5551
            | ImageFormat::UV88 => 2.0,
            ImageFormat::I8 | ImageFormat::P8 | ImageFormat::A8 => 1.0,
            // 4x4 block has 64 bits of colour
            ImageFormat::DXT1 | ImageFormat::DXT1ONEBITALPHA => 0.5,
            // 4x4 block has 64 bits of colour and 64 bits of alpha
            ImageFormat::DXT5 => 1.0,
        }
    }

    pub const fn is_block_compressed(&self) -> bool {
        matches!(
            *self,
            ImageFormat::DXT1 | ImageFormat::DXT1ONEBITALPHA | ImageFormat::DXT3 | ImageFormat::DXT5
        )
    }
}

/// Bytes-per-pixel lookup by raw format id. Unknown ids give 0.
pub fn bytes_per_pixel(format: u32) -> f32 {
    ImageFormat::from_raw(format).map_or(0.0, |f| f.bytes_per_pixel())
}

/// Block-compressed lookup by raw format id. Unknown ids are not compressed.
pub fn is_block_compressed(format: u32) -> bool {
    ImageFormat::from_raw(format).is_some_and(|f| f.is_block_compressed())
}

flags! {
    pub enum VTFFlags: u32 {
        // Flags from the *.txt config file
        POINTSAMPLE = 0x00000001,
        TRILINEAR = 0x00000002,
        CLAMPS = 0x00000004,
        CLAMPT = 0x00000008,
        ANISOTROPIC = 0x00000010,
        HINTDXT5 = 0x00000020,
        PWLCORRECTED = 0x00000040,
        NORMAL = 0x00000080,
        NOMIP = 0x00000100,
        NOLOD = 0x00000200,
        ALLMIPS = 0x00000400,
        PROCEDURAL = 0x00000800,

        // These are automatically generated by vtex from the texture data.
        ONEBITALPHA = 0x00001000,
        EIGHTBITALPHA = 0x00002000,

        // Newer flags from the *.txt config file
        ENVMAP = 0x00004000,
        RENDERTARGET = 0x00008000,
        DEPTHRENDERTARGET = 0x00010000,
        NODEBUGOVERRIDE = 0x00020000,
        SINGLECOPY = 0x00040000,
        PRESRGB = 0x00080000,
        PREMULTCOLORBYONEOVERMIPLEVEL = 0x00100000,
        NORMALTODUDV = 0x00200000,
        ALPHATESTMIPGENERATION = 0x00400000,

        NODEPTHBUFFER = 0x00800000,

        NICEFILTERED = 0x01000000,

        CLAMPU = 0x02000000,
        VERTEXTEXTURE = 0x04000000,
        SSBUMP = 0x08000000,

        BORDER = 0x20000000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_ids_round_trip_through_table() {
        assert_eq!(ImageFormat::from_raw(0), Some(ImageFormat::RGBA8888));
        assert_eq!(ImageFormat::from_raw(13), Some(ImageFormat::DXT1));
        assert_eq!(ImageFormat::from_raw(15), Some(ImageFormat::DXT5));
        assert_eq!(ImageFormat::from_raw(26), Some(ImageFormat::UVLX8888));
        assert_eq!(ImageFormat::from_raw(u32::MAX), Some(ImageFormat::NONE));
        assert_eq!(ImageFormat::from_raw(27), None);
    }

    #[test]
    fn block_formats_report_fractional_sizes() {
        assert_eq!(ImageFormat::DXT1.bytes_per_pixel(), 0.5);
        assert_eq!(ImageFormat::DXT1ONEBITALPHA.bytes_per_pixel(), 0.5);
        assert_eq!(ImageFormat::DXT5.bytes_per_pixel(), 1.0);
        assert!(ImageFormat::DXT1.is_block_compressed());
        assert!(ImageFormat::DXT5.is_block_compressed());
        assert!(!ImageFormat::BGRA8888.is_block_compressed());
    }

    #[test]
    fn unknown_formats_have_no_size() {
        assert_eq!(bytes_per_pixel(1000), 0.0);
        assert_eq!(bytes_per_pixel(u32::MAX), 0.0);
        assert_eq!(ImageFormat::DXT3.bytes_per_pixel(), 0.0);
        assert!(!is_block_compressed(1000));
    }

    #[test]
    fn raw_lookups_match_enum() {
        assert_eq!(bytes_per_pixel(0), 4.0);
        assert_eq!(bytes_per_pixel(2), 3.0);
        assert_eq!(bytes_per_pixel(24), 8.0);
        assert!(is_block_compressed(13));
        assert!(is_block_compressed(14));
    }
}
