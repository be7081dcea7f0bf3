use std::{fmt, io::Read, ops::Range, path::Path};

use crate::{
    codec::{to_rgba8, BlockDecoder},
    consts::{ImageFormat, LOW_RES_IMAGE_FORMAT},
    error::VRes,
    header::VTFHeader,
    mipmaps::compute_level_dimensions,
    reader::{Decoder, Layout, MipRanges},
};

/// A decoded VTF file: header, thumbnail and every mipmap/frame/face/slice
/// image, as slices into the file's own bytes.
///
/// Mipmaps are indexed smallest first. `mipmap_count - 1` is the full
/// resolution image.
pub struct VTF {
    data: Box<[u8]>,
    header: VTFHeader,
    resources: Vec<u8>,
    low_res: Range<usize>,
    high_res: MipRanges,
}

impl fmt::Debug for VTF {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ".vtf: {:?}", self.header)?;
        write!(f, " ({} bytes, {} resource bytes)", self.data.len(), self.resources.len())
    }
}

impl VTF {
    pub(crate) fn from_layout(data: Box<[u8]>, layout: Layout) -> Self {
        Self {
            data,
            header: layout.header,
            resources: layout.resources,
            low_res: layout.low_res,
            high_res: layout.high_res,
        }
    }

    /// Decode with the default limits. See [`Decoder`] for custom limits.
    pub fn decode(buffer: &[u8]) -> VRes<Self> {
        Decoder::default().decode(buffer)
    }

    pub fn from_vec(buffer: Vec<u8>) -> VRes<Self> {
        Decoder::default().decode_vec(buffer)
    }

    pub fn read<R: Read>(reader: R) -> VRes<Self> {
        Decoder::default().read(reader)
    }

    pub fn open(path: impl AsRef<Path>) -> VRes<Self> {
        Decoder::default().open(path)
    }

    pub fn header(&self) -> &VTFHeader {
        &self.header
    }

    pub fn width(&self) -> u32 {
        self.header.width as u32
    }
    pub fn height(&self) -> u32 {
        self.header.height as u32
    }
    pub fn low_res_width(&self) -> u32 {
        self.header.low_res_image_width as u32
    }
    pub fn low_res_height(&self) -> u32 {
        self.header.low_res_image_height as u32
    }
    pub fn mipmap_count(&self) -> usize {
        self.high_res.len()
    }
    pub fn frames(&self) -> usize {
        self.header.frames as usize
    }

    pub fn high_res_image_format(&self) -> Option<ImageFormat> {
        self.header.high_res_image_format()
    }

    /// Opaque resource data (7.3+). Entries are not decoded, so this is empty.
    pub fn resources(&self) -> &[u8] {
        &self.resources
    }

    /// DXT1 thumbnail, as previewed in the Hammer texture browser.
    pub fn low_res_image_data(&self) -> &[u8] {
        &self.data[self.low_res.clone()]
    }

    /// `[mipmap][frame][face][slice]`. Faces and slices always have length 1.
    pub fn high_res_image_data(&self) -> Vec<Vec<Vec<Vec<&[u8]>>>> {
        self.high_res
            .iter()
            .map(|frames| {
                frames
                    .iter()
                    .map(|faces| {
                        faces
                            .iter()
                            .map(|slices| slices.iter().map(|r| &self.data[r.clone()]).collect())
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }

    /// Panics if any index is out of range.
    pub fn image(&self, mipmap: usize, frame: usize, face: usize, slice: usize) -> &[u8] {
        &self.data[self.high_res[mipmap][frame][face][slice].clone()]
    }

    /// Every mipmap of one frame, smallest first. Panics if `frame` is out of range.
    pub fn mipmaps_for_frame(&self, frame: usize) -> Vec<&[u8]> {
        (0..self.mipmap_count())
            .map(|mipmap| self.image(mipmap, frame, 0, 0))
            .collect()
    }

    /// The full resolution image of one frame. Panics if `frame` is out of range.
    pub fn highest_resolution_image_for_frame(&self, frame: usize) -> &[u8] {
        // TODO: cubemaps and volume textures would need a face/slice argument here.
        self.image(self.mipmap_count() - 1, frame, 0, 0)
    }

    /// (width, height) per mipmap, smallest first.
    pub fn mipmap_dimensions(&self) -> Vec<(u32, u32)> {
        compute_level_dimensions(self.mipmap_count(), self.width(), self.height())
    }

    /// Expands one mipmap of one frame to RGBA8.
    pub fn decode_rgba8(
        &self,
        mipmap: usize,
        frame: usize,
        decoder: &dyn BlockDecoder,
    ) -> VRes<Vec<u8>> {
        let (width, height) = self.mipmap_dimensions()[mipmap];
        to_rgba8(
            self.header.high_res_image_format,
            width,
            height,
            self.image(mipmap, frame, 0, 0),
            decoder,
        )
    }

    pub fn decode_low_res_rgba8(&self, decoder: &dyn BlockDecoder) -> VRes<Vec<u8>> {
        to_rgba8(
            LOW_RES_IMAGE_FORMAT as u32,
            self.low_res_width(),
            self.low_res_height(),
            self.low_res_image_data(),
            decoder,
        )
    }
}
