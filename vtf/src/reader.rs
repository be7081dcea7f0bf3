use std::{
    fs::File,
    io::{BufReader, Read},
    ops::Range,
    path::Path,
};

use crate::{
    config::DecoderLimits,
    consts::{ImageFormat, LOW_RES_IMAGE_FORMAT},
    error::VRes,
    header::VTFHeader,
    mipmaps::{compute_level_byte_size, compute_level_dimensions},
    vtf::VTF,
    VTFError,
};

/// Cubemaps are not supported, every frame has exactly one face.
pub const FACE_COUNT: usize = 1;
/// Volume textures are not supported, every face has exactly one z slice.
pub const SLICE_COUNT: usize = 1;

/// `[mipmap][frame][face][slice]` byte ranges into the decoded buffer.
pub(crate) type MipRanges = Vec<Vec<Vec<Vec<Range<usize>>>>>;

/// Where everything lives inside one buffer. Computed once, never mutated.
#[derive(Debug)]
pub(crate) struct Layout {
    pub header: VTFHeader,
    pub resources: Vec<u8>,
    pub low_res: Range<usize>,
    pub high_res: MipRanges,
}

/// Decodes VTF buffers under a set of [`DecoderLimits`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Decoder {
    limits: DecoderLimits,
}

impl Decoder {
    pub fn new(limits: DecoderLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &DecoderLimits {
        &self.limits
    }

    /// Parse and validate the header only, without locating any image data.
    pub fn read_header(&self, buffer: &[u8]) -> VRes<VTFHeader> {
        let header = VTFHeader::parse(buffer)?;
        header.validate_with(buffer.len(), &self.limits)?;
        Ok(header)
    }

    /// Decodes a borrowed buffer. The returned [`VTF`] keeps its own copy.
    pub fn decode(&self, buffer: &[u8]) -> VRes<VTF> {
        let layout = self.layout(buffer)?;
        Ok(VTF::from_layout(buffer.into(), layout))
    }

    /// Decodes an owned buffer without copying it.
    pub fn decode_vec(&self, buffer: Vec<u8>) -> VRes<VTF> {
        let layout = self.layout(&buffer)?;
        Ok(VTF::from_layout(buffer.into_boxed_slice(), layout))
    }

    /// Reads the stream to its end and decodes it.
    pub fn read<R: Read>(&self, mut reader: R) -> VRes<VTF> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.decode_vec(buffer)
    }

    pub fn open(&self, path: impl AsRef<Path>) -> VRes<VTF> {
        let path = path.as_ref();
        log::debug!("opening {}", path.display());
        self.read(BufReader::new(File::open(path)?))
    }

    pub(crate) fn layout(&self, buffer: &[u8]) -> VRes<Layout> {
        let mut header = self.read_header(buffer)?;
        log::debug!(
            "vtf {}.{} {}x{} format {} mips {} frames {}",
            header.version[0],
            header.version[1],
            header.width,
            header.height,
            header.high_res_image_format,
            header.mipmap_count,
            header.frames
        );

        let resources = read_resources(&mut header);
        let low_res = low_res_range(&header, buffer.len())?;
        let high_res = mipmap_ranges(&header, low_res.end, buffer.len())?;

        Ok(Layout {
            header,
            resources,
            low_res,
            high_res,
        })
    }
}

/// Decode with the default limits.
pub fn decode(buffer: &[u8]) -> VRes<VTF> {
    Decoder::default().decode(buffer)
}

/// Header-only inspection with the default limits.
pub fn read_header(buffer: &[u8]) -> VRes<VTFHeader> {
    Decoder::default().read_header(buffer)
}

/// Resource entries (7.3+) are not decoded yet, the blob is always empty.
fn read_resources(header: &mut VTFHeader) -> Vec<u8> {
    if !header.is_at_least(7, 3) || header.num_resources == 0 {
        header.depth = 0;
        header.num_resources = 0;
        return Vec::new();
    }

    log::warn!(
        "skipping {} resource entries, resource decoding is not supported",
        header.num_resources
    );
    Vec::new()
}

/// The thumbnail sits directly after the header and is always DXT1.
fn low_res_range(header: &VTFHeader, buffer_len: usize) -> VRes<Range<usize>> {
    if header.low_res_image_format() != Some(LOW_RES_IMAGE_FORMAT)
        && header.low_res_image_format() != Some(ImageFormat::NONE)
    {
        log::warn!(
            "low res format {} is not DXT1, reading as DXT1",
            header.low_res_image_format
        );
    }

    let size = compute_level_byte_size(
        header.low_res_image_width.into(),
        header.low_res_image_height.into(),
        LOW_RES_IMAGE_FORMAT as u32,
    )?;
    let start = header.header_size as usize;
    let end = start + size;
    if end > buffer_len {
        return Err(VTFError::UnexpectedEndOfData {
            needed: end,
            available: buffer_len,
        });
    }

    Ok(start..end)
}

/// Walks the pyramid backwards from the end of the buffer.
///
/// The largest mipmap is stored last, so it is taken first from the tail
/// `[start, end)`, then each smaller level from what is left in front of it.
fn mipmap_ranges(header: &VTFHeader, start: usize, mut end: usize) -> VRes<MipRanges> {
    if header.depth > 1 {
        return Err(VTFError::UnsupportedDepth(header.depth));
    }

    let mipmap_count = header.mipmap_count as usize;
    let frames = header.frames as usize;
    let dimensions =
        compute_level_dimensions(mipmap_count, header.width.into(), header.height.into());

    let mut mipmaps: MipRanges = vec![Vec::new(); mipmap_count];
    for (level, &(width, height)) in dimensions.iter().enumerate().rev() {
        let size = compute_level_byte_size(width, height, header.high_res_image_format)?;

        let mut level_frames = Vec::with_capacity(frames);
        for frame in 0..frames {
            let mut faces = Vec::with_capacity(FACE_COUNT);
            for _ in 0..FACE_COUNT {
                let mut slices = Vec::with_capacity(SLICE_COUNT);
                for _ in 0..SLICE_COUNT {
                    let available = end - start;
                    if available < size {
                        return Err(VTFError::MipmapSizeMismatch {
                            level,
                            needed: size,
                            available,
                        });
                    }

                    log::trace!("mip {level} ({width}x{height}) frame {frame}: {}..{end}", end - size);
                    slices.push(end - size..end);
                    end -= size;
                }
                faces.push(slices);
            }
            level_frames.push(faces);
        }
        mipmaps[level] = level_frames;
    }

    if end > start {
        log::debug!("{} bytes between thumbnail and pyramid left unread", end - start);
    }

    Ok(mipmaps)
}
