pub use crate::codec::{to_rgba8, BlockDecoder, Texture2DDecoder};
pub use crate::config::DecoderLimits;
pub use crate::consts::{ImageFormat, VTFFlags};
pub use crate::error::{VRes, VTFError};
pub use crate::header::VTFHeader;
pub use crate::mipmaps::{compute_level_byte_size, compute_level_dimensions};
pub use crate::reader::{decode, read_header, Decoder};
pub use crate::vtf::VTF;
