//! Lossless byte compression applied to each texture page.
//!
//! Every page of a texture uses the same [CompressionMode].
//! The mode is resolved once to a [Codec] before packing or unpacking any pages.
use std::io::Read;

use flate2::{bufread::ZlibEncoder, Compression};
use strum::{Display, EnumIter, EnumString};
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::error::{CompressError, DecompressError};

const ZSTD_LEVEL: i32 = 19;

/// The algorithm used to compress all pages of a texture.
///
/// The string representation matches the name stored in texture metadata.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CompressionMode {
    /// Pages are stored as is.
    None,
    /// LZ4 block format without a size prefix.
    #[default]
    #[strum(serialize = "LZ4")]
    Lz4,
    /// A zlib stream using the best compression level.
    Zlib,
    /// A single zstd frame.
    Zstd,
}

/// Compression and decompression functions for a single [CompressionMode].
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    pub mode: CompressionMode,
    compress: fn(&[u8]) -> Result<Vec<u8>, CompressError>,
    decompress: fn(&[u8], &mut [u8]) -> Result<usize, DecompressError>,
}

impl CompressionMode {
    pub fn codec(self) -> Codec {
        match self {
            CompressionMode::None => Codec {
                mode: self,
                compress: compress_none,
                decompress: decompress_none,
            },
            CompressionMode::Lz4 => Codec {
                mode: self,
                compress: compress_lz4,
                decompress: decompress_lz4,
            },
            CompressionMode::Zlib => Codec {
                mode: self,
                compress: compress_zlib,
                decompress: decompress_zlib,
            },
            CompressionMode::Zstd => Codec {
                mode: self,
                compress: compress_zstd,
                decompress: decompress_zstd,
            },
        }
    }
}

impl Codec {
    /// Compress `data` into a new buffer.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressError> {
        (self.compress)(data)
    }

    /// Decompress `src` into `dst` and return the number of bytes written.
    ///
    /// Fails instead of writing past the end of `dst`.
    /// Callers should compare the returned length with the expected size.
    pub fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
        (self.decompress)(src, dst)
    }
}

fn compress_none(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    Ok(data.to_vec())
}

fn decompress_none(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    copy_output(src, dst)
}

fn compress_lz4(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    Ok(lz4_flex::block::compress(data))
}

fn decompress_lz4(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    lz4_flex::block::decompress_into(src, dst).map_err(Into::into)
}

fn compress_zlib(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    let mut encoder = ZlibEncoder::new(data, Compression::best());
    let mut stream = Vec::new();
    encoder
        .read_to_end(&mut stream)
        .map_err(CompressError::Zlib)?;
    Ok(stream)
}

fn decompress_zlib(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    let mut decoder = DeflateDecoder::new_with_options(
        src,
        DeflateOptions::default()
            .set_size_hint(dst.len())
            .set_limit(dst.len()),
    );
    let decompressed = decoder.decode_zlib()?;
    copy_output(&decompressed, dst)
}

fn compress_zstd(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    zstd::bulk::compress(data, ZSTD_LEVEL).map_err(CompressError::Zstd)
}

fn decompress_zstd(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    zstd::bulk::decompress_to_buffer(src, dst).map_err(DecompressError::Zstd)
}

fn copy_output(decompressed: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    let capacity = dst.len();
    let output = dst
        .get_mut(..decompressed.len())
        .ok_or(DecompressError::OutputOverflow {
            actual: decompressed.len(),
            capacity,
        })?;
    output.copy_from_slice(decompressed);
    Ok(decompressed.len())
}
